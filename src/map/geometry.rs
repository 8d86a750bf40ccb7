use crate::braille::{BrailleCanvas, Rgb, DOTS_PER_CELL};
use crate::map::projection::{Circle, ProjectedPath};

/// Stamp a square brush of `width` dots centred on (x, y).
#[inline]
fn plot(canvas: &mut BrailleCanvas, x: i32, y: i32, width: i32, color: Rgb) {
    let lo = -(width - 1) / 2;
    let hi = width / 2;
    for dy in lo..=hi {
        for dx in lo..=hi {
            canvas.set_pixel_signed(x + dx, y + dy, color);
        }
    }
}

/// Draw a line using Bresenham's algorithm with a `width`-dot brush
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: Rgb) {
    let width = width.max(1);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        plot(canvas, x, y, width, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Stroke every visible edge of a projected path.
pub fn stroke_path(canvas: &mut BrailleCanvas, path: &ProjectedPath, width: i32, color: Rgb) {
    let limit = (canvas.pixel_width() + canvas.pixel_height()) as f64 * 4.0;
    for ring in &path.rings {
        for (a, b) in ring.visible_segments() {
            // Skip runaway edges (NaN or far off-canvas)
            if !(a.x.abs() < limit && a.y.abs() < limit && b.x.abs() < limit && b.y.abs() < limit) {
                continue;
            }
            draw_line(
                canvas,
                a.x.round() as i32,
                a.y.round() as i32,
                b.x.round() as i32,
                b.y.round() as i32,
                width,
                color,
            );
        }
    }
}

/// Fill every cell whose centre lies inside the path (even-odd rule).
pub fn fill_path(canvas: &mut BrailleCanvas, path: &ProjectedPath, color: Rgb) {
    let (cell_w, cell_h) = (DOTS_PER_CELL.0 as f64, DOTS_PER_CELL.1 as f64);
    let mut crossings: Vec<f64> = Vec::new();

    for cy in 0..canvas.height() {
        let y = (cy as f64 + 0.5) * cell_h;
        crossings.clear();

        for ring in &path.rings {
            let n = ring.points.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let a = ring.points[i];
                let b = ring.points[(i + 1) % n];
                // Half-open rule so shared vertices count once
                if (a.y <= y) != (b.y <= y) {
                    let t = (y - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
        }

        if crossings.len() < 2 {
            continue;
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            // Cells whose centre x = (cx + 0.5) * cell_w falls in [span0, span1)
            let first = ((span[0] / cell_w) - 0.5).ceil().max(0.0) as usize;
            let last = ((span[1] / cell_w) - 0.5).ceil();
            if last <= 0.0 {
                continue;
            }
            let last = (last as usize).min(canvas.width());
            for cx in first..last {
                canvas.fill_cell(cx, cy, color);
            }
        }
    }
}

/// Fill every cell whose centre lies inside the circle.
pub fn fill_circle(canvas: &mut BrailleCanvas, circle: Circle, color: Rgb) {
    let (cell_w, cell_h) = (DOTS_PER_CELL.0 as f64, DOTS_PER_CELL.1 as f64);
    let r2 = circle.radius * circle.radius;
    for cy in 0..canvas.height() {
        let dy = (cy as f64 + 0.5) * cell_h - circle.cy;
        for cx in 0..canvas.width() {
            let dx = (cx as f64 + 0.5) * cell_w - circle.cx;
            if dx * dx + dy * dy <= r2 {
                canvas.fill_cell(cx, cy, color);
            }
        }
    }
}

/// Stroke a circle outline as a polygon fine enough to look round at dot resolution.
pub fn stroke_circle(canvas: &mut BrailleCanvas, circle: Circle, width: i32, color: Rgb) {
    if circle.radius <= 0.0 {
        return;
    }
    let steps = ((circle.radius * std::f64::consts::TAU / 2.0).ceil() as usize).clamp(16, 4096);
    let point = |i: usize| {
        let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
        (
            (circle.cx + circle.radius * angle.cos()).round() as i32,
            (circle.cy + circle.radius * angle.sin()).round() as i32,
        )
    };

    let mut prev = point(0);
    for i in 1..=steps {
        let next = point(i);
        draw_line(canvas, prev.0, prev.1, next.0, next.1, width, color);
        prev = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::{PathPoint, ProjectedRing};

    const WHITE: Rgb = Rgb::hex(0xFFFFFF);
    const GREY: Rgb = Rgb::hex(0x1A202C);

    fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> ProjectedPath {
        let pt = |x, y| PathPoint { x, y, visible: true };
        ProjectedPath {
            rings: vec![ProjectedRing {
                points: vec![pt(x0, y0), pt(x1, y0), pt(x1, y1), pt(x0, y1)],
                closed: true,
            }],
        }
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0, 1, WHITE);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7, 1, WHITE);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_wide_line() {
        let mut canvas = BrailleCanvas::new(2, 1);
        draw_line(&mut canvas, 0, 1, 3, 1, 2, WHITE);
        // Rows 1 and 2 across both cells
        assert_eq!(canvas.to_string(), "⠶⠶");
    }

    #[test]
    fn test_fill_rect() {
        let mut canvas = BrailleCanvas::new(4, 2);
        fill_path(&mut canvas, &rect_path(0.0, 0.0, 4.0, 8.0), GREY);
        for cy in 0..2 {
            assert_eq!(canvas.cell(0, cy).unwrap().bg, Some(GREY));
            assert_eq!(canvas.cell(1, cy).unwrap().bg, Some(GREY));
            assert_eq!(canvas.cell(2, cy).unwrap().bg, None);
        }
    }

    #[test]
    fn test_fill_even_odd_hole() {
        let mut canvas = BrailleCanvas::new(6, 3);
        let mut path = rect_path(0.0, 0.0, 12.0, 12.0);
        path.rings.extend(rect_path(4.0, 4.0, 8.0, 8.0).rings);
        fill_path(&mut canvas, &path, GREY);
        assert_eq!(canvas.cell(0, 1).unwrap().bg, Some(GREY));
        assert_eq!(canvas.cell(2, 1).unwrap().bg, None);
        assert_eq!(canvas.cell(5, 1).unwrap().bg, Some(GREY));
    }

    #[test]
    fn test_stroke_skips_hidden_edges() {
        let mut canvas = BrailleCanvas::new(4, 1);
        let path = ProjectedPath {
            rings: vec![ProjectedRing {
                points: vec![
                    PathPoint { x: 0.0, y: 0.0, visible: true },
                    PathPoint { x: 7.0, y: 0.0, visible: false },
                ],
                closed: false,
            }],
        };
        stroke_path(&mut canvas, &path, 1, WHITE);
        assert!(canvas.rows().flatten().all(|c| c.dots == 0));
    }

    #[test]
    fn test_circle_fill_and_stroke() {
        let mut canvas = BrailleCanvas::new(20, 10);
        let circle = Circle { cx: 20.0, cy: 20.0, radius: 12.0 };
        fill_circle(&mut canvas, circle, GREY);
        assert_eq!(canvas.cell(10, 5).unwrap().bg, Some(GREY));
        assert_eq!(canvas.cell(0, 0).unwrap().bg, None);

        stroke_circle(&mut canvas, circle, 1, WHITE);
        // Rightmost point (32, 20) lands in cell (16, 5)
        assert_ne!(canvas.cell(16, 5).unwrap().dots, 0);
        assert_eq!(canvas.cell(10, 5).unwrap().dots, 0);
    }
}
