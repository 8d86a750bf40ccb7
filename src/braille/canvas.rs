/// Dots per character cell: 2 columns by 4 rows.
pub const DOTS_PER_CELL: (usize, usize) = (2, 4);

/// 24-bit colour used by the canvas layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Composite `self` at `alpha` opacity over `below`.
    pub fn over(self, below: Rgb, alpha: f64) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| (top as f64 * a + bottom as f64 * (1.0 - a)).round() as u8;
        Rgb::new(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b))
    }
}

/// One character cell: Braille dot bits plus foreground (dots) and background (fill) colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub dots: u8,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Cell {
    /// Braille glyph for this cell's dots (U+2800 when empty).
    pub fn glyph(&self) -> char {
        char::from_u32(0x2800 + self.dots as u32).unwrap_or(' ')
    }
}

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<Cell>,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel (dot) width of the drawing surface.
    pub fn pixel_width(&self) -> usize {
        self.width * DOTS_PER_CELL.0
    }

    /// Pixel (dot) height of the drawing surface.
    pub fn pixel_height(&self) -> usize {
        self.height * DOTS_PER_CELL.1
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Set a dot at the given pixel coordinates and colour the owning cell.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        let cell = &mut self.cells[cy * self.width + cx];
        cell.dots |= bit;
        cell.fg = Some(color);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Paint a whole cell's background. Dots drawn earlier in the cell are covered.
    pub fn fill_cell(&mut self, cx: usize, cy: usize, color: Rgb) {
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] = Cell {
            dots: 0,
            fg: None,
            bg: Some(color),
        };
    }

    pub fn cell(&self, cx: usize, cy: usize) -> Option<&Cell> {
        if cx >= self.width || cy >= self.height {
            return None;
        }
        self.cells.get(cy * self.width + cx)
    }

    /// Iterate rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Convert the canvas to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(Cell::glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb::hex(0xFFFFFF);

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0, WHITE);
        assert_eq!(canvas.to_string(), "⠁"); // U+2801
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y, WHITE);
            }
        }
        assert_eq!(canvas.to_string(), "⣿"); // U+28FF (all dots)
    }

    #[test]
    fn test_diagonal() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0, 0, WHITE);
        canvas.set_pixel(1, 1, WHITE);
        canvas.set_pixel(2, 2, WHITE);
        canvas.set_pixel(3, 3, WHITE);
        // First char: (0,0) and (1,1) = 0x01 | 0x10 = 0x11
        // Second char: (0,2) and (1,3) = 0x04 | 0x80 = 0x84
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_fill_covers_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0, WHITE);
        canvas.fill_cell(0, 0, Rgb::hex(0x1A202C));
        let cell = canvas.cell(0, 0).copied().unwrap();
        assert_eq!(cell.dots, 0);
        assert_eq!(cell.fg, None);
        assert_eq!(cell.bg, Some(Rgb::hex(0x1A202C)));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(4, 0, WHITE);
        canvas.set_pixel_signed(-1, 3, WHITE);
        canvas.fill_cell(5, 5, WHITE);
        assert!(canvas.rows().flatten().all(|c| *c == Cell::default()));
    }

    #[test]
    fn test_clear() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(1, 1, WHITE);
        canvas.fill_cell(1, 0, WHITE);
        canvas.clear();
        assert_eq!(canvas.to_string(), "\u{2800}\u{2800}");
    }

    #[test]
    fn test_blend() {
        let top = Rgb::new(200, 100, 0);
        let bottom = Rgb::new(0, 0, 100);
        assert_eq!(top.over(bottom, 0.5), Rgb::new(100, 50, 50));
        assert_eq!(top.over(bottom, 1.0), top);
        assert_eq!(top.over(bottom, 0.0), bottom);
    }
}
