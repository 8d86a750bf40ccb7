use crate::app::{App, SurfaceState};
use crate::braille::{BrailleCanvas, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

const HINT: &str = " Drag to rotate • Scroll to zoom ";

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = app.layout();
    let area = frame.area();

    render_panel(frame, app, layout.panel.intersection(area));
    render_status_bar(frame, app, layout.status.intersection(area));
}

fn render_panel(frame: &mut Frame, app: &App, area: Rect) {
    if area.is_empty() {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Globe ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(HINT, Style::default().fg(Color::DarkGray))));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.surface_state() {
        SurfaceState::Error(message) => render_error(frame, &message, inner),
        state => {
            let canvas_area = app.layout().canvas.intersection(inner);
            frame.render_widget(CanvasWidget { canvas: app.canvas() }, canvas_area);
            if state == SurfaceState::Loading {
                render_overlay(frame, "Loading globe...", inner);
            }
        }
    }
}

fn render_overlay(frame: &mut Frame, text: &str, area: Rect) {
    let width = (text.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(paragraph, popup);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Error loading globe",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Paints braille cells with their fill as background and stroke as foreground.
struct CanvasWidget<'a> {
    canvas: &'a BrailleCanvas,
}

impl Widget for CanvasWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row_idx, row) in self.canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, cell) in row.iter().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                let target = &mut buf[(area.x + col_idx as u16, y)];
                if let Some(bg) = cell.bg {
                    target.set_bg(color(bg));
                }
                // Skip empty braille characters so the background shows through
                if cell.dots == 0 {
                    continue;
                }
                target.set_char(cell.glyph());
                if let Some(fg) = cell.fg {
                    target.set_fg(color(fg));
                }
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if area.is_empty() {
        return;
    }

    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" Rotation: ", dim),
        Span::styled(app.rotation_text(), Style::default().fg(Color::Cyan)),
        Span::styled(" | Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | Highlighted: ", dim),
        Span::styled(app.highlight_summary(), Style::default().fg(Color::Magenta)),
    ];
    if let Some(cursor) = app.cursor_coords() {
        spans.push(Span::styled(" | Cursor: ", dim));
        spans.push(Span::styled(cursor, Style::default().fg(Color::White)));
    }
    spans.push(Span::styled(" | +/-:zoom r:reset q:quit", dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
