use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use tui_globe::app::App;
use tui_globe::config::{Cli, GlobeConfig};
use tui_globe::interaction::{MouseCapture, Wheel};
use tui_globe::scheduler::{FrameClock, FRAME_INTERVAL};
use tui_globe::ui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = MouseCapture::enable()
        .context("failed to enable mouse capture")
        .and_then(|capture| {
            let result = run(&mut terminal, cli.globe_config());
            drop(capture);
            result
        });

    ratatui::restore();
    result
}

/// Logs go to a file only: the terminal belongs to the UI.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(terminal: &mut DefaultTerminal, config: GlobeConfig) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::mount(config, size.width, size.height);
    let mut clock = FrameClock::new(FRAME_INTERVAL, Instant::now());

    while !app.should_quit {
        app.poll_geometry();

        if app.take_dirty() {
            terminal.draw(|frame| ui::render(frame, &app))?;
        }

        // Wait for input until the next frame is due
        if event::poll(clock.until_next(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom(Wheel::Up),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom(Wheel::Down),
                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                    _ => {}
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                Event::Resize(cols, rows) => app.resize(cols, rows),
                _ => {}
            }
        }

        let now = Instant::now();
        if clock.due(now) {
            app.on_frame(now);
        }
    }

    app.unmount();
    Ok(())
}
