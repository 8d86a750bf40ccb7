use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::braille::{BrailleCanvas, DOTS_PER_CELL};
use crate::config::GlobeConfig;
use crate::data::{resolve_highlights, HighlightSet, PendingLoad, WorldFeatureCollection};
use crate::geo::wrap_lon;
use crate::interaction::{InteractionController, Wheel};
use crate::map::{GlobeRenderer, OrthographicProjection, RenderLayers};
use crate::scheduler::AnimationScheduler;
use crate::view::{ViewState, ViewportMetrics};

/// What the surface shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceState {
    /// Geometry not loaded yet: plain globe disk plus a loading overlay
    Loading,
    /// Load failed: error panel instead of the globe
    Error(String),
    /// Interactive globe
    Ready,
}

enum Geometry {
    Pending(PendingLoad),
    Loaded(WorldFeatureCollection),
    Failed(String),
}

/// Screen regions in terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceLayout {
    /// Bordered globe panel
    pub panel: Rect,
    /// Braille canvas, centred inside the panel
    pub canvas: Rect,
    /// One-line status bar below the panel
    pub status: Rect,
}

impl SurfaceLayout {
    /// Lay out a `cols` x `rows` terminal and fit the preferred globe size into it.
    pub fn compute(cols: u16, rows: u16, preferred: (usize, usize)) -> (Self, Option<ViewportMetrics>) {
        let panel_rows = rows.saturating_sub(1);
        let panel = Rect::new(0, 0, cols, panel_rows);
        let status = Rect::new(0, panel_rows, cols, rows.min(1));

        // Account for the panel border
        let inner = Rect::new(1, 1, cols.saturating_sub(2), panel_rows.saturating_sub(2));
        let available = (
            inner.width as usize * DOTS_PER_CELL.0,
            inner.height as usize * DOTS_PER_CELL.1,
        );
        let metrics = ViewportMetrics::fit(preferred, available);

        let canvas = match &metrics {
            Some(m) => {
                let (w, h) = m.cells();
                let w = (w as u16).min(inner.width);
                let h = (h as u16).min(inner.height);
                Rect::new(
                    inner.x + (inner.width - w) / 2,
                    inner.y + (inner.height - h) / 2,
                    w,
                    h,
                )
            }
            None => Rect::new(inner.x, inner.y, 0, 0),
        };

        (Self { panel, canvas, status }, metrics)
    }
}

/// The globe surface: owns view state, geometry and the canvas, and wires
/// the scheduler, interaction controller and renderer together.
pub struct App {
    config: GlobeConfig,
    layout: SurfaceLayout,
    metrics: Option<ViewportMetrics>,
    view: ViewState,
    scheduler: AnimationScheduler,
    controller: InteractionController,
    renderer: GlobeRenderer,
    geometry: Geometry,
    highlights: HighlightSet,
    canvas: BrailleCanvas,
    /// Last pointer position in terminal cells
    pointer: Option<(u16, u16)>,
    mounted: bool,
    dirty: bool,
    frames_rendered: u64,
    pub should_quit: bool,
}

impl App {
    /// Mount on a `cols` x `rows` terminal and start loading geometry in the background.
    pub fn mount(config: GlobeConfig, cols: u16, rows: u16) -> Self {
        let pending = PendingLoad::spawn(config.source.clone());
        Self::mount_with(config, cols, rows, pending)
    }

    /// Mount with an already started load.
    pub fn mount_with(config: GlobeConfig, cols: u16, rows: u16, pending: PendingLoad) -> Self {
        let (layout, metrics) = SurfaceLayout::compute(cols, rows, (config.width, config.height));
        let base_radius = metrics.map_or(0.0, |m| m.base_radius);

        info!(
            cols,
            rows,
            base_radius,
            highlights = config.highlight_countries.len(),
            "mounting globe"
        );

        let mut app = Self {
            scheduler: AnimationScheduler::new(config.rotation_speed),
            config,
            layout,
            metrics,
            view: ViewState::new(base_radius),
            controller: InteractionController::default(),
            renderer: GlobeRenderer::default(),
            geometry: Geometry::Pending(pending),
            highlights: HighlightSet::empty(),
            canvas: BrailleCanvas::new(layout.canvas.width as usize, layout.canvas.height as usize),
            pointer: None,
            mounted: true,
            dirty: true,
            frames_rendered: 0,
            should_quit: false,
        };
        app.render();
        app
    }

    /// Tear down: stop reacting to frames, input and load results.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.controller.cancel();
        self.mounted = false;
        info!(frames = self.frames_rendered, "globe unmounted");
    }

    /// Apply a finished geometry load. Returns true when the surface state changed.
    pub fn poll_geometry(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let Geometry::Pending(pending) = &self.geometry else {
            return false;
        };
        let Some(result) = pending.poll() else {
            return false;
        };

        match result {
            Ok(world) => {
                self.highlights = resolve_highlights(&world, &self.config.highlight_countries);
                info!(
                    features = world.len(),
                    highlighted = self.highlights.len(),
                    "globe ready"
                );
                self.geometry = Geometry::Loaded(world);
                self.render();
            }
            Err(err) => {
                error!(error = %err, "failed to load map data");
                self.geometry = Geometry::Failed(err.to_string());
                self.dirty = true;
            }
        }
        true
    }

    /// Replace the highlight list. Geometry is not re-fetched.
    pub fn set_highlights(&mut self, names: Vec<String>) {
        if !self.mounted {
            return;
        }
        self.config.highlight_countries = names;
        if let Geometry::Loaded(world) = &self.geometry {
            self.highlights = resolve_highlights(world, &self.config.highlight_countries);
            debug!(highlighted = self.highlights.len(), "highlights updated");
            self.render();
        }
    }

    /// Re-fit to a new terminal size, keeping rotation and zoom multiplier.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if !self.mounted {
            return;
        }
        let (layout, metrics) =
            SurfaceLayout::compute(cols, rows, (self.config.width, self.config.height));
        self.layout = layout;
        self.metrics = metrics;
        if let Some(m) = metrics {
            self.view.zoom.rebase(m.base_radius);
        }
        self.canvas = BrailleCanvas::new(layout.canvas.width as usize, layout.canvas.height as usize);
        debug!(cols, rows, "globe resized");
        self.dirty = true;
        self.render();
    }

    /// One animation frame.
    pub fn on_frame(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        if self.scheduler.tick(now, &mut self.view) {
            self.render();
        }
    }

    /// Route a terminal mouse event. Drags continue outside the canvas once started;
    /// presses and wheel only count over the canvas.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if !self.mounted {
            return;
        }
        self.pointer = Some((mouse.column, mouse.row));
        self.dirty = true;

        let x = mouse.column as f64 * DOTS_PER_CELL.0 as f64;
        let y = mouse.row as f64 * DOTS_PER_CELL.1 as f64;
        let over_canvas = self.metrics.is_some() && self.hit_canvas(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if over_canvas => {
                self.controller
                    .pointer_down(x, y, &self.view, &mut self.scheduler);
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if self.controller.pointer_move(x, y, &mut self.view) {
                    self.render();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.controller.pointer_up(now, &mut self.scheduler);
            }
            MouseEventKind::ScrollUp if over_canvas => self.zoom(Wheel::Up),
            MouseEventKind::ScrollDown if over_canvas => self.zoom(Wheel::Down),
            _ => {}
        }
    }

    /// Zoom one wheel notch (also bound to +/-).
    pub fn zoom(&mut self, direction: Wheel) {
        if !self.mounted || self.metrics.is_none() {
            return;
        }
        if self.controller.wheel(direction, &mut self.view) {
            self.render();
        }
    }

    /// Back to the initial rotation and zoom.
    pub fn reset_view(&mut self) {
        if !self.mounted {
            return;
        }
        self.view.rotation = Default::default();
        self.view.zoom.reset();
        self.render();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Repaint the canvas from the current state.
    pub fn render(&mut self) {
        if !self.mounted {
            return;
        }
        let Some(metrics) = self.metrics else {
            return;
        };

        let projection = self.projection(&metrics);
        let layers = match &self.geometry {
            Geometry::Loaded(world) => Some(RenderLayers {
                world,
                highlights: &self.highlights,
            }),
            _ => None,
        };
        self.renderer
            .render(&mut self.canvas, &projection, metrics.base_radius, layers);
        self.frames_rendered += 1;
        self.dirty = true;
    }

    fn projection(&self, metrics: &ViewportMetrics) -> OrthographicProjection {
        OrthographicProjection::new(self.view.rotation, self.view.zoom.scale(), metrics.center())
    }

    fn hit_canvas(&self, col: u16, row: u16) -> bool {
        let r = self.layout.canvas;
        col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
    }

    /// True once since the last call if anything visible changed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn surface_state(&self) -> SurfaceState {
        match &self.geometry {
            Geometry::Pending(_) => SurfaceState::Loading,
            Geometry::Loaded(_) => SurfaceState::Ready,
            Geometry::Failed(message) => SurfaceState::Error(message.clone()),
        }
    }

    pub fn canvas(&self) -> &BrailleCanvas {
        &self.canvas
    }

    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    pub fn metrics(&self) -> Option<&ViewportMetrics> {
        self.metrics.as_ref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Rotation angles, longitude wrapped for display, e.g. "-139.7°, -35.0°".
    pub fn rotation_text(&self) -> String {
        let rotation = self.view.rotation;
        format!("{:.1}°, {:.1}°", wrap_lon(rotation.longitude), rotation.latitude)
    }

    /// Zoom multiplier, e.g. "1.2x".
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.view.zoom.multiplier())
    }

    /// Matched over requested highlight names.
    pub fn highlight_summary(&self) -> String {
        format!(
            "{}/{}",
            self.highlights.len(),
            self.config.highlight_countries.len()
        )
    }

    /// Geographic point under the pointer, if it is over the globe.
    pub fn cursor_coords(&self) -> Option<String> {
        let metrics = self.metrics.as_ref()?;
        let (col, row) = self.pointer?;
        if !self.hit_canvas(col, row) {
            return None;
        }
        // Centre of the cell, in canvas dots
        let px = (col - self.layout.canvas.x) as f64 * DOTS_PER_CELL.0 as f64 + 1.0;
        let py = (row - self.layout.canvas.y) as f64 * DOTS_PER_CELL.1 as f64 + 2.0;
        let (lon, lat) = self.projection(metrics).invert(px, py)?;
        Some(format_lonlat(lon, lat))
    }
}

fn format_lonlat(lon: f64, lat: f64) -> String {
    format!(
        "{:.1}°{}, {:.1}°{}",
        lat.abs(),
        if lat >= 0.0 { "N" } else { "S" },
        lon.abs(),
        if lon >= 0.0 { "E" } else { "W" }
    )
}
