//! Mutable view state shared by the scheduler, the interaction controller and
//! the projection: rotation, zoom and the viewport the globe is fitted into.

use crate::braille::DOTS_PER_CELL;
use crate::geo::clamp_lat;

/// Smallest zoom multiplier relative to the base radius.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom multiplier relative to the base radius.
pub const MAX_ZOOM: f64 = 2.5;

/// Globe rotation in degrees, d3 convention: rotation `(l, p)` looks at `(-l, -p)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    /// Unbounded; wraps modulo 360 only when displayed.
    pub longitude: f64,
    /// Always within [-90, 90].
    pub latitude: f64,
}

impl Rotation {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude: clamp_lat(latitude),
        }
    }

    /// Rotation after dragging `(dx, dy)` pixels from `start`.
    pub fn dragged(start: Rotation, dx: f64, dy: f64, sensitivity: f64) -> Self {
        Self::new(
            start.longitude + dx * sensitivity,
            start.latitude - dy * sensitivity,
        )
    }

    /// Advance longitude by a fixed step (auto-rotation).
    pub fn advance(&mut self, degrees: f64) {
        self.longitude += degrees;
    }

    /// Geographic point at the centre of the view.
    pub fn center(&self) -> (f64, f64) {
        (-self.longitude, -self.latitude)
    }
}

/// Projection scale, clamped to `[MIN_ZOOM, MAX_ZOOM] * base_radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    scale: f64,
    base_radius: f64,
}

impl Zoom {
    pub fn new(base_radius: f64) -> Self {
        Self {
            scale: base_radius,
            base_radius,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    /// Current multiplier `scale / base_radius`.
    pub fn multiplier(&self) -> f64 {
        if self.base_radius > 0.0 {
            self.scale / self.base_radius
        } else {
            1.0
        }
    }

    /// Multiply the scale by `factor`, clamped to the zoom range.
    pub fn zoom_by(&mut self, factor: f64) {
        let min = self.base_radius * MIN_ZOOM;
        let max = self.base_radius * MAX_ZOOM;
        self.scale = (self.scale * factor).clamp(min, max);
    }

    /// Switch to a new base radius keeping the current multiplier.
    pub fn rebase(&mut self, base_radius: f64) {
        let multiplier = self.multiplier().clamp(MIN_ZOOM, MAX_ZOOM);
        self.base_radius = base_radius;
        self.scale = base_radius * multiplier;
    }

    pub fn reset(&mut self) {
        self.scale = self.base_radius;
    }
}

/// Drawing-surface size in device pixels (Braille dots).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
    /// Device pixels per layout cell; the terminal's device pixel ratio.
    pub dots_per_cell: (usize, usize),
    pub base_radius: f64,
}

impl ViewportMetrics {
    /// Metrics for a `width` x `height` dot surface. `None` when either side is empty.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        if !(width >= 1.0 && height >= 1.0) {
            return None;
        }
        Some(Self {
            width,
            height,
            dots_per_cell: DOTS_PER_CELL,
            base_radius: width.min(height) / 2.5,
        })
    }

    /// Fit the preferred size into the available dot area.
    pub fn fit(preferred: (usize, usize), available: (usize, usize)) -> Option<Self> {
        let width = preferred.0.min(available.0);
        let height = preferred.1.min(available.1);
        Self::new(width as f64, height as f64)
    }

    /// Centre of the surface, the projection's translate.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Layout size in character cells, rounded up.
    pub fn cells(&self) -> (usize, usize) {
        let (dx, dy) = self.dots_per_cell;
        (
            (self.width as usize).div_ceil(dx),
            (self.height as usize).div_ceil(dy),
        )
    }
}

/// Everything the frame loop and input handlers mutate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub rotation: Rotation,
    pub zoom: Zoom,
}

impl ViewState {
    pub fn new(base_radius: f64) -> Self {
        Self {
            rotation: Rotation::default(),
            zoom: Zoom::new(base_radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base_radius_from_viewport() {
        let metrics = ViewportMetrics::new(800.0, 600.0).unwrap();
        assert_eq!(metrics.base_radius, 240.0);
        assert_eq!(metrics.center(), (400.0, 300.0));
        assert_eq!(metrics.cells(), (400, 150));
    }

    #[test]
    fn test_degenerate_viewport() {
        assert!(ViewportMetrics::new(0.0, 600.0).is_none());
        assert!(ViewportMetrics::new(800.0, 0.0).is_none());
        assert!(ViewportMetrics::fit((800, 600), (0, 40)).is_none());
    }

    #[test]
    fn test_fit_clamps_to_available() {
        let metrics = ViewportMetrics::fit((800, 600), (158, 180)).unwrap();
        assert_eq!(metrics.width, 158.0);
        assert_eq!(metrics.height, 180.0);
        assert_eq!(metrics.cells(), (79, 45));
    }

    #[test]
    fn test_drag_scenario() {
        let start = Rotation::default();
        let rotation = Rotation::dragged(start, 150.0 - 100.0, 80.0 - 100.0, 0.5);
        assert_eq!(rotation.longitude, 25.0);
        assert_eq!(rotation.latitude, 10.0);
    }

    #[test]
    fn test_wheel_down_scenario() {
        let mut zoom = Zoom::new(240.0);
        zoom.zoom_by(0.9);
        assert!((zoom.scale() - 216.0).abs() < 1e-9);
    }

    #[test]
    fn test_rebase_keeps_multiplier() {
        let mut zoom = Zoom::new(240.0);
        zoom.zoom_by(1.1);
        zoom.zoom_by(1.1);
        let before = zoom.multiplier();
        zoom.rebase(100.0);
        assert!((zoom.multiplier() - before).abs() < 1e-9);
        assert!((zoom.scale() - 100.0 * before).abs() < 1e-9);
    }

    #[test]
    fn test_center_is_negated_rotation() {
        let rotation = Rotation::new(30.0, -20.0);
        assert_eq!(rotation.center(), (-30.0, 20.0));
    }

    proptest! {
        #[test]
        fn latitude_stays_clamped(
            start_lat in -90.0f64..=90.0,
            start_lon in -720.0f64..720.0,
            dx in -10_000.0f64..10_000.0,
            dy in -10_000.0f64..10_000.0,
        ) {
            let start = Rotation::new(start_lon, start_lat);
            let rotation = Rotation::dragged(start, dx, dy, 0.5);
            prop_assert!((-90.0..=90.0).contains(&rotation.latitude));
            prop_assert_eq!(rotation.longitude, start_lon + dx * 0.5);
        }

        #[test]
        fn scale_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut zoom = Zoom::new(240.0);
            for zoom_in in steps {
                zoom.zoom_by(if zoom_in { 1.1 } else { 0.9 });
                prop_assert!(zoom.scale() >= 240.0 * MIN_ZOOM - 1e-9);
                prop_assert!(zoom.scale() <= 240.0 * MAX_ZOOM + 1e-9);
            }
        }
    }
}
