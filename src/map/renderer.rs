use crate::braille::{BrailleCanvas, Rgb};
use crate::data::{HighlightSet, WorldFeatureCollection};
use crate::map::geometry::{fill_circle, fill_path, stroke_circle, stroke_path};
use crate::map::graticule::graticule;
use crate::map::projection::OrthographicProjection;
use rayon::prelude::*;

/// Colours and stroke widths for each layer. Widths are in dots at zoom 1x.
#[derive(Clone, Debug)]
pub struct GlobeStyle {
    pub globe_fill: Rgb,
    pub globe_stroke: Rgb,
    pub globe_width: f64,
    pub graticule_stroke: Rgb,
    pub graticule_width: f64,
    pub land_fill: Rgb,
    pub land_stroke: Rgb,
    pub land_width: f64,
    pub highlight_fill: Rgb,
    pub highlight_stroke: Rgb,
    pub highlight_width: f64,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        let globe_fill = Rgb::hex(0x000000);
        let land_fill = Rgb::hex(0x1A202C);
        Self {
            globe_fill,
            globe_stroke: Rgb::hex(0x4A5568),
            globe_width: 1.5,
            // 30% opacity over the ocean
            graticule_stroke: Rgb::hex(0x2D3748).over(globe_fill, 0.3),
            graticule_width: 0.5,
            land_fill,
            land_stroke: Rgb::hex(0x4A5568),
            land_width: 0.5,
            // rgba(168, 85, 247, 0.6) over land
            highlight_fill: Rgb::new(168, 85, 247).over(land_fill, 0.6),
            highlight_stroke: Rgb::hex(0x14B8A6),
            highlight_width: 1.2,
        }
    }
}

/// Loaded geometry handed to the renderer by reference.
#[derive(Clone, Copy)]
pub struct RenderLayers<'a> {
    pub world: &'a WorldFeatureCollection,
    pub highlights: &'a HighlightSet,
}

/// Paints complete globe frames. Holds no per-frame state.
pub struct GlobeRenderer {
    pub style: GlobeStyle,
    graticule: Vec<Vec<(f64, f64)>>,
}

impl GlobeRenderer {
    pub fn new(style: GlobeStyle) -> Self {
        Self {
            style,
            graticule: graticule(),
        }
    }

    /// Repaint the whole canvas: clear, globe disk, then (once loaded)
    /// graticule, land and highlights in that order.
    pub fn render(
        &self,
        canvas: &mut BrailleCanvas,
        projection: &OrthographicProjection,
        base_radius: f64,
        layers: Option<RenderLayers<'_>>,
    ) {
        let style = &self.style;
        let scale_factor = if base_radius > 0.0 {
            projection.scale() / base_radius
        } else {
            1.0
        };
        let width = |w: f64| (w * scale_factor).round().max(1.0) as i32;

        canvas.clear();

        let outline = projection.outline();
        fill_circle(canvas, outline, style.globe_fill);
        stroke_circle(canvas, outline, width(style.globe_width), style.globe_stroke);

        let Some(RenderLayers { world, highlights }) = layers else {
            return;
        };

        for line in &self.graticule {
            let path = projection.path_for_line(line);
            stroke_path(canvas, &path, width(style.graticule_width), style.graticule_stroke);
        }

        // Project in parallel (order preserved), then fill everything before outlining
        // so borders are not covered by a neighbour's fill
        let land: Vec<_> = world
            .features
            .par_iter()
            .map(|feature| projection.path_for(&feature.shape))
            .filter(|path| !path.is_empty())
            .collect();
        for path in &land {
            fill_path(canvas, path, style.land_fill);
        }
        for path in &land {
            stroke_path(canvas, path, width(style.land_width), style.land_stroke);
        }

        if highlights.is_empty() {
            return;
        }
        let highlighted: Vec<_> = highlights
            .features(world)
            .map(|feature| projection.path_for(&feature.shape))
            .filter(|path| !path.is_empty())
            .collect();
        for path in &highlighted {
            fill_path(canvas, path, style.highlight_fill);
        }
        for path in &highlighted {
            stroke_path(canvas, path, width(style.highlight_width), style.highlight_stroke);
        }
    }
}

impl Default for GlobeRenderer {
    fn default() -> Self {
        Self::new(GlobeStyle::default())
    }
}
