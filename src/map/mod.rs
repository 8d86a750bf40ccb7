mod geometry;
mod graticule;
mod projection;
mod renderer;

pub use graticule::graticule;
pub use projection::{Circle, OrthographicProjection, PathPoint, ProjectedPath, ProjectedRing};
pub use renderer::{GlobeRenderer, GlobeStyle, RenderLayers};
