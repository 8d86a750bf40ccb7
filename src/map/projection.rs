use glam::DVec3;
use std::f64::consts::TAU;

use crate::data::Shape;
use crate::geo::{lonlat_to_vec3, vec3_to_lonlat};
use crate::view::Rotation;

/// A projected vertex in canvas pixels.
/// Far-side vertices are pinned to the limb and flagged invisible so fills stay closed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

/// One projected ring or line.
#[derive(Clone, Debug, Default)]
pub struct ProjectedRing {
    pub points: Vec<PathPoint>,
    /// Closed rings get an implicit edge from the last point back to the first.
    pub closed: bool,
}

impl ProjectedRing {
    /// Edges whose endpoints are both on the visible hemisphere.
    pub fn visible_segments(&self) -> impl Iterator<Item = (PathPoint, PathPoint)> + '_ {
        let closing = if self.closed && self.points.len() > 2 {
            self.points.last().copied().zip(self.points.first().copied())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
            .filter(|(a, b)| a.visible && b.visible)
    }
}

/// Drawable output of the projection for one shape.
#[derive(Clone, Debug, Default)]
pub struct ProjectedPath {
    pub rings: Vec<ProjectedRing>,
}

impl ProjectedPath {
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// Bounding circle of the globe on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

/// Orthographic projection of a rotated sphere, clipped at 90° from the view centre.
/// Orientation stored as three basis vectors for cheap point transformation.
#[derive(Clone, Debug)]
pub struct OrthographicProjection {
    /// Direction pointing at the viewer
    forward: DVec3,
    /// East at the view centre
    right: DVec3,
    /// North at the view centre
    up: DVec3,
    scale: f64,
    translate: (f64, f64),
}

impl OrthographicProjection {
    pub fn new(rotation: Rotation, scale: f64, translate: (f64, f64)) -> Self {
        let (center_lon, center_lat) = rotation.center();
        let lon_rad = center_lon.to_radians();
        let lat_rad = center_lat.to_radians();

        let forward = lonlat_to_vec3(center_lon, center_lat);
        let right = DVec3::new(-lon_rad.sin(), lon_rad.cos(), 0.0);
        let up = DVec3::new(
            -lat_rad.sin() * lon_rad.cos(),
            -lat_rad.sin() * lon_rad.sin(),
            lat_rad.cos(),
        );

        Self { forward, right, up, scale, translate }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Project a geographic point to canvas pixels.
    /// Returns `None` for points on the clipped (far) hemisphere.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let p = lonlat_to_vec3(lon, lat);
        if p.dot(self.forward) < 0.0 {
            return None;
        }
        Some(self.to_screen(p.dot(self.right), p.dot(self.up)))
    }

    /// Canvas pixels back to lon/lat. `None` outside the globe disk.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.scale <= 0.0 {
            return None;
        }
        let sx = (x - self.translate.0) / self.scale;
        let sy = -(y - self.translate.1) / self.scale;

        let r2 = sx * sx + sy * sy;
        if r2 > 1.0 {
            return None;
        }

        let sz = (1.0 - r2).sqrt();
        let p = self.right * sx + self.up * sy + self.forward * sz;
        Some(vec3_to_lonlat(p))
    }

    /// The globe's silhouette.
    pub fn outline(&self) -> Circle {
        Circle {
            cx: self.translate.0,
            cy: self.translate.1,
            radius: self.scale,
        }
    }

    /// Project every ring of a polygonal shape, clipped to the visible hemisphere.
    /// A ring crossing the limb can come back as several rings, each closed along the limb.
    pub fn path_for(&self, shape: &Shape) -> ProjectedPath {
        let rings = shape
            .rings()
            .flat_map(|ring| self.project_polygon_ring(ring))
            .collect();
        ProjectedPath { rings }
    }

    /// Project an open line such as a graticule meridian.
    pub fn path_for_line(&self, line: &[(f64, f64)]) -> ProjectedPath {
        let Some(points) = self.sphere_points(line, false) else {
            return ProjectedPath::default();
        };
        if points.len() < 2 || !points.iter().any(|&(_, visible)| visible) {
            return ProjectedPath::default();
        }
        let points = points
            .into_iter()
            .map(|(p, visible)| self.screen_point(p, visible))
            .collect();
        ProjectedPath {
            rings: vec![ProjectedRing { points, closed: false }],
        }
    }

    /// Subdivided sphere points with limb crossings, flagged by visibility.
    /// Closed rings come back without the repeated first point.
    fn sphere_points(&self, coords: &[(f64, f64)], closed: bool) -> Option<Vec<(DVec3, bool)>> {
        let (&(lon0, lat0), rest) = coords.split_first()?;
        if rest.is_empty() {
            return None;
        }

        let first = lonlat_to_vec3(lon0, lat0);
        let mut builder = RingBuilder::new(self.forward, coords.len() * 2);
        let mut prev = first;
        builder.push(prev);

        for &(lon, lat) in rest {
            let next = lonlat_to_vec3(lon, lat);
            walk_great_circle(prev, next, |p| builder.push(p));
            prev = next;
        }

        if closed && (prev - first).length_squared() > 1e-18 {
            walk_great_circle(prev, first, |p| builder.push(p));
        }
        let mut points = builder.points;
        if closed {
            points.pop();
        }
        Some(points)
    }

    fn project_polygon_ring(&self, coords: &[(f64, f64)]) -> Vec<ProjectedRing> {
        let Some(points) = self.sphere_points(coords, true) else {
            return Vec::new();
        };
        let n = points.len();
        if n < 3 {
            return Vec::new();
        }

        // Start on a point where the ring re-enters the visible side
        let entry = (0..n).find(|&i| points[i].1 && !points[(i + n - 1) % n].1);
        let Some(start) = entry else {
            // Never crosses the limb: wholly visible or wholly hidden
            if !points[0].1 {
                return Vec::new();
            }
            let points = points.iter().map(|&(p, _)| self.screen_point(p, true)).collect();
            return vec![ProjectedRing { points, closed: true }];
        };

        // Visible runs, each from an entry crossing to an exit crossing
        let mut runs: Vec<Vec<DVec3>> = Vec::new();
        let mut current = Vec::new();
        for k in 0..n {
            let (p, visible) = points[(start + k) % n];
            if visible {
                current.push(p);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        // The interior is the smaller side; walk the limb keeping it on the same hand
        let direction = if turning_sum(&points) >= 0.0 { 1.0 } else { -1.0 };
        let entries: Vec<f64> = runs.iter().map(|run| self.limb_angle(run[0])).collect();

        let mut used = vec![false; runs.len()];
        let mut rings = Vec::new();
        for first in 0..runs.len() {
            if used[first] {
                continue;
            }
            let mut out = Vec::new();
            let mut i = first;
            loop {
                used[i] = true;
                out.extend(runs[i].iter().map(|&p| self.screen_point(p, true)));

                let Some(&last) = runs[i].last() else { break };
                let exit = self.limb_angle(last);
                let next = entries
                    .iter()
                    .enumerate()
                    .map(|(j, &angle)| (j, (direction * (angle - exit)).rem_euclid(TAU)))
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                let Some((next, sweep)) = next else { break };

                self.push_limb_arc(&mut out, exit, direction * sweep);
                if next == first || used[next] {
                    break;
                }
                i = next;
            }
            if out.len() >= 3 {
                rings.push(ProjectedRing { points: out, closed: true });
            }
        }
        rings
    }

    /// Screen angle of a limb point, counter-clockwise from east.
    fn limb_angle(&self, p: DVec3) -> f64 {
        p.dot(self.up).atan2(p.dot(self.right))
    }

    /// Intermediate limb points from `from` sweeping `sweep` radians. Hidden so strokes skip them.
    fn push_limb_arc(&self, out: &mut Vec<PathPoint>, from: f64, sweep: f64) {
        let steps = (sweep.abs().to_degrees() / 2.0).ceil() as usize;
        for k in 1..steps {
            let angle = from + sweep * k as f64 / steps as f64;
            let (x, y) = self.to_screen(angle.cos(), angle.sin());
            out.push(PathPoint { x, y, visible: false });
        }
    }

    /// Visible points map straight through; hidden ones are pinned to the limb.
    fn screen_point(&self, p: DVec3, visible: bool) -> PathPoint {
        let mut sx = p.dot(self.right);
        let mut sy = p.dot(self.up);
        if !visible {
            let len = (sx * sx + sy * sy).sqrt();
            if len > 1e-12 {
                sx /= len;
                sy /= len;
            }
        }
        let (x, y) = self.to_screen(sx, sy);
        PathPoint { x, y, visible }
    }

    #[inline(always)]
    fn to_screen(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            self.translate.0 + sx * self.scale,
            self.translate.1 - sy * self.scale,
        )
    }
}

/// Accumulates sphere points, inserting exact limb crossings.
struct RingBuilder {
    forward: DVec3,
    points: Vec<(DVec3, bool)>,
}

impl RingBuilder {
    fn new(forward: DVec3, capacity: usize) -> Self {
        Self {
            forward,
            points: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, p: DVec3) {
        let depth = p.dot(self.forward);

        if let Some(&(prev, _)) = self.points.last() {
            let prev_depth = prev.dot(self.forward);
            if (prev_depth >= 0.0) != (depth >= 0.0) {
                let t = prev_depth / (prev_depth - depth);
                let crossing = (prev + (p - prev) * t).normalize_or_zero();
                if crossing != DVec3::ZERO {
                    self.points.push((crossing, true));
                }
            }
        }

        self.points.push((p, depth >= 0.0));
    }
}

/// Total signed turning of a closed spherical ring, left turns positive seen from outside.
/// Positive when the interior on the left is the smaller side.
fn turning_sum(points: &[(DVec3, bool)]) -> f64 {
    let mut ring: Vec<DVec3> = Vec::with_capacity(points.len());
    for &(p, _) in points {
        if ring.last().map_or(true, |&q| (p - q).length_squared() > 1e-18) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).length_squared() <= 1e-18 {
        ring.pop();
    }

    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let (a, b, c) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
            let incoming = b * a.dot(b) - a;
            let outgoing = c - b * c.dot(b);
            b.dot(incoming.cross(outgoing)).atan2(incoming.dot(outgoing))
        })
        .sum()
}

/// Interpolate along a great circle arc and call a visitor for each subdivision point.
/// Subdivides adaptively: ~2° segments for smooth curves at braille resolution.
/// The start point is not emitted; the end point always is.
#[inline]
pub fn walk_great_circle(a: DVec3, b: DVec3, mut visitor: impl FnMut(DVec3)) {
    let dot = a.dot(b).clamp(-1.0, 1.0);
    let angle = dot.acos(); // angular distance in radians

    // ~2° segments
    let steps = ((angle.to_degrees() / 2.0).ceil() as usize).max(1);

    if steps == 1 {
        visitor(b);
        return;
    }

    let sin_angle = angle.sin();
    if sin_angle.abs() < 1e-10 {
        // Points are nearly identical or antipodal
        visitor(b);
        return;
    }

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        visitor(a * sa + b * sb);
    }
}
