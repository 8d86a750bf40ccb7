/// Grid spacing in degrees.
const STEP: f64 = 10.0;
/// Sampling precision along each grid line.
const PRECISION: f64 = 2.5;
/// Minor meridians and all parallels stop short of the poles.
const MINOR_EXTENT: f64 = 80.0;
/// Keeps major meridians off the exact pole.
const POLE_EPSILON: f64 = 1e-6;

/// 10° latitude/longitude grid as open lon/lat lines.
/// Meridians at multiples of 90° run pole to pole; the rest span ±80°.
pub fn graticule() -> Vec<Vec<(f64, f64)>> {
    let mut lines = Vec::new();

    let mut lon = -180.0;
    while lon < 180.0 {
        let extent = if lon % 90.0 == 0.0 {
            90.0 - POLE_EPSILON
        } else {
            MINOR_EXTENT
        };
        lines.push(sample(-extent, extent).map(|lat| (lon, lat)).collect());
        lon += STEP;
    }

    let mut lat = -MINOR_EXTENT;
    while lat <= MINOR_EXTENT {
        lines.push(sample(-180.0, 180.0).map(|lon| (lon, lat)).collect());
        lat += STEP;
    }

    lines
}

/// Evenly spaced samples from `start` to `end` inclusive.
fn sample(start: f64, end: f64) -> impl Iterator<Item = f64> {
    let steps = ((end - start) / PRECISION).ceil().max(1.0) as usize;
    (0..=steps).map(move |i| start + (end - start) * i as f64 / steps as f64)
}
