mod feature;
mod highlight;

pub use feature::{CountryProperties, Feature, Polygon, Ring, Shape, WorldFeatureCollection};
pub use highlight::{resolve_highlights, HighlightSet};

use crate::error::{LoadError, Result};
use geojson::{GeoJson, Value};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Natural Earth 1:110m admin-0 countries.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Enough for the 1:10m country set.
const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Where the world geometry comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeometrySource {
    Url(String),
    File(PathBuf),
}

impl GeometrySource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            GeometrySource::Url(location.to_string())
        } else {
            GeometrySource::File(PathBuf::from(location))
        }
    }

    /// Fetch and parse the collection. Blocking.
    pub fn load(&self) -> Result<WorldFeatureCollection> {
        info!(source = %self, "loading world geometry");
        let mut bytes = match self {
            GeometrySource::Url(url) => fetch(url)?,
            GeometrySource::File(path) => fs::read(path)?,
        };
        let world = parse_world(&mut bytes)?;
        info!(features = world.len(), "world geometry loaded");
        Ok(world)
    }
}

impl fmt::Display for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometrySource::Url(url) => f.write_str(url),
            GeometrySource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let response = ureq::get(url)
        .timeout(REQUEST_TIMEOUT)
        .call()
        .map_err(|err| match err {
            ureq::Error::Status(status, _) => LoadError::Status {
                url: url.to_string(),
                status,
            },
            other => LoadError::Network {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

    read_capped(response.into_reader(), MAX_RESPONSE_BYTES, url)
}

/// Read at most `limit` bytes; a longer body is reported instead of buffered.
fn read_capped(reader: impl Read, limit: u64, url: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(limit + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > limit {
        return Err(LoadError::Network {
            url: url.to_string(),
            reason: format!("response larger than {limit} bytes"),
        });
    }
    Ok(bytes)
}

/// Parse a GeoJSON FeatureCollection of country polygons.
/// Features without polygonal geometry are skipped; malformed positions are errors.
pub fn parse_world(bytes: &mut [u8]) -> Result<WorldFeatureCollection> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;

    let GeoJson::FeatureCollection(fc) = geojson else {
        return Err(LoadError::NotFeatureCollection);
    };

    let mut features = Vec::with_capacity(fc.features.len());
    for (index, feature) in fc.features.into_iter().enumerate() {
        let props = feature.properties.as_ref();
        let text = |key: &str| {
            props
                .and_then(|p| p.get(key))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let properties = CountryProperties {
            name: text("NAME"),
            admin: text("ADMIN"),
            name_long: text("NAME_LONG"),
        };

        let Some(geometry) = feature.geometry else {
            debug!(index, name = ?properties.label(), "skipping feature without geometry");
            continue;
        };

        let shape = match geometry.value {
            Value::Polygon(rings) => Shape::Polygon(convert_polygon(&rings, index)?),
            Value::MultiPolygon(polygons) => Shape::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| convert_polygon(rings, index))
                    .collect::<Result<_>>()?,
            ),
            _ => {
                debug!(index, name = ?properties.label(), "skipping non-polygon feature");
                continue;
            }
        };

        features.push(Feature { properties, shape });
    }

    Ok(WorldFeatureCollection { features })
}

fn convert_polygon(rings: &[Vec<Vec<f64>>], index: usize) -> Result<Polygon> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|c| match c.as_slice() {
                    [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok((*lon, *lat)),
                    _ => Err(LoadError::InvalidGeometry { index }),
                })
                .collect::<Result<Ring>>()
        })
        .collect()
}

/// A geometry load running on the rayon pool. Polled from the UI thread.
pub struct PendingLoad {
    rx: Receiver<Result<WorldFeatureCollection>>,
}

impl PendingLoad {
    /// Start loading `source` in the background.
    pub fn spawn(source: GeometrySource) -> Self {
        let (tx, pending) = Self::channel();
        rayon::spawn(move || {
            let result = source.load();
            if let Err(err) = &result {
                warn!(%source, error = %err, "world geometry load failed");
            }
            // Receiver gone means the surface was torn down; nothing to deliver to.
            let _ = tx.send(result);
        });
        pending
    }

    /// A load whose result is delivered by hand through the returned sender.
    pub fn channel() -> (Sender<Result<WorldFeatureCollection>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// `None` while still running.
    pub fn poll(&self) -> Option<Result<WorldFeatureCollection>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Abandoned)),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Small FeatureCollection covering every geometry branch.
    pub const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME": "India", "ADMIN": "India", "NAME_LONG": "India" },
                "geometry": { "type": "Polygon", "coordinates": [
                    [[68.0, 8.0], [90.0, 8.0], [90.0, 30.0], [68.0, 30.0], [68.0, 8.0]]
                ] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Nippon", "ADMIN": "Nippon", "NAME_LONG": "Japan" },
                "geometry": { "type": "MultiPolygon", "coordinates": [
                    [[[130.0, 31.0], [132.0, 31.0], [132.0, 34.0], [130.0, 31.0]]],
                    [[[138.0, 35.0], [141.0, 35.0], [141.0, 41.0], [138.0, 35.0]]]
                ] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Japan Trench" },
                "geometry": { "type": "Polygon", "coordinates": [
                    [[143.0, 36.0], [145.0, 36.0], [145.0, 40.0], [143.0, 36.0]]
                ] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Null Island" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Nowhere" },
                "geometry": null
            }
        ]
    }"#;
}
