use thiserror::Error;

/// Failure to obtain the world geometry.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] simd_json::Error),

    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("feature {index} has an invalid position")]
    InvalidGeometry { index: usize },

    #[error("geometry loader stopped before producing a result")]
    Abandoned,
}

pub type Result<T> = std::result::Result<T, LoadError>;
