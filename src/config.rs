use clap::Parser;
use std::path::PathBuf;

use crate::data::{GeometrySource, DEFAULT_SOURCE};
use crate::scheduler::DEFAULT_ROTATION_SPEED;

#[derive(Parser, Debug)]
#[command(name = "tui-globe", about = "Interactive orthographic globe in the terminal")]
#[command(version)]
pub struct Cli {
    /// Preferred globe width in braille dots (clamped to the terminal)
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    /// Preferred globe height in braille dots (clamped to the terminal)
    #[arg(long, default_value_t = 600)]
    pub height: usize,

    /// Country to highlight, matched against NAME, ADMIN or NAME_LONG (repeatable, comma separated)
    #[arg(short = 'c', long = "highlight", value_delimiter = ',')]
    pub highlight: Vec<String>,

    /// GeoJSON country polygons: http(s) URL or local file
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Auto-rotation speed in degrees per frame
    #[arg(long, default_value_t = DEFAULT_ROTATION_SPEED)]
    pub rotation_speed: f64,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn globe_config(&self) -> GlobeConfig {
        GlobeConfig {
            width: self.width,
            height: self.height,
            highlight_countries: self
                .highlight
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            source: GeometrySource::parse(&self.source),
            rotation_speed: self.rotation_speed,
        }
    }
}

/// Settings the globe surface is mounted with.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeConfig {
    /// Size hint in dots
    pub width: usize,
    pub height: usize,
    pub highlight_countries: Vec<String>,
    pub source: GeometrySource,
    pub rotation_speed: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            highlight_countries: Vec::new(),
            source: GeometrySource::Url(DEFAULT_SOURCE.to_string()),
            rotation_speed: DEFAULT_ROTATION_SPEED,
        }
    }
}
