//! Chart Configuration Module
//! The `ChartSpec` context object carries every render-time setting.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read chart spec {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse chart spec: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Margins around the plot area, in logical pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        // Bottom row reserved for the x axis, top band for title/subtitle.
        Self {
            top: 70,
            right: 0,
            bottom: 30,
            left: 0,
        }
    }
}

/// Complete configuration for one heatmap render.
///
/// Constructed once (defaults, or from a JSON file) and passed by reference
/// into the loader, reshaper and renderer calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    /// Delimited input dataset, header row required.
    pub input: PathBuf,
    /// Destination image (PNG).
    pub output: PathBuf,
    /// Total canvas width in logical pixels.
    pub width: u32,
    /// Total canvas height in logical pixels.
    pub height: u32,
    pub margins: Margins,
    /// Inner and outer padding of both band scales.
    pub band_padding: f64,
    /// Fixed color scale domain; values outside are clamped.
    pub color_domain: (f64, f64),
    /// Cell fill opacity.
    pub cell_opacity: f64,
    pub title: String,
    pub subtitle: String,
    /// Column holding the classification label.
    pub class_column: String,
    /// Column name excluded from the feature set.
    pub group_label: String,
    /// Declared feature order. `None` uses the dataset header order.
    pub features: Option<Vec<String>>,
    /// Open the written image with the system viewer.
    pub open_after_render: bool,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dataset/data_viz.csv"),
            output: PathBuf::from("heatmap.png"),
            width: 1150,
            height: 450,
            margins: Margins::default(),
            band_padding: 0.05,
            color_domain: (-1.5, 1.5),
            cell_opacity: 0.8,
            title: "A class heatmap".to_string(),
            subtitle: "A short description of the take-away message of this chart.".to_string(),
            class_column: "y".to_string(),
            group_label: "group".to_string(),
            features: None,
            open_after_render: false,
        }
    }
}

impl ChartSpec {
    /// Load a spec from a JSON file; unspecified fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Width of the plot area (canvas minus horizontal margins).
    pub fn plot_width(&self) -> u32 {
        self.width.saturating_sub(self.margins.left + self.margins.right)
    }

    /// Height of the plot area (canvas minus vertical margins).
    pub fn plot_height(&self) -> u32 {
        self.height.saturating_sub(self.margins.top + self.margins.bottom)
    }
}
