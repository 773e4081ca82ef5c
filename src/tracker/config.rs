//! Analysis thresholds and crop configuration.
//!
//! The thresholds are fixed at construction; the crop region must be set
//! before the first frame is delivered. Both can be loaded from a TOML
//! file for tooling that drives the analysis.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds controlling change accumulation and classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Global changed-pixel count a frame must strictly exceed for its
    /// differences to be committed; anything at or below is noise.
    pub min_changes_per_frame: u32,
    /// Boundary between "early" and "late" changes, in milliseconds
    /// since session start.
    pub early_cutoff_ms: u32,
    /// Per-pixel change count below which a pixel counts as effectively
    /// static rather than dynamic.
    pub pixel_change_count_threshold: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_changes_per_frame: 25,
            early_cutoff_ms: 25_000, // 25 seconds
            pixel_change_count_threshold: 7,
        }
    }
}

impl Thresholds {
    /// Creates thresholds with the early cutoff given in seconds.
    pub fn new(
        min_changes_per_frame: u32,
        early_cutoff_seconds: u32,
        pixel_change_count_threshold: u32,
    ) -> Self {
        Self {
            min_changes_per_frame,
            early_cutoff_ms: early_cutoff_seconds * 1000,
            pixel_change_count_threshold,
        }
    }

    /// Validates the threshold parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A zero per-pixel threshold would make every changed pixel
        // "dynamic" and no pixel could ever count as static.
        if self.pixel_change_count_threshold == 0 {
            return Err(ConfigError::InvalidPixelThreshold);
        }
        Ok(())
    }
}

/// Pixel margins excluded from analysis on each edge of the frame.
///
/// Must be configured before the first frame is delivered; it is fixed
/// for the lifetime of the tracker afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    /// Margin excluded at the top edge, in pixels.
    pub top: u32,
    /// Margin excluded at the right edge, in pixels.
    pub right: u32,
    /// Margin excluded at the bottom edge, in pixels.
    pub bottom: u32,
    /// Margin excluded at the left edge, in pixels.
    pub left: u32,
}

impl CropRegion {
    /// Creates a crop region from the four edge margins.
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Width of the analyzed rectangle for a frame of `width` pixels.
    ///
    /// Margins that meet or exceed the frame dimension produce an empty
    /// rectangle rather than wrapping.
    pub fn analyzed_width(&self, width: u32) -> u32 {
        width.saturating_sub(self.left).saturating_sub(self.right)
    }

    /// Height of the analyzed rectangle for a frame of `height` pixels.
    pub fn analyzed_height(&self, height: u32) -> u32 {
        height.saturating_sub(self.top).saturating_sub(self.bottom)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("pixel change count threshold must be at least 1")]
    InvalidPixelThreshold,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub crop: CropRegion,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.thresholds.validate()?;
        Ok(config)
    }
}
