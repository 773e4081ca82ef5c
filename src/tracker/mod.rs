//! Per-pixel change accumulation across the frame stream.
//!
//! The tracker consumes frames one at a time in timestamp order and
//! maintains, for every pixel inside the cropped rectangle, how often it
//! changed and when it first and last did so. The accumulated statistics
//! feed the classification pass once all frames have been delivered.

mod change;
mod config;
mod stats;

pub use change::{PixelChangeTracker, TrackerError};
pub use config::{ConfigError, CropRegion, FileConfig, Thresholds};
pub use stats::{PixelStat, StatGrid};
