//! Final classification of the accumulated change statistics.
//!
//! A single read-only scan over the per-pixel tallies derives the
//! visual stability timestamp and a confidence label, and optionally
//! paints a diagnostic heat-map of how each pixel was classified.

mod classifier;
mod heatmap;

pub use classifier::{classify, Classification, Confidence, StabilityVerdict};
pub use heatmap::color;
