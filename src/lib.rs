//! Visual Stability Analysis Library
//!
//! Estimates, from a sequence of timestamped video frames captured
//! during a page render, the moment the visible area stopped changing
//! ("visual stability time"), together with a confidence label and an
//! optional diagnostic heat-map.
//!
//! # Architecture
//!
//! Two components run in strict sequence over a one-way data flow:
//!
//! ```text
//! frame source → tracker (per-pixel change tallies) → classify
//!                      ↓                                 ↓
//!                 diagnostics                  (timestamp, confidence,
//!                                               optional heat-map)
//! ```
//!
//! The tracker consumes frames one at a time in timestamp order and
//! accumulates, per analyzed pixel, how often it changed and when it
//! first and last did so. After the last frame, a single classification
//! pass turns those tallies into one aggregate verdict.
//!
//! Decoding video, capturing frames, and persisting results all happen
//! outside this crate; the analysis only sees decoded RGB buffers with
//! millisecond timestamps.
//!
//! # Example
//!
//! ```
//! use visual_stability::{
//!     classify::Confidence,
//!     tracker::{PixelChangeTracker, Thresholds},
//!     video::Frame,
//! };
//!
//! let mut tracker = PixelChangeTracker::new(Thresholds::new(1, 25, 3));
//!
//! let blank = Frame::black(16, 16);
//! let mut painted = blank.clone();
//! for x in 0..16 {
//!     painted.set_pixel(x, 4, [200, 200, 200]);
//! }
//!
//! tracker.add_frame(&blank, 0).unwrap();
//! tracker.add_frame(&painted, 350).unwrap();
//! tracker.add_frame(&painted, 700).unwrap();
//!
//! let result = tracker.classify(false);
//! let verdict = result.verdict.unwrap();
//! assert_eq!(verdict.stable_at_ms, 350);
//! assert_eq!(verdict.confidence, Confidence::High);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod classify;
pub mod diagnostics;
pub mod tracker;
pub mod video;

// Re-export commonly used types at crate root
pub use classify::{Classification, Confidence, StabilityVerdict};
pub use diagnostics::{DiagEvent, DiagnosticsSink};
pub use tracker::{CropRegion, PixelChangeTracker, Thresholds, TrackerError};
pub use video::{Frame, FrameSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
