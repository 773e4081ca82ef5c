//! Incremental per-pixel change accumulation.
//!
//! Frames are compared against a sliding baseline (the immediately
//! preceding frame, never anything older). Each comparison runs in two
//! passes: the first only counts differing pixels, and the per-pixel
//! statistics are committed in a second pass only when that count
//! exceeds the frame-level noise threshold. A below-threshold frame
//! therefore mutates no statistics at all, but still becomes the next
//! baseline.

use super::{CropRegion, StatGrid, Thresholds};
use crate::classify::{self, Classification};
use crate::diagnostics::{DiagEvent, DiagnosticsSink, SkipReason, TracingSink};
use crate::video::Frame;
use std::collections::TryReserveError;

/// Errors from frame delivery.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("failed to allocate change statistics for {pixels} pixels")]
    StatAllocation {
        pixels: usize,
        #[source]
        source: TryReserveError,
    },
}

/// State established by the first valid frame.
struct Session {
    /// Owned copy of the most recently delivered frame, the comparison
    /// baseline for the next delivery.
    baseline: Frame,
    stats: StatGrid,
}

/// Accumulates per-pixel change statistics across a frame stream.
///
/// Frames must be delivered one at a time, in non-decreasing timestamp
/// order, by a single caller. The first valid frame fixes the session
/// dimensions; later frames that do not match are skipped without
/// touching any state.
pub struct PixelChangeTracker {
    thresholds: Thresholds,
    crop: CropRegion,
    session: Option<Session>,
    sink: Box<dyn DiagnosticsSink>,
}

impl PixelChangeTracker {
    /// Creates a tracker that reports diagnostics through `tracing`.
    pub fn new(thresholds: Thresholds) -> Self {
        Self::with_sink(thresholds, Box::new(TracingSink))
    }

    /// Creates a tracker with an injected diagnostics sink.
    pub fn with_sink(thresholds: Thresholds, sink: Box<dyn DiagnosticsSink>) -> Self {
        Self {
            thresholds,
            crop: CropRegion::default(),
            session: None,
            sink,
        }
    }

    /// Sets the margins excluded from analysis.
    ///
    /// Has no effect once the first frame has been accepted; the stat
    /// layout is fixed at that point.
    pub fn set_crop_region(&mut self, crop: CropRegion) {
        if self.session.is_some() {
            self.sink.record(&DiagEvent::CropIgnored);
            return;
        }
        self.crop = crop;
    }

    /// Delivers the next frame of the session.
    ///
    /// The frame is only borrowed for the duration of the call; the
    /// tracker keeps its own copy of the pixels it needs as the next
    /// baseline. Invalid and dimension-mismatched frames are skipped
    /// and reported through diagnostics; the only fatal outcome is a
    /// failed statistics allocation on the first valid frame.
    pub fn add_frame(&mut self, frame: &Frame, timestamp_ms: u32) -> Result<(), TrackerError> {
        if !frame.is_valid() {
            self.sink.record(&DiagEvent::FrameSkipped {
                timestamp_ms,
                reason: SkipReason::InvalidFrame,
            });
            return Ok(());
        }

        let session = match self.session {
            Some(ref mut session) => session,
            None => return self.begin_session(frame),
        };

        if frame.width() != session.baseline.width()
            || frame.height() != session.baseline.height()
        {
            self.sink.record(&DiagEvent::FrameSkipped {
                timestamp_ms,
                reason: SkipReason::DimensionMismatch,
            });
            return Ok(());
        }

        // Pass 1: count differing pixels without mutating anything, so
        // a below-threshold frame leaves the statistics untouched.
        let cols = session.stats.width();
        let rows = session.stats.height();
        let mut changed_pixels = 0u32;
        for row in 0..rows {
            for col in 0..cols {
                let x = self.crop.left + col;
                let y = self.crop.top + row;
                if session.baseline.pixel(x, y) != frame.pixel(x, y) {
                    changed_pixels += 1;
                }
            }
        }

        if changed_pixels > self.thresholds.min_changes_per_frame {
            // Pass 2: commit the same differing pixels.
            for row in 0..rows {
                for col in 0..cols {
                    let x = self.crop.left + col;
                    let y = self.crop.top + row;
                    if session.baseline.pixel(x, y) != frame.pixel(x, y) {
                        let stat = session.stats.get_mut(col, row);
                        stat.change_count += 1;
                        stat.last_change_ms = timestamp_ms;
                        if stat.first_change_ms == 0 {
                            stat.first_change_ms = timestamp_ms;
                        }
                    }
                }
            }
            self.sink.record(&DiagEvent::FrameAccepted {
                timestamp_ms,
                changed_pixels,
            });
        } else {
            self.sink.record(&DiagEvent::FrameBelowThreshold {
                timestamp_ms,
                changed_pixels,
                min_changes: self.thresholds.min_changes_per_frame,
            });
        }

        // Sliding baseline: the incoming frame replaces the stored copy
        // whether or not its differences were committed.
        session.baseline = frame.clone();
        Ok(())
    }

    fn begin_session(&mut self, frame: &Frame) -> Result<(), TrackerError> {
        let cols = self.crop.analyzed_width(frame.width());
        let rows = self.crop.analyzed_height(frame.height());
        let stats = StatGrid::allocate(cols, rows).map_err(|source| {
            TrackerError::StatAllocation {
                pixels: (cols as usize) * (rows as usize),
                source,
            }
        })?;
        self.sink.record(&DiagEvent::BaselineEstablished {
            width: frame.width(),
            height: frame.height(),
            analyzed_pixels: stats.len(),
        });
        self.session = Some(Session {
            baseline: frame.clone(),
            stats,
        });
        Ok(())
    }

    /// Runs the classification pass over the accumulated statistics.
    ///
    /// Returns an empty [`Classification`] immediately when no frame
    /// was ever accepted.
    pub fn classify(&self, want_heat_map: bool) -> Classification {
        match &self.session {
            None => Classification::empty(),
            Some(session) => classify::classify(
                &session.stats,
                &self.thresholds,
                &self.crop,
                session.baseline.width(),
                session.baseline.height(),
                want_heat_map,
                self.sink.as_ref(),
            ),
        }
    }

    /// Returns the accumulated statistics, if a session has started.
    pub fn stats(&self) -> Option<&StatGrid> {
        self.session.as_ref().map(|s| &s.stats)
    }

    /// Frame dimensions established by the first valid frame.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.session
            .as_ref()
            .map(|s| (s.baseline.width(), s.baseline.height()))
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// The configured crop region.
    pub fn crop_region(&self) -> &CropRegion {
        &self.crop
    }
}
