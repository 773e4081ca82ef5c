//! Diagnostics sink trait and its standard implementations.

use std::cell::RefCell;

/// Why a delivered frame was not compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Zero dimensions, or a pixel buffer that does not match them.
    InvalidFrame,
    /// Dimensions differ from those established by the first frame.
    DimensionMismatch,
}

/// One structured diagnostic event from the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagEvent {
    /// The first valid frame fixed the session dimensions and the
    /// per-pixel statistics were allocated.
    BaselineEstablished {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
        /// Size of the stat array, one entry per cropped pixel.
        analyzed_pixels: usize,
    },
    /// A frame's differences were committed to the per-pixel statistics.
    FrameAccepted {
        /// Capture timestamp of the frame.
        timestamp_ms: u32,
        /// Pixels that differed from the baseline.
        changed_pixels: u32,
    },
    /// A frame differed from the baseline in too few pixels; its
    /// differences were discarded as noise.
    FrameBelowThreshold {
        /// Capture timestamp of the frame.
        timestamp_ms: u32,
        /// Pixels that differed from the baseline.
        changed_pixels: u32,
        /// The threshold the count failed to exceed.
        min_changes: u32,
    },
    /// A frame was ignored without touching any state.
    FrameSkipped {
        /// Capture timestamp of the frame.
        timestamp_ms: u32,
        /// Why the frame was not compared.
        reason: SkipReason,
    },
    /// A crop region arrived after the first frame and was ignored.
    CropIgnored,
    /// The latest early-stabilizing change time advanced.
    LatestEarlyUpdated {
        /// New value of the maximum.
        timestamp_ms: u32,
    },
    /// The latest static-pixel change time advanced.
    LatestStaticUpdated {
        /// New value of the maximum.
        timestamp_ms: u32,
    },
    /// The final classification decision and the maxima that drove it.
    Decision {
        /// Whether a stability time was determined.
        found: bool,
        /// The resulting timestamp (0 when not found).
        stable_at_ms: u32,
        /// True when the static and early maxima agreed.
        high_confidence: bool,
        /// Latest change among early-stabilizing pixels.
        latest_of_early: u32,
        /// Latest change among neighborhood-static pixels.
        latest_of_static: u32,
        /// Latest first-change time over all pixels; reported but not
        /// part of the decision.
        latest_of_first: u32,
        /// False when any pixel changed late at noise level.
        determined: bool,
    },
}

/// Trait for diagnostics consumers.
///
/// The analysis is single-threaded, so implementations are not required
/// to be `Send` or `Sync`.
pub trait DiagnosticsSink {
    /// Records one diagnostic event.
    fn record(&self, event: &DiagEvent);
}

/// Sink that forwards events to the `tracing` subscriber.
///
/// Per-frame events go to `trace`; milestones and the final decision go
/// to `debug`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: &DiagEvent) {
        match event {
            DiagEvent::BaselineEstablished {
                width,
                height,
                analyzed_pixels,
            } => {
                tracing::debug!(width, height, analyzed_pixels, "Baseline established");
            }
            DiagEvent::FrameAccepted {
                timestamp_ms,
                changed_pixels,
            } => {
                tracing::trace!(timestamp_ms, changed_pixels, "Frame changes recorded");
            }
            DiagEvent::FrameBelowThreshold {
                timestamp_ms,
                changed_pixels,
                min_changes,
            } => {
                tracing::trace!(
                    timestamp_ms,
                    changed_pixels,
                    min_changes,
                    "Frame changes below threshold, discarded as noise"
                );
            }
            DiagEvent::FrameSkipped {
                timestamp_ms,
                reason,
            } => {
                tracing::debug!(timestamp_ms, ?reason, "Frame skipped");
            }
            DiagEvent::CropIgnored => {
                tracing::warn!("Crop region set after first frame, ignored");
            }
            DiagEvent::LatestEarlyUpdated { timestamp_ms } => {
                tracing::trace!(timestamp_ms, "Latest early change advanced");
            }
            DiagEvent::LatestStaticUpdated { timestamp_ms } => {
                tracing::trace!(timestamp_ms, "Latest static change advanced");
            }
            DiagEvent::Decision {
                found,
                stable_at_ms,
                high_confidence,
                latest_of_early,
                latest_of_static,
                latest_of_first,
                determined,
            } => {
                tracing::debug!(
                    found,
                    stable_at_ms,
                    high_confidence,
                    latest_of_early,
                    latest_of_static,
                    latest_of_first,
                    determined,
                    "Stability decision"
                );
            }
        }
    }
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: &DiagEvent) {}
}

/// Sink that retains every event, for test assertions.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: RefCell<Vec<DiagEvent>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event recorded so far.
    pub fn events(&self) -> Vec<DiagEvent> {
        self.events.borrow().clone()
    }

    /// Returns the events matching `predicate`.
    pub fn filtered(&self, predicate: impl Fn(&DiagEvent) -> bool) -> Vec<DiagEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }
}

impl DiagnosticsSink for CollectingSink {
    fn record(&self, event: &DiagEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_retains_events() {
        let sink = CollectingSink::new();
        sink.record(&DiagEvent::CropIgnored);
        sink.record(&DiagEvent::LatestEarlyUpdated { timestamp_ms: 7 });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], DiagEvent::CropIgnored);
    }

    #[test]
    fn test_filtered_selects_matching() {
        let sink = CollectingSink::new();
        sink.record(&DiagEvent::LatestEarlyUpdated { timestamp_ms: 1 });
        sink.record(&DiagEvent::CropIgnored);
        sink.record(&DiagEvent::LatestEarlyUpdated { timestamp_ms: 2 });

        let early = sink.filtered(|e| matches!(e, DiagEvent::LatestEarlyUpdated { .. }));
        assert_eq!(early.len(), 2);
    }
}
