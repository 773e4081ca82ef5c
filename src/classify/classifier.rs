//! Classification scan and final decision.
//!
//! One pass over every analyzed pixel maintains three running maxima:
//! the latest change among early-stabilizing pixels, the latest change
//! among static (few-changes) pixels whose whole 3x3 neighborhood is
//! also static, and the latest first-change time. A pixel that changed
//! late but only at noise level marks the whole result undetermined.

use super::heatmap::{color, HeatMapPainter};
use crate::diagnostics::{DiagEvent, DiagnosticsSink};
use crate::tracker::{CropRegion, StatGrid, Thresholds};
use crate::video::Frame;

/// Confidence attached to a stability timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// The latest static change and the latest early change agree.
    High,
    /// The result rests on static pixels alone.
    Low,
}

/// A found stability time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityVerdict {
    /// Milliseconds since session start at which the analyzed area
    /// stopped meaningfully changing.
    pub stable_at_ms: u32,
    /// How trustworthy the timestamp is.
    pub confidence: Confidence,
}

/// Outcome of the classification pass.
#[derive(Debug)]
pub struct Classification {
    /// `None` when no frames were analyzed or the result is
    /// undetermined.
    pub verdict: Option<StabilityVerdict>,
    /// Diagnostic heat-map, present when requested and at least one
    /// frame established the session dimensions.
    pub heat_map: Option<Frame>,
}

impl Classification {
    /// The outcome for a session that never saw a valid frame.
    pub(crate) fn empty() -> Self {
        Self {
            verdict: None,
            heat_map: None,
        }
    }

    /// Returns true if a stability time was determined.
    pub fn found(&self) -> bool {
        self.verdict.is_some()
    }
}

/// Derives the stability verdict from the accumulated statistics.
///
/// Read-only over `stats`; the only side effects are diagnostics and
/// the optionally painted heat-map. `frame_width` and `frame_height`
/// are the full input dimensions, used to size the heat-map; pixels
/// outside the cropped rectangle are never painted.
pub fn classify(
    stats: &StatGrid,
    thresholds: &Thresholds,
    crop: &CropRegion,
    frame_width: u32,
    frame_height: u32,
    want_heat_map: bool,
    sink: &dyn DiagnosticsSink,
) -> Classification {
    let mut painter = HeatMapPainter::new(want_heat_map, frame_width, frame_height);

    // Tracked for diagnostics; deliberately not part of the decision.
    let mut latest_of_first = 0u32;
    let mut latest_of_early = 0u32;
    let mut latest_of_static = 0u32;
    let mut determined = true;

    for row in 0..stats.height() {
        for col in 0..stats.width() {
            let stat = stats.get(col, row);
            let x = crop.left + col;
            let y = crop.top + row;
            let is_early = stat.last_change_ms < thresholds.early_cutoff_ms;
            let few_changes = stat.change_count < thresholds.pixel_change_count_threshold;

            if stat.first_change_ms > latest_of_first {
                latest_of_first = stat.first_change_ms;
            }

            if stat.change_count == 0 {
                painter.paint(x, y, color::UNCHANGED);
                continue;
            }

            // Late-stabilizing noise makes the result undetermined.
            if !is_early && few_changes {
                determined = false;
                painter.paint(x, y, color::LATE_NOISE);
            }

            if is_early {
                if stat.last_change_ms > latest_of_early {
                    latest_of_early = stat.last_change_ms;
                    sink.record(&DiagEvent::LatestEarlyUpdated {
                        timestamp_ms: latest_of_early,
                    });
                }
                painter.paint(x, y, color::EARLY);
            }

            if few_changes {
                // A static pixel only moves the maximum when its whole
                // neighborhood is static too, so a lone quiet pixel at
                // the edge of a dynamic region cannot decide the time.
                if stat.last_change_ms > latest_of_static
                    && neighborhood_is_static(stats, thresholds, col, row)
                {
                    latest_of_static = stat.last_change_ms;
                    sink.record(&DiagEvent::LatestStaticUpdated {
                        timestamp_ms: latest_of_static,
                    });
                }
            } else if !is_early {
                painter.paint(x, y, color::DYNAMIC);
            }
        }
    }

    let verdict = if latest_of_static == latest_of_early {
        Some(StabilityVerdict {
            stable_at_ms: latest_of_early,
            confidence: Confidence::High,
        })
    } else if determined {
        Some(StabilityVerdict {
            stable_at_ms: latest_of_static,
            confidence: Confidence::Low,
        })
    } else {
        None
    };

    sink.record(&DiagEvent::Decision {
        found: verdict.is_some(),
        stable_at_ms: verdict.map_or(0, |v| v.stable_at_ms),
        high_confidence: matches!(
            verdict,
            Some(StabilityVerdict {
                confidence: Confidence::High,
                ..
            })
        ),
        latest_of_early,
        latest_of_static,
        latest_of_first,
        determined,
    });

    // Second pass: mark the pixels that defined the result.
    if let Some(v) = verdict {
        if v.stable_at_ms > 0 {
            for row in 0..stats.height() {
                for col in 0..stats.width() {
                    if stats.get(col, row).last_change_ms == v.stable_at_ms {
                        painter.paint(crop.left + col, crop.top + row, color::DECISIVE);
                    }
                }
            }
        }
    }

    Classification {
        verdict,
        heat_map: painter.into_frame(),
    }
}

/// Checks that every pixel of the 3x3 window around `(col, row)` stays
/// below the per-pixel change threshold.
///
/// The window is clamped per-axis to the analyzed rectangle's inclusive
/// bounds and indexed per-row, so edge pixels never consult a neighbor
/// from an adjacent row.
fn neighborhood_is_static(stats: &StatGrid, thresholds: &Thresholds, col: u32, row: u32) -> bool {
    let c1 = col.saturating_sub(1);
    let c2 = (col + 1).min(stats.width() - 1);
    let r1 = row.saturating_sub(1);
    let r2 = (row + 1).min(stats.height() - 1);
    for rr in r1..=r2 {
        for cc in c1..=c2 {
            if stats.get(cc, rr).change_count >= thresholds.pixel_change_count_threshold {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NullSink};

    fn thresholds() -> Thresholds {
        Thresholds {
            min_changes_per_frame: 1,
            early_cutoff_ms: 1000,
            pixel_change_count_threshold: 3,
        }
    }

    fn grid(width: u32, height: u32) -> StatGrid {
        StatGrid::allocate(width, height).unwrap()
    }

    fn set(grid: &mut StatGrid, col: u32, row: u32, count: u32, first: u32, last: u32) {
        let stat = grid.get_mut(col, row);
        stat.change_count = count;
        stat.first_change_ms = first;
        stat.last_change_ms = last;
    }

    fn run(stats: &StatGrid, heat_map: bool) -> Classification {
        classify(
            stats,
            &thresholds(),
            &CropRegion::default(),
            stats.width(),
            stats.height(),
            heat_map,
            &NullSink,
        )
    }

    #[test]
    fn test_no_changes_is_high_confidence_at_zero() {
        let stats = grid(4, 4);
        let result = run(&stats, true);

        assert_eq!(
            result.verdict,
            Some(StabilityVerdict {
                stable_at_ms: 0,
                confidence: Confidence::High,
            })
        );
        let map = result.heat_map.unwrap();
        assert_eq!(map.pixel(2, 2), color::UNCHANGED);
    }

    #[test]
    fn test_all_early_agrees_at_high_confidence() {
        let mut stats = grid(4, 4);
        // Early dynamic pixel and, far from it, an early static one
        // that last changed at the same moment.
        set(&mut stats, 0, 0, 5, 100, 800);
        set(&mut stats, 3, 3, 2, 200, 800);
        let result = run(&stats, true);

        assert_eq!(
            result.verdict,
            Some(StabilityVerdict {
                stable_at_ms: 800,
                confidence: Confidence::High,
            })
        );
        let map = result.heat_map.unwrap();
        // Both defined the end time, so the decisive pass wins.
        assert_eq!(map.pixel(0, 0), color::DECISIVE);
        assert_eq!(map.pixel(3, 3), color::DECISIVE);
    }

    #[test]
    fn test_late_noise_pixel_forces_undetermined() {
        let mut stats = grid(4, 4);
        set(&mut stats, 0, 0, 2, 100, 500); // clean early pixel
        set(&mut stats, 3, 3, 1, 1200, 1200); // late, noise-level
        let result = run(&stats, true);

        assert!(result.verdict.is_none());
        let map = result.heat_map.unwrap();
        assert_eq!(map.pixel(3, 3), color::LATE_NOISE);
        assert_eq!(map.pixel(0, 0), color::EARLY);
    }

    #[test]
    fn test_static_only_result_is_low_confidence() {
        let mut stats = grid(6, 6);
        set(&mut stats, 0, 0, 5, 100, 900); // early dynamic
        set(&mut stats, 5, 5, 2, 200, 500); // early static
        set(&mut stats, 3, 0, 5, 100, 1500); // late dynamic, blue
        let result = run(&stats, true);

        // Early maximum (900) disagrees with the static maximum (500),
        // but nothing made the result undetermined.
        assert_eq!(
            result.verdict,
            Some(StabilityVerdict {
                stable_at_ms: 500,
                confidence: Confidence::Low,
            })
        );
        let map = result.heat_map.unwrap();
        assert_eq!(map.pixel(3, 0), color::DYNAMIC);
        assert_eq!(map.pixel(5, 5), color::DECISIVE);
        assert_eq!(map.pixel(0, 0), color::EARLY);
    }

    #[test]
    fn test_dynamic_neighbor_vetoes_static_update() {
        let mut stats = grid(3, 3);
        set(&mut stats, 1, 1, 8, 100, 100); // dynamic, early
        set(&mut stats, 0, 0, 1, 600, 600); // static, but adjacent

        let sink = CollectingSink::new();
        let result = classify(
            &stats,
            &thresholds(),
            &CropRegion::default(),
            3,
            3,
            false,
            &sink,
        );

        assert!(sink
            .filtered(|e| matches!(e, DiagEvent::LatestStaticUpdated { .. }))
            .is_empty());
        // Static maximum stayed at 0, early maximum is 600.
        assert_eq!(
            result.verdict,
            Some(StabilityVerdict {
                stable_at_ms: 0,
                confidence: Confidence::Low,
            })
        );
    }

    #[test]
    fn test_edge_pixel_window_stays_in_row() {
        // Rightmost column of a 3-wide grid: a naive flattened-index
        // window would read the next row's leftmost pixel. The dynamic
        // pixel at (0, 2) must not veto the static pixel at (2, 1).
        let mut stats = grid(3, 3);
        set(&mut stats, 2, 1, 1, 600, 600);
        set(&mut stats, 0, 2, 9, 100, 100);

        let sink = CollectingSink::new();
        classify(
            &stats,
            &thresholds(),
            &CropRegion::default(),
            3,
            3,
            false,
            &sink,
        );

        assert_eq!(
            sink.filtered(|e| matches!(e, DiagEvent::LatestStaticUpdated { .. })),
            vec![DiagEvent::LatestStaticUpdated { timestamp_ms: 600 }]
        );
    }

    #[test]
    fn test_crop_offsets_heat_map_coordinates() {
        let mut stats = grid(2, 2);
        set(&mut stats, 0, 0, 1, 1200, 1200);
        let crop = CropRegion::new(1, 1, 1, 1);
        let result = classify(&stats, &thresholds(), &crop, 4, 4, true, &NullSink);

        let map = result.heat_map.unwrap();
        assert_eq!(map.width(), 4);
        // Cropped (0, 0) is frame (1, 1); the margins stay black.
        assert_eq!(map.pixel(1, 1), color::LATE_NOISE);
        assert_eq!(map.pixel(0, 0), color::UNCHANGED);
    }

    // End-to-end sessions through the tracker.

    fn session_frames() -> (crate::tracker::PixelChangeTracker, Frame) {
        let tracker = crate::tracker::PixelChangeTracker::new(thresholds());
        (tracker, Frame::black(4, 4))
    }

    #[test]
    fn test_late_noise_session_is_undetermined() {
        let (mut tracker, base) = session_frames();
        tracker.add_frame(&base, 0).unwrap();

        // One changed pixel does not exceed the frame threshold of 1;
        // the differences are discarded but the baseline advances.
        let mut noisy = base.clone();
        noisy.set_pixel(1, 1, [200, 0, 0]);
        tracker.add_frame(&noisy, 500).unwrap();

        // Two changed pixels exceed it and are committed at 1200 ms.
        let mut late = noisy.clone();
        late.set_pixel(1, 1, [0, 200, 0]);
        late.set_pixel(2, 2, [0, 200, 0]);
        tracker.add_frame(&late, 1200).unwrap();

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.get(1, 1).change_count, 1);
        assert_eq!(stats.get(1, 1).first_change_ms, 1200);
        assert_eq!(stats.get(1, 1).last_change_ms, 1200);

        // Both pixels stabilized late with noise-level activity.
        let result = tracker.classify(false);
        assert!(result.verdict.is_none());
    }

    #[test]
    fn test_persistent_blinker_classified_dynamic() {
        let (mut tracker, base) = session_frames();
        tracker.add_frame(&base, 0).unwrap();

        // The same two pixels toggle in every frame until their change
        // count reaches the per-pixel threshold.
        let mut lit = base.clone();
        lit.set_pixel(1, 1, [255, 255, 255]);
        lit.set_pixel(2, 2, [255, 255, 255]);
        for (i, timestamp) in [200u32, 600, 1200, 1800].into_iter().enumerate() {
            let frame = if i % 2 == 0 { &lit } else { &base };
            tracker.add_frame(frame, timestamp).unwrap();
        }

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.get(1, 1).change_count, 4);
        assert_eq!(stats.get(1, 1).last_change_ms, 1800);

        // Dynamic pixels do not block determinacy; everything else
        // never changed, so the session counts as stable throughout.
        let result = tracker.classify(true);
        assert_eq!(
            result.verdict,
            Some(StabilityVerdict {
                stable_at_ms: 0,
                confidence: Confidence::High,
            })
        );
        let map = result.heat_map.unwrap();
        assert_eq!(map.pixel(1, 1), color::DYNAMIC);
        assert_eq!(map.pixel(0, 0), color::UNCHANGED);
    }

    #[test]
    fn test_decision_event_reports_maxima() {
        let mut stats = grid(4, 4);
        set(&mut stats, 0, 0, 2, 300, 800);
        let sink = CollectingSink::new();
        classify(
            &stats,
            &thresholds(),
            &CropRegion::default(),
            4,
            4,
            false,
            &sink,
        );

        let decisions = sink.filtered(|e| matches!(e, DiagEvent::Decision { .. }));
        assert_eq!(
            decisions,
            vec![DiagEvent::Decision {
                found: true,
                stable_at_ms: 800,
                high_confidence: true,
                latest_of_early: 800,
                latest_of_static: 800,
                latest_of_first: 300,
                determined: true,
            }]
        );
    }
}
