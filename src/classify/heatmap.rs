//! Diagnostic heat-map painting.

use crate::video::Frame;

/// Heat-map colors, one per pixel classification.
pub mod color {
    /// Never changed over the whole session.
    pub const UNCHANGED: [u8; 3] = [0, 0, 0];
    /// Changed late with only noise-level activity; makes the overall
    /// result undetermined.
    pub const LATE_NOISE: [u8; 3] = [255, 0, 0];
    /// Stabilized before the early cutoff.
    pub const EARLY: [u8; 3] = [255, 255, 255];
    /// Actively changing past the early cutoff.
    pub const DYNAMIC: [u8; 3] = [0, 0, 255];
    /// Last changed exactly at the resulting stability time.
    pub const DECISIVE: [u8; 3] = [0, 255, 0];
}

/// Paints classification colors into an optional full-size frame.
///
/// When no heat-map was requested every paint call is a no-op, so the
/// classification scan does not need to branch on the request.
pub(crate) struct HeatMapPainter {
    frame: Option<Frame>,
}

impl HeatMapPainter {
    /// Creates a painter over an all-black frame of the full input
    /// dimensions, or an inert painter when `wanted` is false.
    pub(crate) fn new(wanted: bool, width: u32, height: u32) -> Self {
        Self {
            frame: wanted.then(|| Frame::black(width, height)),
        }
    }

    /// Paints one pixel, in full-frame coordinates.
    #[inline]
    pub(crate) fn paint(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if let Some(frame) = self.frame.as_mut() {
            frame.set_pixel(x, y, rgb);
        }
    }

    /// Consumes the painter, yielding the painted frame if one was
    /// requested.
    pub(crate) fn into_frame(self) -> Option<Frame> {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_painter_yields_nothing() {
        let mut painter = HeatMapPainter::new(false, 4, 4);
        painter.paint(0, 0, color::EARLY);
        assert!(painter.into_frame().is_none());
    }

    #[test]
    fn test_painted_frame_keeps_colors() {
        let mut painter = HeatMapPainter::new(true, 4, 4);
        painter.paint(1, 2, color::LATE_NOISE);
        painter.paint(1, 2, color::EARLY); // later paint wins

        let frame = painter.into_frame().unwrap();
        assert_eq!(frame.pixel(1, 2), color::EARLY);
        assert_eq!(frame.pixel(0, 0), color::UNCHANGED);
    }
}
