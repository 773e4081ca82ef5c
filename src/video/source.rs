//! Frame delivery abstraction.
//!
//! The analysis pulls frames one at a time, in timestamp order, from a
//! [`FrameSource`]. Real sources wrap a video decoder or a screenshot
//! capture pipeline; [`ScriptedSource`] replays a prepared sequence for
//! demos and tests.

use super::Frame;

/// Trait for frame delivery implementations.
///
/// Sources must yield frames with non-decreasing millisecond timestamps,
/// measured from the start of the rendering session. The analysis assumes
/// but does not verify this ordering.
pub trait FrameSource {
    /// Returns the next frame and its capture timestamp, or `None` when
    /// the session is exhausted.
    fn next_frame(&mut self) -> Option<(Frame, u32)>;
}

/// Frame source that replays a prepared sequence of timestamped frames.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: Vec<(Frame, u32)>,
    cursor: usize,
}

impl ScriptedSource {
    /// Creates a source that will yield `frames` in order.
    pub fn new(frames: Vec<(Frame, u32)>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Appends a frame to the end of the script.
    pub fn push(&mut self, frame: Frame, timestamp_ms: u32) {
        self.frames.push((frame, timestamp_ms));
    }

    /// Number of frames remaining to be delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len() - self.cursor
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Option<(Frame, u32)> {
        let item = self.frames.get(self.cursor).cloned();
        if item.is_some() {
            self.cursor += 1;
        }
        item
    }
}
