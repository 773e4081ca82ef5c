//! Decoded video frames and frame delivery.
//!
//! This module provides the frame type the analysis consumes and a
//! trait-based abstraction over frame delivery. Decoding video and
//! generating capture timestamps happen upstream; the analysis only
//! ever sees decoded RGB buffers with millisecond timestamps.

mod frame;
mod source;

pub use frame::Frame;
pub use source::{FrameSource, ScriptedSource};
