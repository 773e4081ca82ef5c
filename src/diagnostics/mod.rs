//! Structured diagnostics for the analysis pipeline.
//!
//! Every observable step of the analysis (frames accepted or skipped,
//! running-maximum updates, the final decision) is reported as a
//! [`DiagEvent`] through an injectable [`DiagnosticsSink`], keeping the
//! core independent of any concrete logging mechanism.

mod sink;

pub use sink::{CollectingSink, DiagEvent, DiagnosticsSink, NullSink, SkipReason, TracingSink};
