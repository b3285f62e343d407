//! Maven profiler - build lifecycle timing from start/end events
//!
//! This library correlates the lifecycle events a build tool emits
//! (settings and toolchains building, dependency resolution, artifact
//! transfers, plugin goal executions) into per-phase durations and renders
//! them as a ranked report.

pub mod cli;
pub mod clock;
pub mod error;
pub mod event;
pub mod format;
pub mod profiler;
pub mod registry;
pub mod replay;
pub mod report;
pub mod timing;

pub use event::{classify, Classification, Event, RawEvent};
pub use profiler::{EventOutcome, Profiler, ReportSink};
