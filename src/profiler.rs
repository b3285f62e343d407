//! Profiler: wires classification, timing and aggregation to the host
//!
//! The host calls [`Profiler::on_event`] once per lifecycle event and
//! [`Profiler::close`] once when the build is over. Nothing in here aborts
//! event processing: unknown shapes are counted, unmatched ends and clock
//! anomalies are logged and dropped.

use crate::clock::{Clock, SystemClock};
use crate::error::TimingError;
use crate::event::{classify, Classification, RawEvent};
use crate::registry::{ExecutionRegistry, RegistrySnapshot};
use crate::report;
use crate::timing::{ThreadKey, TimingTracker};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, trace, warn};

/// Receives the rendered report, one line at a time
pub trait ReportSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Emits report lines as `info` events
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, line: &str) {
        info!(target: "maven_profiler::report", "{}", line);
    }
}

/// Keeps report lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

impl<S: ReportSink + ?Sized> ReportSink for std::sync::Arc<S> {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

/// What a single event did to the profiler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Observed but not measured
    Ignored,
    Started,
    /// A sample of this many milliseconds was recorded
    Recorded(i64),
    /// End without a matching start on the same thread
    NotStarted,
    /// Clock moved backwards by this many milliseconds; sample dropped
    ClockAnomaly(i64),
    Unsupported,
}

/// Build lifecycle profiler
pub struct Profiler<C: Clock = SystemClock> {
    tracker: TimingTracker<C>,
    registry: ExecutionRegistry,
    sink: Box<dyn ReportSink>,
}

impl Profiler<SystemClock> {
    /// Profiler on the wall clock, reporting through `tracing`
    pub fn new() -> Self {
        Self::with_clock(SystemClock, TracingSink)
    }
}

impl Default for Profiler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Profiler<C> {
    pub fn with_clock(clock: C, sink: impl ReportSink + 'static) -> Self {
        Self {
            tracker: TimingTracker::new(clock),
            registry: ExecutionRegistry::new(),
            sink: Box::new(sink),
        }
    }

    pub fn clock(&self) -> &C {
        self.tracker.clock()
    }

    pub fn registry(&self) -> &ExecutionRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &TimingTracker<C> {
        &self.tracker
    }

    /// Host callback, on the calling thread
    pub fn on_event(&self, event: &RawEvent) -> EventOutcome {
        self.on_event_from(&ThreadKey::current(), event)
    }

    /// Host callback for an event delivered on `thread`
    pub fn on_event_from(&self, thread: &ThreadKey, raw: &RawEvent) -> EventOutcome {
        let event = match classify(raw) {
            Classification::Observed(event) => event,
            Classification::Unsupported(type_name) => {
                debug!(type_name = %type_name, "Unsupported event");
                self.registry.record_unsupported(&type_name);
                return EventOutcome::Unsupported;
            }
        };

        let Some(identifier) = event.identifier else {
            trace!(event_type = raw.type_name(), "Event observed, not measured");
            return EventOutcome::Ignored;
        };

        if event.is_start {
            trace!(identifier = %identifier, ?thread, "Start");
            self.tracker.on_start(thread, &identifier);
            return EventOutcome::Started;
        }

        match self.tracker.on_end(thread, &identifier) {
            Ok(duration) => {
                trace!(identifier = %identifier, duration_ms = duration, "End");
                self.registry.record(&identifier, duration);
                EventOutcome::Recorded(duration)
            }
            Err(err) => {
                warn!(identifier = %identifier, "{}", err);
                match err {
                    TimingError::NotStarted { .. } => EventOutcome::NotStarted,
                    TimingError::ClockWentBackwards { millis, .. } => {
                        EventOutcome::ClockAnomaly(millis)
                    }
                }
            }
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }

    /// Report lines for everything recorded so far
    pub fn render(&self) -> Vec<String> {
        report::render(&self.snapshot())
    }

    /// Shutdown hook: render the report and hand it to the sink
    pub fn close(&self) {
        let lines = self.render();
        debug!(lines = lines.len(), "Emitting timing report");
        for line in &lines {
            self.sink.emit(line);
        }
    }
}
