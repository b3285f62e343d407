//! Per-thread start/end pairing
//!
//! The host may deliver events from several build threads at once. Each
//! thread gets its own map of pending starts, keyed explicitly by
//! [`ThreadKey`], so timings never cross threads. A second start for an
//! identifier that is still pending on the same thread replaces the first.

use crate::clock::Clock;
use crate::error::TimingError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

/// Identity of the thread an event was delivered on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreadKey {
    Os(ThreadId),
    /// Logical thread, for replayed event logs and tests
    Named(String),
}

impl ThreadKey {
    /// Key of the calling OS thread
    pub fn current() -> Self {
        ThreadKey::Os(thread::current().id())
    }

    pub fn named(name: impl Into<String>) -> Self {
        ThreadKey::Named(name.into())
    }
}

/// Tracks pending start timestamps per thread and identifier
#[derive(Debug)]
pub struct TimingTracker<C> {
    clock: C,
    starts: Mutex<HashMap<ThreadKey, HashMap<String, i64>>>,
}

impl<C: Clock> TimingTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            starts: Mutex::new(HashMap::new()),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Record a start for `identifier` on `thread`
    pub fn on_start(&self, thread: &ThreadKey, identifier: &str) {
        let now = self.clock.now_millis();
        let mut starts = self.starts.lock().unwrap_or_else(PoisonError::into_inner);
        starts
            .entry(thread.clone())
            .or_default()
            .insert(identifier.to_string(), now);
    }

    /// Close the pending start for `identifier` on `thread`
    ///
    /// Returns the elapsed milliseconds. The pending start is consumed even
    /// when the clock moved backwards.
    pub fn on_end(&self, thread: &ThreadKey, identifier: &str) -> Result<i64, TimingError> {
        let now = self.clock.now_millis();
        let started_at = {
            let mut starts = self.starts.lock().unwrap_or_else(PoisonError::into_inner);
            let started_at = starts
                .get_mut(thread)
                .and_then(|pending| pending.remove(identifier));
            if starts.get(thread).is_some_and(HashMap::is_empty) {
                starts.remove(thread);
            }
            started_at
        };

        let Some(started_at) = started_at else {
            return Err(TimingError::NotStarted {
                identifier: identifier.to_string(),
            });
        };

        let duration = now - started_at;
        if duration < 0 {
            return Err(TimingError::ClockWentBackwards {
                identifier: identifier.to_string(),
                millis: -duration,
            });
        }
        Ok(duration)
    }

    /// Number of threads with at least one unmatched start
    pub fn tracked_threads(&self) -> usize {
        self.starts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of unmatched starts on `thread`
    pub fn pending(&self, thread: &ThreadKey) -> usize {
        let starts = self.starts.lock().unwrap_or_else(PoisonError::into_inner);
        starts.get(thread).map_or(0, HashMap::len)
    }
}
