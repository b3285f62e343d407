//! Shared aggregation of completed durations
//!
//! Any number of event delivery threads append concurrently. Growth is
//! append-only, so a mutex per map is enough.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

/// Durations per identifier and unsupported event type names
#[derive(Debug, Default)]
pub struct ExecutionRegistry {
    executions: Mutex<BTreeMap<String, Vec<i64>>>,
    unsupported: Mutex<BTreeSet<String>>,
}

/// Point-in-time copy of an [`ExecutionRegistry`]
///
/// Keys of `executions` always hold at least one sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub executions: BTreeMap<String, Vec<i64>>,
    pub unsupported: BTreeSet<String>,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.executions.is_empty() && self.unsupported.is_empty()
    }
}

impl ExecutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample for `identifier`
    ///
    /// Samples must be non-negative; negative durations are filtered out by
    /// the timing tracker before they get here.
    pub fn record(&self, identifier: &str, duration_ms: i64) {
        debug_assert!(
            duration_ms >= 0,
            "negative duration {duration_ms} ms recorded for {identifier}"
        );
        let mut executions = self
            .executions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        executions
            .entry(identifier.to_string())
            .or_default()
            .push(duration_ms);
    }

    /// Remember an event type that could not be classified
    pub fn record_unsupported(&self, type_name: &str) {
        let mut unsupported = self
            .unsupported
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !unsupported.contains(type_name) {
            unsupported.insert(type_name.to_string());
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let executions = self
            .executions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let unsupported = self
            .unsupported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        RegistrySnapshot {
            executions,
            unsupported,
        }
    }

    /// Forget everything recorded so far
    pub fn reset(&self) {
        self.executions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.unsupported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
