//! Timing report rendering
//!
//! Produces the report as an ordered list of lines; where they end up
//! (log, stdout, file) is up to the caller.

use crate::format::format_duration;
use crate::registry::RegistrySnapshot;

/// Line closing each report section
pub const SEPARATOR: &str =
    "------------------------------------------------------------------------";

/// Aggregated statistics for one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub identifier: String,
    pub count: usize,
    pub total: i64,
    pub min: i64,
    pub max: i64,
    /// Truncating integer average
    pub avg: i64,
}

impl ExecutionSummary {
    /// Summarize samples; `None` when there are none
    pub fn from_samples(identifier: &str, samples: &[i64]) -> Option<Self> {
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        let total: i64 = samples.iter().sum();
        let count = samples.len();

        Some(Self {
            identifier: identifier.to_string(),
            count,
            total,
            min,
            max,
            avg: total / count as i64,
        })
    }

    /// `[total] executions: count, min: .., max: .., avg: .. - identifier`
    pub fn display_line(&self) -> String {
        format!(
            "[{}] executions: {:>3}, min: {}, max: {}, avg: {} - {}",
            format_duration(self.total),
            self.count,
            format_duration(self.min),
            format_duration(self.max),
            format_duration(self.avg),
            self.identifier
        )
    }
}

/// Summaries ordered by total descending, ties by identifier ascending
pub fn summarize(snapshot: &RegistrySnapshot) -> Vec<ExecutionSummary> {
    let mut summaries: Vec<_> = snapshot
        .executions
        .iter()
        .filter_map(|(identifier, samples)| ExecutionSummary::from_samples(identifier, samples))
        .collect();
    summaries.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
    summaries
}

/// Render the full report
pub fn render(snapshot: &RegistrySnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    let summaries = summarize(snapshot);
    if !summaries.is_empty() {
        lines.push("Execution times:".to_string());
        lines.extend(summaries.iter().map(ExecutionSummary::display_line));
    }

    if !snapshot.unsupported.is_empty() {
        lines.push(SEPARATOR.to_string());
        lines.push("Unsupported events encountered:".to_string());
        lines.extend(snapshot.unsupported.iter().map(|name| format!(" - {}", name)));
    }

    lines.push(SEPARATOR.to_string());
    lines
}
