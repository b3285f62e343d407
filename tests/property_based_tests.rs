//! Property-based tests for formatting, pairing and report ordering

use maven_profiler::clock::ManualClock;
use maven_profiler::event::{ExecutionEvent, ExecutionEventType, MojoExecution};
use maven_profiler::format::format_duration;
use maven_profiler::profiler::{EventOutcome, MemorySink, Profiler};
use maven_profiler::registry::RegistrySnapshot;
use maven_profiler::report::{render, summarize, SEPARATOR};
use maven_profiler::timing::ThreadKey;
use maven_profiler::RawEvent;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_format_width_is_fixed(ms in 0i64..360_000_000) {
        // Property: everything under 100 hours renders to 10 characters
        let formatted = format_duration(ms);
        prop_assert_eq!(formatted.len(), 10, "{}", formatted);
        prop_assert!(
            formatted.ends_with(" sec") || formatted.ends_with(" min") || formatted.ends_with(" hrs")
        );
    }

    #[test]
    fn prop_format_seconds_branch_is_exact(ms in 0i64..100_000) {
        let expected = format!("{:>2}.{:03} sec", ms / 1000, ms % 1000);
        prop_assert_eq!(format_duration(ms), expected);
    }
}

fn snapshot_strategy() -> impl Strategy<Value = RegistrySnapshot> {
    let executions = prop::collection::btree_map(
        "[a-z]{1,8}",
        prop::collection::vec(0i64..10_000_000, 1..6),
        0..8,
    );
    let unsupported = prop::collection::btree_set("[a-z.]{1,12}", 0..4);
    (executions, unsupported).prop_map(|(executions, unsupported)| RegistrySnapshot {
        executions,
        unsupported,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_render_is_idempotent(snapshot in snapshot_strategy()) {
        prop_assert_eq!(render(&snapshot), render(&snapshot));
    }

    #[test]
    fn prop_render_shape(snapshot in snapshot_strategy()) {
        let lines = render(&snapshot);
        prop_assert_eq!(lines.last().map(String::as_str), Some(SEPARATOR));

        let header = usize::from(!snapshot.executions.is_empty());
        let unsupported_block = if snapshot.unsupported.is_empty() {
            0
        } else {
            2 + snapshot.unsupported.len()
        };
        prop_assert_eq!(
            lines.len(),
            header + snapshot.executions.len() + unsupported_block + 1
        );
    }

    #[test]
    fn prop_summaries_sorted_by_total_descending(snapshot in snapshot_strategy()) {
        let summaries = summarize(&snapshot);
        prop_assert_eq!(summaries.len(), snapshot.executions.len());
        for pair in summaries.windows(2) {
            prop_assert!(
                pair[0].total > pair[1].total
                    || (pair[0].total == pair[1].total && pair[0].identifier < pair[1].identifier)
            );
        }
        for summary in &summaries {
            prop_assert!(summary.min <= summary.avg && summary.avg <= summary.max);
        }
    }

    #[test]
    fn prop_pairs_record_one_sample_each(durations in prop::collection::vec(0i64..100_000, 1..20)) {
        let profiler = Profiler::with_clock(Arc::new(ManualClock::new(0)), MemorySink::new());
        let main = ThreadKey::named("main");
        let execution = MojoExecution::new("g", "a", "goal", "id");
        let started = RawEvent::Execution(ExecutionEvent::mojo(
            ExecutionEventType::MojoStarted,
            execution.clone(),
        ));
        let succeeded = RawEvent::Execution(ExecutionEvent::mojo(
            ExecutionEventType::MojoSucceeded,
            execution,
        ));

        for &duration in &durations {
            profiler.on_event_from(&main, &started);
            profiler.clock().advance(duration);
            prop_assert_eq!(
                profiler.on_event_from(&main, &succeeded),
                EventOutcome::Recorded(duration)
            );
        }

        let mut expected = BTreeMap::new();
        expected.insert("g:a:goal@id".to_string(), durations);
        prop_assert_eq!(profiler.snapshot().executions, expected);
    }
}
