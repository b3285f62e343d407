//! Fixed-width duration formatting for the timing report
//!
//! Every branch renders to the same width so report columns line up:
//! - `SS.mmm sec` under 100 seconds
//! - `MMM:SS min` under 100 minutes
//! - `HHH:MM hrs` for the rest
//!
//! Sub-unit remainders are truncated, never rounded.

/// Format a duration given in milliseconds
///
/// # Example
/// ```
/// use maven_profiler::format::format_duration;
///
/// assert_eq!(format_duration(6123), " 6.123 sec");
/// assert_eq!(format_duration(226345), "  3:46 min");
/// assert_eq!(format_duration(8595677), "  2:23 hrs");
/// ```
pub fn format_duration(duration_ms: i64) -> String {
    let seconds = duration_ms / 1000;
    if seconds < 100 {
        let millis = duration_ms % 1000;
        return format!("{:>2}.{:03} sec", seconds, millis);
    }

    let minutes = seconds / 60;
    if minutes < 100 {
        return format!("{:>3}:{:02} min", minutes, seconds % 60);
    }

    let hours = minutes / 60;
    format!("{:>3}:{:02} hrs", hours, minutes % 60)
}
