//! CLI argument parsing for the event log replayer

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "maven-profiler")]
#[command(version)]
#[command(about = "Replay a recorded Maven lifecycle event log and print its timing report", long_about = None)]
pub struct Cli {
    /// Event log to replay (one JSON record per line, `-` for stdin)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Whether the event log is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_input_only() {
        let cli = Cli::parse_from(["maven-profiler", "events.jsonl"]);
        assert_eq!(cli.input, PathBuf::from("events.jsonl"));
        assert!(cli.output.is_none());
        assert!(!cli.debug);
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn test_cli_stdin_and_output() {
        let cli = Cli::parse_from(["maven-profiler", "-", "-o", "report.txt", "--debug"]);
        assert!(cli.reads_stdin());
        assert_eq!(cli.output, Some(PathBuf::from("report.txt")));
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["maven-profiler"]).is_err());
    }
}
