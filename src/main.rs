use anyhow::{Context, Result};
use clap::Parser;
use maven_profiler::{
    cli::Cli,
    clock::ManualClock,
    profiler::{MemorySink, Profiler},
    replay,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_log(cli: &Cli) -> Result<Vec<replay::ReplayRecord>> {
    let records = if cli.reads_stdin() {
        replay::read_records(io::stdin().lock())?
    } else {
        let file = File::open(&cli.input)
            .with_context(|| format!("Failed to open event log {}", cli.input.display()))?;
        replay::read_records(BufReader::new(file))
            .with_context(|| format!("Failed to replay {}", cli.input.display()))?
    };
    Ok(records)
}

fn write_report(cli: &Cli, lines: &[String]) -> Result<()> {
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create report file {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(cli.debug);

    let records = read_log(&cli)?;

    let sink = Arc::new(MemorySink::new());
    let profiler = Profiler::with_clock(Arc::new(ManualClock::new(0)), Arc::clone(&sink));
    replay::replay(&profiler, &records);
    profiler.close();

    write_report(&cli, &sink.lines())
}
