use clap::Parser;
use loadsim_stress::config::DEFAULT_LOG_FILTER;
use loadsim_stress::{generate, write_table};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "loadsim-stress", about = "Emit one synthetic throughput/latency sample per second")]
struct Args {
    /// How long to run (seconds)
    duration: u64,
}

fn main() {
    let args = Args::parse();

    // stdout carries the sample table, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    tracing::debug!(duration = args.duration, pid = process::id(), "stress run starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match write_table(&mut out, generate(args.duration)) {
        Ok(rows) => tracing::debug!(rows, "stress run finished"),
        Err(e) => {
            tracing::error!(error = %e, "failed to write samples");
            process::exit(1);
        }
    }
}
