use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use loadsim_analyze::config::{
    OutputFormat, RunConfig, WorkerMode, DEFAULT_LOG_FILTER, DEFAULT_MIN_DURATION_SECS, STRESS_BIN_ENV,
};
use loadsim_analyze::metrics::Summary;
use loadsim_analyze::{report, runner, schedule};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "loadsim",
    about = "Spawn concurrent stress workers and summarize their samples",
    allow_negative_numbers = true
)]
struct Args {
    /// Number of workers to spawn
    #[arg(value_parser = parse_workers)]
    workers: u32,

    /// Run each worker as a child process or as an in-process thread
    #[arg(long, value_enum, default_value_t = WorkerMode::Process)]
    mode: WorkerMode,

    /// Duration of the shortest worker (seconds); the others run 1s longer each
    #[arg(long, default_value_t = DEFAULT_MIN_DURATION_SECS)]
    min_duration: u64,

    /// Path to the loadsim-stress binary (defaults to the one next to this executable)
    #[arg(long, env = STRESS_BIN_ENV)]
    stress_bin: Option<PathBuf>,

    /// Output format of the summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn parse_workers(raw: &str) -> Result<u32, String> {
    let workers: i64 = raw.parse().map_err(|e| format!("{e}"))?;
    if workers < 1 {
        return Err("number of workers must be greater than 0".to_string());
    }
    u32::try_from(workers).map_err(|_| format!("number of workers must be at most {}", u32::MAX))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let config = RunConfig {
        workers: args.workers,
        mode: args.mode,
        min_duration_secs: args.min_duration,
        stress_bin: args.stress_bin,
    };

    let durations = schedule::assign_durations(config.workers, config.min_duration_secs, &mut rand::thread_rng())
        .unwrap_or_else(|e| Args::command().error(ErrorKind::ValueValidation, e).exit());
    tracing::debug!(?durations, expected_samples = schedule::expected_samples(&durations), "durations assigned");

    let outcome = runner::run_with_config(&config, &durations).await.unwrap_or_else(|e| {
        eprintln!("Failed to start workers: {e}");
        process::exit(3);
    });

    for failure in &outcome.failures {
        eprintln!(
            "WORKER FAILED slot={} duration={}s {}",
            failure.slot, failure.duration_secs, failure.error
        );
    }

    let summary = Summary::from_results(&outcome.results).unwrap_or_else(|e| {
        eprintln!("{e}: {} of {} workers failed", outcome.failures.len(), durations.len());
        process::exit(3);
    });

    match args.format {
        OutputFormat::Text => println!("{}", report::render(&summary)),
        OutputFormat::Json => match report::render_json(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to encode summary: {e}");
                process::exit(3);
            }
        },
    }

    if !outcome.is_complete() {
        process::exit(1);
    }
}
