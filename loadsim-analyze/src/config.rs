use clap::ValueEnum;
use std::path::PathBuf;

/// Shortest duration handed to a worker; the rest count up from here.
pub const DEFAULT_MIN_DURATION_SECS: u64 = 2;

/// Environment variable that overrides where the stress binary is found.
pub const STRESS_BIN_ENV: &str = "LOADSIM_STRESS_BIN";

/// File name of the child binary, looked up next to the running executable.
pub const STRESS_BIN_NAME: &str = "loadsim-stress";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Concurrency substrate a worker runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WorkerMode {
    /// Spawn `loadsim-stress` and parse its stdout.
    #[default]
    Process,
    /// Run the generator in-process on a blocking thread.
    Thread,
}

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub workers: u32,
    pub mode: WorkerMode,
    pub min_duration_secs: u64,
    /// Explicit path to the stress binary; `None` looks next to the current executable.
    pub stress_bin: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(workers: u32) -> Self {
        RunConfig {
            workers,
            mode: WorkerMode::default(),
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            stress_bin: None,
        }
    }
}

/// How the final summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
