use std::time::Duration;

/// Spacing between consecutive samples, measured from the start of a run.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";
