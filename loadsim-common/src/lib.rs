use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod table;

/// Exclusive upper bound for a sampled throughput value (ops/s).
pub const THROUGHPUT_MAX: u64 = 100_000;
/// Exclusive upper bound for a sampled latency value (ms).
pub const LATENCY_MAX: u64 = 20_000;

/// One synthetic reading, emitted once per elapsed second of a stress run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub throughput: u64,
    pub latency: u64,
}

/// Errors raised while reading a stress process's tabular output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Output is missing the header row")]
    MissingHeader,

    #[error("Header has no {0:?} column")]
    MissingColumn(String),

    #[error("Malformed row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// Result type for wire-format operations
pub type Result<T> = std::result::Result<T, FormatError>;
