use serde::Serialize;
use thiserror::Error;

use crate::collector::ResultSet;
use crate::worker::WorkerRecord;

/// Number of equal-weight groups the 95th percentile is cut from.
const PERCENTILE_GROUPS: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("No samples were collected")]
    NoData,
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(data: &[u64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let sum: u128 = data.iter().map(|&v| u128::from(v)).sum();
    Some(sum as f64 / data.len() as f64)
}

pub fn min(data: &[u64]) -> Option<u64> {
    data.iter().copied().min()
}

pub fn max(data: &[u64]) -> Option<u64> {
    data.iter().copied().max()
}

/// Cut `data` into `n` equal-probability intervals and return the `n - 1`
/// cut points.
///
/// Uses the exclusive rank-linear method: cut point `i` sits at rank
/// `i * (len + 1) / n` and is interpolated between the two neighbouring
/// order statistics, clamped to the first and last pair. The interpolation
/// numerator is computed exactly in integers and divided once, so results
/// are reproducible bit for bit.
///
/// Returns `None` when `n` is zero or there are fewer than two data points.
pub fn quantiles(data: &[u64], n: usize) -> Option<Vec<f64>> {
    if n == 0 || data.len() < 2 {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable();

    let len = sorted.len() as i128;
    let m = len + 1;
    let n = n as i128;
    let cuts = (1..n)
        .map(|i| {
            let j = (i * m / n).clamp(1, len - 1);
            let delta = i * m - j * n;
            let lower = i128::from(sorted[(j - 1) as usize]);
            let upper = i128::from(sorted[j as usize]);
            (lower * (n - delta) + upper * delta) as f64 / n as f64
        })
        .collect();
    Some(cuts)
}

/// The value below which 95% of `data` falls: the last of 20 quantile cut points.
pub fn percentile_95(data: &[u64]) -> Option<f64> {
    quantiles(data, PERCENTILE_GROUPS).and_then(|cuts| cuts.last().copied())
}

/// Descriptive statistics of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub min: u64,
    pub max: u64,
    /// `None` when there are too few points for a percentile.
    pub p95: Option<f64>,
}

impl Stats {
    pub fn from_values(data: &[u64]) -> Result<Self, StatsError> {
        Ok(Stats {
            mean: mean(data).ok_or(StatsError::NoData)?,
            min: min(data).ok_or(StatsError::NoData)?,
            max: max(data).ok_or(StatsError::NoData)?,
            p95: percentile_95(data),
        })
    }
}

/// Snapshot of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub throughput: Stats,
    pub latency: Stats,
    pub worker_count: usize,
    pub workers: Vec<WorkerRecord>,
}

impl Summary {
    pub fn from_results(results: &ResultSet) -> Result<Self, StatsError> {
        Ok(Summary {
            throughput: Stats::from_values(&results.throughput)?,
            latency: Stats::from_values(&results.latency)?,
            worker_count: results.workers.len(),
            workers: results.workers.clone(),
        })
    }
}
