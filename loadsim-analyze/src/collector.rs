use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

use crate::worker::{WorkerRecord, WorkerReport};

/// All samples and worker records of one run.
///
/// Throughput and latency are kept as two parallel sequences; statistics over
/// them do not depend on the order in which workers finished.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub throughput: Vec<u64>,
    pub latency: Vec<u64>,
    pub workers: Vec<WorkerRecord>,
}

impl ResultSet {
    pub fn sample_count(&self) -> usize {
        self.throughput.len()
    }

    pub fn is_empty(&self) -> bool {
        self.throughput.is_empty()
    }

    /// Fold one worker's report in.
    pub fn record(&mut self, report: WorkerReport) {
        self.throughput.reserve(report.samples.len());
        self.latency.reserve(report.samples.len());
        for sample in report.samples {
            self.throughput.push(sample.throughput);
            self.latency.push(sample.latency);
        }
        self.workers.push(report.record);
    }
}

/// Append-only [`ResultSet`] shared by every worker of a run.
///
/// Workers never read each other's contributions, so a single lock around
/// [`Collector::append`] is the only synchronization needed.
#[derive(Debug, Default)]
pub struct Collector {
    inner: Mutex<ResultSet>,
}

impl Collector {
    pub fn new() -> Arc<Self> {
        Arc::new(Collector::default())
    }

    pub fn append(&self, report: WorkerReport) {
        let mut results = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        results.record(report);
    }

    /// Take the collected results once every worker has been joined.
    pub fn finish(self: Arc<Self>) -> ResultSet {
        match Arc::try_unwrap(self) {
            Ok(collector) => collector.inner.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared.inner.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }
}
