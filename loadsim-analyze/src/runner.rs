use std::sync::Arc;

use crate::collector::{Collector, ResultSet};
use crate::config::{RunConfig, WorkerMode};
use crate::worker::{ProcessWorker, ThreadWorker, Worker, WorkerError};

/// A worker whose contribution is missing from the [`ResultSet`].
#[derive(Debug)]
pub struct WorkerFailure {
    pub slot: usize,
    pub duration_secs: u64,
    pub error: WorkerError,
}

pub struct RunOutcome {
    /// Samples and records of every worker that succeeded.
    pub results: ResultSet,
    /// One entry per worker that did not, in slot order.
    pub failures: Vec<WorkerFailure>,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Start one worker per entry in `durations`, wait for all of them, and
/// return what they collected.
///
/// Workers are launched back to back without throttling. Nothing is
/// aggregated until the last one has been joined. A failed worker does not
/// stop the others; it shows up in [`RunOutcome::failures`] instead.
pub async fn run<W: Worker>(worker: Arc<W>, durations: &[u64]) -> RunOutcome {
    let collector = Collector::new();
    let mut handles = Vec::with_capacity(durations.len());

    for (slot, &duration_secs) in durations.iter().enumerate() {
        let worker = Arc::clone(&worker);
        let collector = Arc::clone(&collector);
        let handle = tokio::spawn(async move {
            let report = worker.run(slot, duration_secs).await?;
            tracing::debug!(
                slot,
                id = %report.record.id,
                samples = report.samples.len(),
                elapsed_secs = report.record.elapsed.as_secs_f64(),
                "worker finished"
            );
            collector.append(report);
            Ok::<(), WorkerError>(())
        });
        handles.push((slot, duration_secs, handle));
    }

    let mut failures = Vec::new();
    for (slot, duration_secs, handle) in handles {
        let error = match handle.await {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(e) => WorkerError::Panicked(e.to_string()),
        };
        tracing::error!(slot, duration_secs, error = %error, "worker failed");
        failures.push(WorkerFailure { slot, duration_secs, error });
    }

    RunOutcome { results: collector.finish(), failures }
}

/// Run `durations` on the substrate selected by `config`.
///
/// Returns `Err` only when the workers cannot be set up at all, e.g. the
/// stress binary is missing in process mode.
pub async fn run_with_config(config: &RunConfig, durations: &[u64]) -> Result<RunOutcome, WorkerError> {
    tracing::info!(workers = durations.len(), mode = ?config.mode, "starting run");
    let outcome = match config.mode {
        WorkerMode::Thread => run(Arc::new(ThreadWorker), durations).await,
        WorkerMode::Process => {
            let worker = ProcessWorker::locate(config.stress_bin.as_deref())?;
            tracing::debug!(binary = %worker.binary().display(), "using stress binary");
            run(Arc::new(worker), durations).await
        }
    };
    tracing::info!(
        samples = outcome.results.sample_count(),
        failed = outcome.failures.len(),
        "run finished"
    );
    Ok(outcome)
}
