use chrono::{DateTime, Local};
use loadsim_common::{table, FormatError, Sample};
use serde::{Serialize, Serializer};
use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::oneshot;

use crate::config::STRESS_BIN_NAME;

/// Identifies the unit of execution that produced a [`WorkerRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum WorkerId {
    /// OS process id of a spawned stress process.
    Process(u32),
    /// Slot index of an in-process worker thread.
    Thread(usize),
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerId::Process(pid) => write!(f, "pid: {pid}"),
            WorkerId::Thread(slot) => write!(f, "thread: {slot}"),
        }
    }
}

/// Timing of one finished worker.
///
/// `elapsed` is measured on a monotonic clock and is therefore not simply
/// `finished_at - started_at`: the wall clock may be adjusted mid-run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Everything a successful worker hands back to the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    pub samples: Vec<Sample>,
    pub record: WorkerRecord,
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Cannot determine own executable path: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("Stress binary not found at {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("Failed to spawn {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn worker thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    #[error("Failed waiting for stress process {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("Stress process {pid} exited with {status}: {stderr}")]
    Exited { pid: u32, status: ExitStatus, stderr: String },

    #[error("Stress process {pid} wrote unreadable output: {source}")]
    Output {
        pid: u32,
        #[source]
        source: FormatError,
    },

    #[error("Worker produced {actual} samples, expected {expected}")]
    SampleCount { expected: u64, actual: u64 },

    #[error("Worker panicked: {0}")]
    Panicked(String),
}

/// An awaitable unit of execution that runs the sample generator for a fixed
/// number of seconds.
///
/// Implementations decide the substrate (thread, process, ...); the runner
/// only sees the samples and the timing record.
pub trait Worker: Send + Sync + 'static {
    fn run(
        &self,
        slot: usize,
        duration_secs: u64,
    ) -> impl Future<Output = Result<WorkerReport, WorkerError>> + Send;
}

/// Wall-clock start for display plus a monotonic start for elapsed time.
struct Stopwatch {
    started_at: DateTime<Local>,
    start: Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Stopwatch { started_at: Local::now(), start: Instant::now() }
    }

    fn finish(self, id: WorkerId) -> WorkerRecord {
        WorkerRecord {
            id,
            started_at: self.started_at,
            finished_at: Local::now(),
            elapsed: self.start.elapsed(),
        }
    }
}

fn check_count(samples: &[Sample], duration_secs: u64) -> Result<(), WorkerError> {
    let actual = samples.len() as u64;
    if actual != duration_secs {
        return Err(WorkerError::SampleCount { expected: duration_secs, actual });
    }
    Ok(())
}

/// Runs the generator in-process on its own OS thread.
///
/// The stopwatch starts before the thread is spawned, so the record covers
/// the whole time the worker was outstanding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadWorker;

impl Worker for ThreadWorker {
    fn run(
        &self,
        slot: usize,
        duration_secs: u64,
    ) -> impl Future<Output = Result<WorkerReport, WorkerError>> + Send {
        async move {
            let watch = Stopwatch::start();
            let (tx, rx) = oneshot::channel();
            thread::Builder::new()
                .name(format!("loadsim-worker-{slot}"))
                .spawn(move || {
                    let samples: Vec<Sample> = loadsim_stress::generate(duration_secs).collect();
                    // The receiver only goes away if the run itself was dropped.
                    let _ = tx.send(WorkerReport { samples, record: watch.finish(WorkerId::Thread(slot)) });
                })
                .map_err(WorkerError::ThreadSpawn)?;
            let report = rx
                .await
                .map_err(|_| WorkerError::Panicked(format!("worker thread {slot} exited without reporting")))?;
            check_count(&report.samples, duration_secs)?;
            Ok(report)
        }
    }
}

/// Spawns the stress binary and parses the table it prints.
#[derive(Debug, Clone)]
pub struct ProcessWorker {
    binary: PathBuf,
}

impl ProcessWorker {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        ProcessWorker { binary: binary.into() }
    }

    /// Resolve the stress binary: `explicit` if given, otherwise the
    /// `loadsim-stress` executable sitting next to the current one.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, WorkerError> {
        let binary = match explicit {
            Some(path) => path.to_path_buf(),
            None => sibling_binary_path()?,
        };
        if !binary.is_file() {
            return Err(WorkerError::BinaryNotFound(binary));
        }
        Ok(ProcessWorker { binary })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

/// `target/<profile>/loadsim-stress`, also when the caller is a test binary
/// living in `target/<profile>/deps/`.
fn sibling_binary_path() -> Result<PathBuf, WorkerError> {
    let mut path = std::env::current_exe().map_err(WorkerError::CurrentExe)?;
    path.pop();
    if path.file_name().map(|n| n == "deps").unwrap_or(false) {
        path.pop();
    }
    path.push(STRESS_BIN_NAME);
    path.set_extension(std::env::consts::EXE_EXTENSION);
    Ok(path)
}

impl Worker for ProcessWorker {
    fn run(
        &self,
        slot: usize,
        duration_secs: u64,
    ) -> impl Future<Output = Result<WorkerReport, WorkerError>> + Send {
        async move {
            let watch = Stopwatch::start();
            let child = Command::new(&self.binary)
                .arg(duration_secs.to_string())
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| WorkerError::Spawn { binary: self.binary.clone(), source })?;
            let pid = child.id().unwrap_or_default();
            tracing::debug!(slot, pid, duration_secs, "stress process spawned");

            let output = child
                .wait_with_output()
                .await
                .map_err(|source| WorkerError::Wait { pid, source })?;
            if !output.status.success() {
                return Err(WorkerError::Exited {
                    pid,
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            let samples = table::parse_table(&String::from_utf8_lossy(&output.stdout))
                .map_err(|source| WorkerError::Output { pid, source })?;
            check_count(&samples, duration_secs)?;
            Ok(WorkerReport { samples, record: watch.finish(WorkerId::Process(pid)) })
        }
    }
}
