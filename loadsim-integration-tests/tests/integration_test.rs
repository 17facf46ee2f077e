use loadsim_analyze::config::{RunConfig, WorkerMode};
use loadsim_analyze::metrics::Summary;
use loadsim_analyze::report::render;
use loadsim_analyze::runner::run_with_config;
use loadsim_analyze::schedule::{assign_durations, expected_samples};
use loadsim_analyze::worker::{ProcessWorker, Worker, WorkerId};
use loadsim_common::table::{header_row, parse_table};
use loadsim_common::{LATENCY_MAX, THROUGHPUT_MAX};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;
use std::time::Instant;

/// Build `loadsim-stress` once per test binary and return its path.
///
/// The binary belongs to another package, so cargo does not build it for
/// this crate's tests on its own.
fn stress_binary() -> PathBuf {
    static BINARY: OnceLock<PathBuf> = OnceLock::new();
    BINARY
        .get_or_init(|| {
            let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
            let mut build = Command::new(cargo);
            build.args(["build", "-p", "loadsim-stress", "--bin", "loadsim-stress"]);
            if !cfg!(debug_assertions) {
                build.arg("--release");
            }
            let status = build.status().expect("failed to invoke cargo build");
            assert!(status.success(), "cargo build -p loadsim-stress failed: {status}");

            ProcessWorker::locate(None)
                .expect("loadsim-stress not found next to the test binary")
                .binary()
                .to_path_buf()
        })
        .clone()
}

#[test]
fn test_stress_binary_output_and_timing() {
    let binary = stress_binary();
    for duration in [0u64, 1, 3] {
        let start = Instant::now();
        let output = Command::new(&binary).arg(duration.to_string()).output().unwrap();
        let taken = start.elapsed().as_secs_f64();
        assert!(output.status.success());

        let text = String::from_utf8(output.stdout).unwrap();
        assert!(text.starts_with(&header_row()), "{text:?}");
        let samples = parse_table(&text).unwrap();
        assert_eq!(samples.len() as u64, duration);
        for s in &samples {
            assert!(s.throughput < THROUGHPUT_MAX);
            assert!(s.latency < LATENCY_MAX);
        }
        // Process start-up adds a little on top of the generator's own pacing.
        assert!(
            duration as f64 <= taken && taken <= duration as f64 + 0.5,
            "duration {duration}: took {taken:.3}s"
        );
    }
}

#[tokio::test]
async fn test_process_worker_against_real_binary() {
    let worker = ProcessWorker::new(stress_binary());
    let report = worker.run(0, 2).await.unwrap();
    assert_eq!(report.samples.len(), 2);
    assert!(matches!(report.record.id, WorkerId::Process(pid) if pid > 0));
    assert!(report.record.elapsed.as_secs_f64() >= 2.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_run_sample_and_worker_counts() {
    for workers in [1u32, 3] {
        let config = RunConfig {
            mode: WorkerMode::Process,
            stress_bin: Some(stress_binary()),
            ..RunConfig::new(workers)
        };
        let durations = assign_durations(workers, config.min_duration_secs, &mut StdRng::seed_from_u64(9)).unwrap();
        let outcome = run_with_config(&config, &durations).await.unwrap();

        assert!(outcome.is_complete(), "failures: {:?}", outcome.failures);
        let results = &outcome.results;
        assert_eq!(results.workers.len(), workers as usize);
        assert_eq!(results.sample_count() as u64, expected_samples(&durations));

        let ids: HashSet<WorkerId> = results.workers.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), workers as usize, "worker ids must be distinct");

        // Durations span [2, workers + 1], all running at once.
        let k = f64::from(workers);
        let longest = results
            .workers
            .iter()
            .map(|r| r.elapsed.as_secs_f64())
            .fold(0.0, f64::max);
        assert!(k <= longest && longest <= k + 1.5, "k = {k}: longest worker took {longest:.3}s");

        let summary = Summary::from_results(results).unwrap();
        assert_eq!(summary.worker_count, workers as usize);
        let text = render(&summary);
        assert!(text.contains(&format!("Total workers run = {workers}\n")));
        assert_eq!(text.matches(" seconds to complete").count(), workers as usize);
    }
}

#[tokio::test]
async fn test_thread_and_process_modes_agree_on_counts() {
    let durations = [2, 3];
    let process = RunConfig { stress_bin: Some(stress_binary()), ..RunConfig::new(2) };
    let thread = RunConfig { mode: WorkerMode::Thread, ..RunConfig::new(2) };

    let (by_process, by_thread) = tokio::join!(
        run_with_config(&process, &durations),
        run_with_config(&thread, &durations),
    );
    let (by_process, by_thread) = (by_process.unwrap(), by_thread.unwrap());
    assert_eq!(by_process.results.sample_count(), 5);
    assert_eq!(by_thread.results.sample_count(), 5);
    assert!(by_process.results.workers.iter().all(|r| matches!(r.id, WorkerId::Process(_))));
    assert!(by_thread.results.workers.iter().all(|r| matches!(r.id, WorkerId::Thread(_))));
}
