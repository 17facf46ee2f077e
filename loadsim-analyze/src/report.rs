use crate::metrics::{Stats, Summary};

/// Shown in place of a percentile that needs more samples.
pub const UNAVAILABLE: &str = "not enough data points";

/// Render `value` the shortest way that reads back identically, always with a
/// fractional part (`5.5`, `10.45`, `7.0`).
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// A whole-number mean prints as an integer (`2`), anything else rounded to
/// two places (`5.5`, `2.0` for a mean of 2.001).
pub fn format_mean(mean: f64) -> String {
    if mean.is_finite() && mean.fract() == 0.0 {
        format!("{mean:.0}")
    } else {
        format_float(round2(mean))
    }
}

fn percentile(stats: &Stats) -> String {
    stats.p95.map(format_float).unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Human-readable report: aggregate statistics, then one line per worker.
///
/// The result has no trailing newline.
pub fn render(summary: &Summary) -> String {
    let throughput = &summary.throughput;
    let latency = &summary.latency;

    let mut out = [
        format!("Average Throughput (ops/s) = {}", format_mean(throughput.mean)),
        format!("Average Latency (ms) = {}", format_mean(latency.mean)),
        format!("Max Throughput (ops/s) = {}", throughput.max),
        format!("Max Latency (ms) = {}", latency.max),
        format!("Min Throughput (ops/s) = {}", throughput.min),
        format!("Min Latency (ms) = {}", latency.min),
        format!("Throughput 95th percentile (ops/s) = {}", percentile(throughput)),
        format!("Latency 95th percentile (ms) = {}", percentile(latency)),
        format!("Total workers run = {}", summary.worker_count),
    ]
    .join("\n");
    out.push('\n');

    for record in &summary.workers {
        out.push_str(&format!(
            "\n{} started at {} and finished at {} taking {} seconds to complete",
            record.id,
            record.started_at.format("%c"),
            record.finished_at.format("%c"),
            format_float(round2(record.elapsed.as_secs_f64())),
        ));
    }
    out
}

pub fn render_json(summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
