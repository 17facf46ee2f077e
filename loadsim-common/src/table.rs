//! Line-oriented table written by `loadsim-stress` on stdout.
//!
//! The first line names the columns, each following line carries one sample.
//! Rows are written fixed-width; the parser also accepts comma separated input.

use crate::{FormatError, Result, Sample};

pub const THROUGHPUT_COLUMN: &str = "Throughput (ops/s)";
pub const LATENCY_COLUMN: &str = "Latency (ms)";

/// Width every field is left-aligned to.
const FIELD_WIDTH: usize = 20;

/// Format two cells as one fixed-width row, newline included.
pub fn format_row(first: impl std::fmt::Display, second: impl std::fmt::Display) -> String {
    format!("{:<width$}  {:<width$}\n", first, second, width = FIELD_WIDTH)
}

pub fn header_row() -> String {
    format_row(THROUGHPUT_COLUMN, LATENCY_COLUMN)
}

pub fn sample_row(sample: &Sample) -> String {
    format_row(sample.throughput, sample.latency)
}

/// Split a line into trimmed fields.
///
/// Column names contain single spaces, so fixed-width rows are split on runs
/// of two or more spaces rather than on any whitespace.
fn split_fields(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split("  ")
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect()
    }
}

/// Parse a complete table into samples.
///
/// Blank lines are skipped. Columns are located by name, so their order in
/// the header does not matter.
pub fn parse_table(text: &str) -> Result<Vec<Sample>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(FormatError::MissingHeader)?;
    let columns = split_fields(header);
    let position = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| FormatError::MissingColumn(name.to_string()))
    };
    let throughput_idx = position(THROUGHPUT_COLUMN)?;
    let latency_idx = position(LATENCY_COLUMN)?;

    lines
        .map(|(line, row)| {
            let fields = split_fields(row);
            let cell = |idx: usize, name: &str| -> Result<u64> {
                let raw = fields.get(idx).ok_or_else(|| FormatError::MalformedRow {
                    line,
                    reason: format!("missing {name:?} value"),
                })?;
                raw.parse::<u64>().map_err(|e| FormatError::MalformedRow {
                    line,
                    reason: format!("{name:?} value {raw:?}: {e}"),
                })
            };
            Ok(Sample {
                throughput: cell(throughput_idx, THROUGHPUT_COLUMN)?,
                latency: cell(latency_idx, LATENCY_COLUMN)?,
            })
        })
        .collect()
}
