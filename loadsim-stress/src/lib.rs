use loadsim_common::{table, Sample, LATENCY_MAX, THROUGHPUT_MAX};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::io::{self, Write};
use std::iter::FusedIterator;
use std::thread;
use std::time::{Duration, Instant};

pub mod config;
use config::SAMPLE_INTERVAL;

/// Lazy, finite stream of samples paced one per [`SAMPLE_INTERVAL`].
///
/// The first sample is available immediately and sample `k` at
/// `start + k * SAMPLE_INTERVAL`. Once the last sample is taken, the next call
/// blocks until the full duration has elapsed and then ends the stream, so
/// draining it takes the requested number of seconds. Deadlines are computed
/// from a monotonic start instant, so a late wake-up does not push back the
/// samples that follow.
pub struct SampleStream<R> {
    rng: R,
    start: Instant,
    duration_secs: u64,
    emitted: u64,
    finished: bool,
}

/// Start a stream that yields exactly `duration_secs` samples.
pub fn generate(duration_secs: u64) -> SampleStream<ThreadRng> {
    generate_with_rng(duration_secs, rand::thread_rng())
}

pub fn generate_with_rng<R: Rng>(duration_secs: u64, rng: R) -> SampleStream<R> {
    SampleStream {
        rng,
        start: Instant::now(),
        duration_secs,
        emitted: 0,
        finished: false,
    }
}

impl<R> SampleStream<R> {
    /// Samples still to be yielded.
    pub fn remaining(&self) -> u64 {
        self.duration_secs - self.emitted
    }

    fn deadline(&self, tick: u64) -> Instant {
        let ticks = u32::try_from(tick).unwrap_or(u32::MAX);
        self.start + SAMPLE_INTERVAL.saturating_mul(ticks)
    }
}

fn sleep_until(deadline: Instant) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining > Duration::ZERO {
        thread::sleep(remaining);
    }
}

impl<R: Rng> Iterator for SampleStream<R> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.finished {
            return None;
        }
        if self.emitted >= self.duration_secs {
            sleep_until(self.deadline(self.duration_secs));
            self.finished = true;
            return None;
        }
        if self.emitted > 0 {
            sleep_until(self.deadline(self.emitted));
        }
        self.emitted += 1;
        Some(Sample {
            throughput: self.rng.gen_range(0..THROUGHPUT_MAX),
            latency: self.rng.gen_range(0..LATENCY_MAX),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for SampleStream<R> {}

impl<R: Rng> FusedIterator for SampleStream<R> {}

/// Write the header and one row per sample to `out`, flushing after every
/// row so a reader on the other end of a pipe sees samples as they arrive.
/// Returns the number of rows written.
pub fn write_table<W, I>(out: &mut W, samples: I) -> io::Result<u64>
where
    W: Write,
    I: IntoIterator<Item = Sample>,
{
    out.write_all(table::header_row().as_bytes())?;
    out.flush()?;
    let mut rows = 0;
    for sample in samples {
        out.write_all(table::sample_row(&sample).as_bytes())?;
        out.flush()?;
        rows += 1;
    }
    Ok(rows)
}
