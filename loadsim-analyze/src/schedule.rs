use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{workers} workers starting at {min_secs}s run past the longest representable duration")]
    DurationOverflow { workers: u32, min_secs: u64 },
}

/// Give each of `workers` a distinct duration from `[min_secs, min_secs + workers)`,
/// in random order.
///
/// Drawing without replacement keeps the total runtime and the total sample
/// count fixed for a given worker count: only the order is random.
pub fn assign_durations(workers: u32, min_secs: u64, rng: &mut impl Rng) -> Result<Vec<u64>, ScheduleError> {
    let end = min_secs
        .checked_add(u64::from(workers))
        .ok_or(ScheduleError::DurationOverflow { workers, min_secs })?;
    let mut durations: Vec<u64> = (min_secs..end).collect();
    durations.shuffle(rng);
    Ok(durations)
}

/// Number of samples a run over `durations` produces when every worker succeeds.
pub fn expected_samples(durations: &[u64]) -> u64 {
    durations.iter().sum()
}
