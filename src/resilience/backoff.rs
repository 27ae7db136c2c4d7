//! Delay schedules between readiness probes.

use std::time::Duration;

use rand::Rng;

use crate::config::BackoffKind;

/// Exponential backoff delay with jitter.
///
/// `attempt` counts failed probes so far, starting at 1. Attempt 0 yields no
/// delay.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let base_ms = base.as_millis().min(u64::MAX as u128) as u64;
    let max_ms = max.as_millis().min(u64::MAX as u128) as u64;

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Delay to sleep after the `attempt`-th failed probe.
pub fn delay_for(kind: BackoffKind, attempt: u32, interval: Duration, max: Duration) -> Duration {
    match kind {
        BackoffKind::Fixed => interval,
        BackoffKind::Exponential => calculate_backoff(attempt, interval, max),
    }
}
