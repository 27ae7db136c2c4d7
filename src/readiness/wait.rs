//! Blocking wait until the engine accepts connections.

use std::time::Duration;

use thiserror::Error;
use tokio::time;

use crate::config::{BackoffKind, WaitConfig};
use crate::readiness::probe::ReadinessProbe;
use crate::resilience::backoff::delay_for;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitError {
    #[error("engine not ready after {attempts} probe attempts")]
    Exhausted { attempts: u32 },
}

/// How the wait loop retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    /// `None` waits forever.
    pub max_attempts: Option<u32>,
    pub backoff: BackoffKind,
    pub max_interval: Duration,
}

impl WaitPolicy {
    /// Fixed interval, no attempt limit.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            backoff: BackoffKind::Fixed,
            max_interval: interval,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        delay_for(self.backoff, failed_attempts, self.interval, self.max_interval)
    }
}

impl From<&WaitConfig> for WaitPolicy {
    fn from(config: &WaitConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            max_attempts: config.max_attempts,
            backoff: config.backoff,
            max_interval: Duration::from_secs(config.max_interval_secs),
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::from(&WaitConfig::default())
    }
}

/// Probe until ready. Returns the number of probes it took.
///
/// `on_retry` is called with the failed attempt count before every sleep.
pub async fn wait_until_ready_with<P, F>(
    probe: &P,
    policy: &WaitPolicy,
    mut on_retry: F,
) -> Result<u32, WaitError>
where
    P: ReadinessProbe + ?Sized,
    F: FnMut(u32),
{
    let mut attempts: u32 = 0;

    loop {
        attempts = attempts.saturating_add(1);
        if probe.probe().await {
            tracing::debug!(attempts, probe = %probe.target(), "Engine accepted connection");
            return Ok(attempts);
        }

        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                tracing::warn!(attempts, probe = %probe.target(), "Giving up on engine readiness");
                return Err(WaitError::Exhausted { attempts });
            }
        }

        on_retry(attempts);

        let delay = policy.delay_after(attempts);
        tracing::debug!(attempts, delay_ms = delay.as_millis() as u64, "Engine not ready, retrying");
        time::sleep(delay).await;
    }
}
