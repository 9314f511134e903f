//! Block until the database accepts connections.
//!
//! [`wait_for_database`] probes an injected [`ConnectionProbe`] in a loop,
//! sleeping between attempts according to a [`WaitPolicy`]. The default policy
//! retries every second forever. Progress is reported to a [`WaitObserver`],
//! which the `wait-for-db` command uses to print status lines.

use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info};

use super::ports::{ConnectionProbe, ProbeError};

/// Default pause between probe attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
/// Default ceiling for the backoff delay.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

/// Retry schedule for [`wait_for_database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay after the first failed attempt.
    pub interval: Duration,
    /// Multiplier applied to the delay after each further failure. `1` keeps
    /// the delay fixed; `0` is treated as `1`.
    pub backoff_factor: u32,
    /// Upper bound on the delay between attempts.
    pub max_interval: Duration,
    /// Give up after this many failed attempts.
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed since the first attempt.
    pub timeout: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            backoff_factor: 1,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }
}

impl WaitPolicy {
    /// Delay to apply after failed attempt number `attempt` (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use accounts::domain::WaitPolicy;
    ///
    /// let policy = WaitPolicy { backoff_factor: 2, ..WaitPolicy::default() };
    /// assert_eq!(policy.delay_for(1), Duration::from_secs(1));
    /// assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    /// assert_eq!(policy.delay_for(20), Duration::from_secs(30));
    /// ```
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.backoff_factor
            .max(1)
            .checked_pow(exponent)
            .and_then(|multiplier| self.interval.checked_mul(multiplier))
            .map_or(self.max_interval, |delay| delay.min(self.max_interval))
    }
}

/// Progress notifications emitted while waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitEvent {
    /// The wait has started.
    Waiting,
    /// A probe failed; the loop will sleep for `retry_in` before retrying.
    Unavailable {
        attempt: u32,
        retry_in: Duration,
        reason: String,
    },
    /// A probe succeeded.
    Available { attempts: u32 },
}

/// Receives [`WaitEvent`]s from [`wait_for_database`].
pub trait WaitObserver: Send {
    fn notify(&mut self, event: &WaitEvent);
}

impl<F> WaitObserver for F
where
    F: FnMut(&WaitEvent) + Send,
{
    fn notify(&mut self, event: &WaitEvent) {
        self(event);
    }
}

/// Outcome of a successful wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitReport {
    /// Number of probes made, including the successful one.
    pub attempts: u32,
    /// Time spent waiting.
    pub elapsed: Duration,
}

/// Reasons the wait gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("database still unavailable after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: ProbeError },
    #[error("database still unavailable after {elapsed:?} ({attempts} attempts): {last_error}")]
    TimedOut {
        attempts: u32,
        elapsed: Duration,
        last_error: ProbeError,
    },
}

/// Probe until the database is reachable or the policy gives up.
pub async fn wait_for_database<P, O>(
    probe: &P,
    policy: &WaitPolicy,
    observer: &mut O,
) -> Result<WaitReport, WaitError>
where
    P: ConnectionProbe + ?Sized,
    O: WaitObserver + ?Sized,
{
    let started = Instant::now();
    observer.notify(&WaitEvent::Waiting);
    let mut attempts = 0_u32;
    loop {
        attempts = attempts.saturating_add(1);
        let outcome = match policy.timeout {
            Some(limit) => {
                let remaining = limit.saturating_sub(started.elapsed());
                match timeout(remaining, probe.probe()).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        debug!(attempts, "connection attempt outlived the wait timeout");
                        return Err(WaitError::TimedOut {
                            attempts,
                            elapsed: started.elapsed(),
                            last_error: ProbeError::unavailable("connection attempt timed out"),
                        });
                    }
                }
            }
            None => probe.probe().await,
        };
        let last_error = match outcome {
            Ok(()) => {
                info!(attempts, "database available");
                observer.notify(&WaitEvent::Available { attempts });
                return Ok(WaitReport {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }
            Err(error) => error,
        };

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(WaitError::Exhausted {
                attempts,
                last_error,
            });
        }

        let mut delay = policy.delay_for(attempts);
        if let Some(timeout) = policy.timeout {
            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(WaitError::TimedOut {
                    attempts,
                    elapsed: started.elapsed(),
                    last_error,
                });
            }
            delay = delay.min(remaining);
        }

        debug!(attempts, ?delay, error = %last_error, "database unavailable");
        observer.notify(&WaitEvent::Unavailable {
            attempt: attempts,
            retry_in: delay,
            reason: last_error.to_string(),
        });
        sleep(delay).await;
    }
}
