//! Wait Mechanisms
//!
//! Polling waits that synchronize a test with a page that renders
//! asynchronously. A poll either observes its condition or spends its
//! budget; both are reported through [`PollOutcome`] so callers decide
//! whether a timeout is fatal.

use crate::result::{ProbeError, ProbeResult};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default pause after an action before the page is queried again (1 second)
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How a poll ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollOutcome {
    /// The condition held on attempt `attempts`
    Found {
        /// Attempts made, including the successful one
        attempts: usize,
        /// Time from the first attempt to success
        elapsed: Duration,
    },
    /// The budget ran out first
    TimedOut {
        /// Attempts made
        attempts: usize,
        /// Time from the first attempt to giving up
        elapsed: Duration,
        /// The last absorbed error, if the final attempts failed rather than returned false
        last_error: Option<String>,
    },
}

impl PollOutcome {
    /// Whether the condition was observed
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Attempts made
    #[must_use]
    pub const fn attempts(&self) -> usize {
        match self {
            Self::Found { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    /// Time spent polling
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Found { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    /// Turn a timeout into [`ProbeError::Timeout`] naming `what`
    pub fn into_result(self, what: impl Into<String>) -> ProbeResult<Self> {
        match self {
            Self::Found { .. } => Ok(self),
            Self::TimedOut {
                attempts, elapsed, ..
            } => Err(ProbeError::Timeout {
                what: what.into(),
                attempts,
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

/// Poll `probe` under `policy` until it yields `true` or the budget is spent.
///
/// Errors the policy deems retryable count as "not yet". Any other error
/// ends the poll and is returned. An attempt that outlives
/// [`RetryPolicy::attempt_timeout`] is abandoned and counts as a transport
/// error, so a hung server cannot stall the poll past its budget. There is
/// no pause after the final attempt.
pub async fn poll_until<F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut probe: F,
) -> ProbeResult<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<bool>>,
{
    let start = Instant::now();
    let mut attempts = 0;
    let mut last_error: Option<String> = None;

    loop {
        attempts += 1;

        let limit = policy.attempt_timeout(start.elapsed());
        let result = tokio::time::timeout(limit, probe())
            .await
            .unwrap_or_else(|_| {
                Err(ProbeError::transport(format!(
                    "no answer within {}ms",
                    limit.as_millis()
                )))
            });

        match result {
            Ok(true) => {
                let elapsed = start.elapsed();
                tracing::debug!(what, attempts, ?elapsed, "condition observed");
                return Ok(PollOutcome::Found { attempts, elapsed });
            }
            Ok(false) => last_error = None,
            Err(err) if policy.is_retryable(&err) => {
                tracing::debug!(what, attempts, error = %err, "absorbed error while polling");
                last_error = Some(err.to_string());
            }
            Err(err) => return Err(err),
        }

        let elapsed = start.elapsed();
        if policy.is_exhausted(attempts, elapsed) {
            tracing::warn!(what, attempts, ?elapsed, budget = %policy.budget, "gave up waiting");
            return Ok(PollOutcome::TimedOut {
                attempts,
                elapsed,
                last_error,
            });
        }

        tokio::time::sleep(policy.next_delay(elapsed)).await;
    }
}

/// Pause for a fixed settle delay
pub async fn settle(delay: Duration) {
    tracing::trace!(?delay, "settling");
    tokio::time::sleep(delay).await;
}
