//! Retry policies for polling a remote page.
//!
//! A policy is three things: how long to pause between attempts, when to
//! give up (an attempt count or a wall-clock deadline), and which errors
//! count as "not yet" instead of "broken".

use crate::result::ProbeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default pause between attempts (1 second)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default attempt budget (60 attempts, roughly a minute at the default interval)
pub const DEFAULT_MAX_ATTEMPTS: usize = 60;

/// Shortest time a single attempt may take under an attempt budget
pub const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);

/// When a poll gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    /// Stop after this many attempts
    Attempts(usize),
    /// Stop once this much time has passed since the first attempt
    Deadline(Duration),
}

impl Default for Budget {
    fn default() -> Self {
        Self::Attempts(DEFAULT_MAX_ATTEMPTS)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempts(n) => write!(f, "{n} attempt(s)"),
            Self::Deadline(d) => write!(f, "{}ms deadline", d.as_millis()),
        }
    }
}

/// Predicate deciding whether an error is absorbed and retried
pub type RetryablePredicate = fn(&ProbeError) -> bool;

fn any_error(_: &ProbeError) -> bool {
    true
}

/// Interval, budget and retryable-error predicate for a poll loop
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    /// Pause between attempts
    pub interval: Duration,
    /// When to give up
    pub budget: Budget,
    retryable: RetryablePredicate,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            budget: Budget::default(),
            retryable: ProbeError::is_transient,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("interval", &self.interval)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Create a policy with an interval and budget, retrying transient errors
    /// (everything except session bookkeeping errors)
    #[must_use]
    pub fn new(interval: Duration, budget: Budget) -> Self {
        Self {
            interval,
            budget,
            ..Self::default()
        }
    }

    /// Set the pause between attempts
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Give up after `max` attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, max: usize) -> Self {
        self.budget = Budget::Attempts(max);
        self
    }

    /// Give up once `deadline` has elapsed
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.budget = Budget::Deadline(deadline);
        self
    }

    /// Replace the retryable-error predicate
    #[must_use]
    pub fn with_retryable(mut self, retryable: RetryablePredicate) -> Self {
        self.retryable = retryable;
        self
    }

    /// Absorb every error, whatever its kind
    #[must_use]
    pub fn retry_all_errors(self) -> Self {
        self.with_retryable(any_error)
    }

    /// Short interval and budget, for tests and local demos
    #[must_use]
    pub fn fast() -> Self {
        Self::new(Duration::from_millis(10), Budget::Attempts(20))
    }

    /// Whether `err` should be absorbed as "not yet"
    #[must_use]
    pub fn is_retryable(&self, err: &ProbeError) -> bool {
        (self.retryable)(err)
    }

    /// Whether the budget is spent after `attempts` attempts taking `elapsed`
    #[must_use]
    pub fn is_exhausted(&self, attempts: usize, elapsed: Duration) -> bool {
        match self.budget {
            Budget::Attempts(max) => attempts >= max,
            Budget::Deadline(deadline) => elapsed >= deadline,
        }
    }

    /// Pause before the next attempt; never overshoots a deadline
    #[must_use]
    pub fn next_delay(&self, elapsed: Duration) -> Duration {
        match self.budget {
            Budget::Attempts(_) => self.interval,
            Budget::Deadline(deadline) => self.interval.min(deadline.saturating_sub(elapsed)),
        }
    }

    /// Longest a single attempt may run before it counts as "not yet".
    ///
    /// Under a deadline this is whatever the deadline has left; under an
    /// attempt budget it is the interval, but at least [`MIN_ATTEMPT_TIMEOUT`].
    #[must_use]
    pub fn attempt_timeout(&self, elapsed: Duration) -> Duration {
        match self.budget {
            Budget::Attempts(_) => self.interval.max(MIN_ATTEMPT_TIMEOUT),
            Budget::Deadline(deadline) => deadline.saturating_sub(elapsed),
        }
    }

    /// Upper bound on time spent sleeping, if one can be computed up front
    #[must_use]
    pub fn max_sleep(&self) -> Duration {
        match self.budget {
            Budget::Attempts(max) => {
                let pauses = u32::try_from(max.saturating_sub(1)).unwrap_or(u32::MAX);
                self.interval.saturating_mul(pauses)
            }
            Budget::Deadline(deadline) => deadline,
        }
    }
}
