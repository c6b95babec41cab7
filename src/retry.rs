use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Outcome of a single attempt inside [`retry`].
#[derive(Debug)]
pub enum Attempt<T, E> {
    Ready(T),
    /// Transient; try again after the policy delay.
    Pending(String),
    /// Permanent; stop immediately.
    Failed(E),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Upper bound on the time spent sleeping between attempts.
    pub fn worst_case_wait(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last_reason}")]
    Exhausted { attempts: u32, last_reason: String },

    #[error("{0}")]
    Failed(E),
}

/// Runs `operation` until it is ready, fails permanently, or `max_attempts`
/// attempts have been made. The delay is slept between attempts only.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    let mut last_reason = String::from("no attempt made");

    for attempt in 1..=policy.max_attempts {
        match operation(attempt).await {
            Attempt::Ready(value) => {
                debug!(%label, attempt, "attempt succeeded");
                return Ok(value);
            }
            Attempt::Failed(error) => return Err(RetryError::Failed(error)),
            Attempt::Pending(reason) => {
                warn!(
                    %label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    %reason,
                    "attempt not ready"
                );
                last_reason = reason;
            }
        }

        if attempt < policy.max_attempts && !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
    }

    Err(RetryError::Exhausted {
        attempts: policy.max_attempts,
        last_reason,
    })
}
