// ABOUTME: Bounded retry with a doubling delay for flaky remote calls.
// ABOUTME: Operations can mark an error permanent to skip remaining attempts.

use serde::Deserialize;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// How many times to call an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,
}

fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

fn default_initial_delay() -> Duration {
    DEFAULT_INITIAL_DELAY
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, initial_delay: Duration) -> Self {
        Self {
            attempts,
            initial_delay,
        }
    }

    /// Sleeps taken between consecutive attempts when every attempt fails.
    ///
    /// Always one fewer than the attempt budget: no sleep follows the last
    /// attempt.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let sleeps = self.attempts.max(1) - 1;
        let initial = self.initial_delay;
        (0..sleeps).map(move |n| initial.saturating_mul(2u32.saturating_pow(n)))
    }
}

/// Error returned by a retried operation.
///
/// Any error converts into [`RetryError::Transient`] via `?`; wrap it with
/// [`RetryError::permanent`] to stop retrying immediately.
#[derive(Debug)]
pub enum RetryError<E> {
    Transient(E),
    Permanent(E),
}

impl<E> RetryError<E> {
    pub fn permanent(error: E) -> Self {
        RetryError::Permanent(error)
    }

    pub fn into_inner(self) -> E {
        match self {
            RetryError::Transient(e) | RetryError::Permanent(e) => e,
        }
    }
}

impl<E> From<E> for RetryError<E> {
    fn from(error: E) -> Self {
        RetryError::Transient(error)
    }
}

/// Call `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent. Returns the last error on exhaustion.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError<E>>>,
    E: Display,
{
    let mut delays = policy.delays();
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(RetryError::Permanent(error)) => {
                tracing::debug!(attempt, %error, "permanent failure, not retrying");
                return Err(error);
            }
            Err(RetryError::Transient(error)) => match delays.next() {
                Some(delay) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = policy.attempts,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    tracing::warn!(attempt, %error, "retry budget exhausted");
                    return Err(error);
                }
            },
        }
    }
}
