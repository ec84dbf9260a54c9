//! Bounded retries over a `Fetcher`
//!
//! Retrying is modeled as a small state machine:
//!
//! | State | On success | On failure |
//! |-------|------------|------------|
//! | `Attempting(n)`, n < max | `Succeeded` | `Attempting(n + 1)` |
//! | `Attempting(max)` | `Succeeded` | `Exhausted` |
//!
//! A zero budget starts in `Exhausted` without attempting anything. Every failure,
//! including an expired per-attempt deadline, consumes one attempt. There is no delay
//! between attempts.

use crate::fetch::{FetchFailure, Fetcher, Payload, DEFAULT_MAX_ATTEMPTS};
use crate::target::RequestTarget;
use std::time::Duration;
use thiserror::Error;

/// How many attempts to make and how long each may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Successful outcome of `with_retry`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub payload: Payload,
    /// Attempts made, including the successful one
    pub attempts: u32,
}

/// Terminal failure of `with_retry`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("attempt budget is zero, nothing was fetched")]
    NoAttempts,

    #[error("gave up after {attempts} attempt(s), last failure: {last}")]
    Exhausted { attempts: u32, last: FetchFailure },
}

/// Where a retry loop currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    /// About to make attempt `n` (1-based)
    Attempting(u32),
    /// Attempt `attempts` succeeded
    Succeeded { attempts: u32, payload: Payload },
    /// Budget spent; `last` is `None` only when the budget was zero
    Exhausted {
        attempts: u32,
        last: Option<FetchFailure>,
    },
}

impl AttemptState {
    /// Initial state for a budget of `max_attempts`
    pub fn begin(max_attempts: u32) -> Self {
        if max_attempts == 0 {
            Self::Exhausted {
                attempts: 0,
                last: None,
            }
        } else {
            Self::Attempting(1)
        }
    }

    /// Applies the outcome of the current attempt
    ///
    /// Terminal states are returned unchanged.
    pub fn advance(self, outcome: Result<Payload, FetchFailure>, max_attempts: u32) -> Self {
        let attempt = match self {
            Self::Attempting(n) => n,
            terminal => return terminal,
        };

        match outcome {
            Ok(payload) => Self::Succeeded {
                attempts: attempt,
                payload,
            },
            Err(failure) if attempt >= max_attempts => Self::Exhausted {
                attempts: attempt,
                last: Some(failure),
            },
            Err(_) => Self::Attempting(attempt + 1),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Attempting(_))
    }
}

/// Calls `fetcher` until it succeeds or the policy's budget is spent
///
/// Never panics on fetch failure and never returns more than `max_attempts` calls'
/// worth of work.
pub async fn with_retry<F>(
    fetcher: &F,
    target: &RequestTarget,
    policy: &RetryPolicy,
) -> Result<Retrieved, RetryError>
where
    F: Fetcher + ?Sized,
{
    let mut state = AttemptState::begin(policy.max_attempts);

    loop {
        state = match state {
            AttemptState::Attempting(attempt) => {
                tracing::debug!(
                    "Fetching {} (attempt {}/{})",
                    target,
                    attempt,
                    policy.max_attempts
                );
                let outcome = attempt_once(fetcher, target, policy.attempt_timeout).await;
                if let Err(failure) = &outcome {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        policy.max_attempts,
                        target,
                        failure
                    );
                }
                AttemptState::Attempting(attempt).advance(outcome, policy.max_attempts)
            }
            AttemptState::Succeeded { attempts, payload } => {
                return Ok(Retrieved { payload, attempts });
            }
            AttemptState::Exhausted {
                attempts,
                last: Some(last),
            } => {
                return Err(RetryError::Exhausted { attempts, last });
            }
            AttemptState::Exhausted { last: None, .. } => {
                return Err(RetryError::NoAttempts);
            }
        };
    }
}

async fn attempt_once<F>(
    fetcher: &F,
    target: &RequestTarget,
    deadline: Option<Duration>,
) -> Result<Payload, FetchFailure>
where
    F: Fetcher + ?Sized,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch_once(target))
            .await
            .unwrap_or(Err(FetchFailure::Timeout)),
        None => fetcher.fetch_once(target).await,
    }
}
