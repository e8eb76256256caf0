//! Assertion and retry primitives for the smoke-test suite.
//!
//! This library provides the building blocks the runner uses to verify
//! remote state under uncertain timing:
//!
//! - **Checks**: `equals` / `is_false` produce a typed [`AssertionFailure`]
//!   instead of panicking, so a mismatch is data the runner can tally.
//! - **Retry**: [`with_retry`] re-runs a fallible check on a fixed interval
//!   until it passes or the attempt budget is exhausted. Only assertion
//!   mismatches are retried; transport errors surface immediately.
//! - **Context**: the pass/fail tally for a whole suite run.
//!
//! # Invariants
//!
//! - A check is invoked at least once and at most `attempts` times.
//! - No delay follows a successful attempt or the final failed attempt.
//! - An `AssertionFailure` is never swallowed: it either triggers another
//!   attempt or propagates to the caller.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A named check whose observed value did not match the expected value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: got {got}, expected {expect}")]
pub struct AssertionFailure {
    /// Human-readable name of the check.
    pub name: String,
    /// Observed value, rendered for display.
    pub got: String,
    /// Expected value, rendered for display.
    pub expect: String,
}

impl AssertionFailure {
    /// Build a failure from displayable observed/expected values.
    pub fn new(name: &str, got: impl Display, expect: impl Display) -> Self {
        Self {
            name: name.to_string(),
            got: got.to_string(),
            expect: expect.to_string(),
        }
    }
}

/// Outcome tag for a single check.
///
/// The distinction matters for retry semantics: an assertion mismatch is a
/// transient "not yet true" condition and is retried, while a transport
/// error (network, HTTP status) is a real failure and propagates on first
/// occurrence.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Observed state did not match expected state. Retryable.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// The check itself failed to execute. Never retried.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl CheckError {
    /// Returns true for failures that `with_retry` will re-attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Assert that two values are equal.
pub fn equals<T: PartialEq + Display>(got: T, expect: T, name: &str) -> Result<(), CheckError> {
    if got == expect {
        Ok(())
    } else {
        Err(AssertionFailure::new(name, got, expect).into())
    }
}

/// Assert that a condition is false.
pub fn is_false(got: bool, name: &str) -> Result<(), CheckError> {
    if got {
        Err(AssertionFailure::new(name, got, false).into())
    } else {
        Ok(())
    }
}

/// Interval between retry attempts during a live run.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Attempt budget and inter-attempt delay for the runner's polling loops.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts to wait for the run count to converge (~30s live).
    pub run_count_attempts: u32,
    /// Attempts to wait for the final run to reach a terminal status (~5s live).
    pub status_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            run_count_attempts: 30,
            status_attempts: 5,
            delay: RETRY_DELAY,
        }
    }
}

/// Re-run `check` until it passes or `attempts` is exhausted.
///
/// The first attempt happens immediately. An [`AssertionFailure`] with budget
/// remaining sleeps `delay` and retries; the last one propagates. Any other
/// error propagates on first occurrence. Success is a single observation,
/// not a stability-over-time confirmation.
pub async fn with_retry<F, Fut>(attempts: u32, delay: Duration, mut check: F) -> Result<(), CheckError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), CheckError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match check().await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_retryable() && attempt < attempts => {
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Pass/fail tally for one suite run.
///
/// Owned and mutated only by the sequential runner, read once by the
/// reporter at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// Sub-checks that passed.
    pub successes: u32,
    /// Sub-checks that failed.
    pub fails: u32,
}

impl Context {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sub-check outcome.
    pub fn record(&mut self, passed: bool) {
        if passed {
            self.successes += 1;
        } else {
            self.fails += 1;
        }
    }

    /// Returns true when no sub-check has failed.
    pub fn passed(&self) -> bool {
        self.fails == 0
    }
}
