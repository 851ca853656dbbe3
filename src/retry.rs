//! Bounded exponential backoff for calls to remote services

use std::time::Duration;

use crate::{Error, Result};

/// How many times to try and how long to wait between attempts.
/// The delay doubles after every transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 3000,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay_ms: 0,
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Only errors reporting `is_transient()` are retried. `what` names the
    /// operation in log lines.
    pub fn run<T, F>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "{} failed ({}), retrying in {:?} ({}/{})",
                        what,
                        e,
                        delay,
                        attempt,
                        attempts
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    return Err(Error::RetriesExhausted {
                        attempts,
                        last: e.to_string(),
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }
}
