use std::time::Duration;

use crate::foundation::error::{LumaError, LumaResult};

/// Bounded retry schedule used while waiting for a named source to appear.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total resolve attempts before giving up.
    pub max_attempts: u32,
    /// Settle delay before the first attempt, so discovery can populate after activation.
    pub initial_delay_ms: u64,
    /// Delay before every later attempt.
    pub interval_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay_ms: 500,
            interval_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Delay before the 0-based `attempt`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            Duration::from_millis(self.initial_delay_ms)
        } else {
            Duration::from_millis(self.interval_ms)
        }
    }

    /// Total time spent waiting if every attempt misses.
    pub fn total_wait(&self) -> Duration {
        (0..self.max_attempts).map(|a| self.delay_before(a)).sum()
    }

    /// Reject budgets that could never connect.
    pub fn validate(&self) -> LumaResult<()> {
        if self.max_attempts == 0 {
            return Err(LumaError::config("retry max_attempts must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/retry.rs"]
mod tests;
