//! Backoff schedule for polling asynchronous query jobs.
//!
//! The warehouse reports job completion asynchronously, so the executor
//! sleeps between status checks. Delays start at 500ms and double on every
//! attempt with no upper delay cap; the number of attempts is bounded so a
//! permanently-incomplete job fails the run instead of hanging it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_initial_ms() -> u64 {
    500
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_attempts() -> u32 {
    10
}

/// Backoff configuration for the job-status poll loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Delay before the first status check.
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Factor applied to the delay after every attempt.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Maximum number of status checks before the run is failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_ms: default_initial_ms(),
            multiplier: default_multiplier(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl BackoffPolicy {
    /// Creates a policy with the default schedule (500ms, doubling, 10 attempts).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial delay in milliseconds.
    pub fn with_initial_ms(mut self, initial_ms: u64) -> Self {
        self.initial_ms = initial_ms;
        self
    }

    /// Sets the backoff multiplier.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns the delay sequence as an iterator.
    ///
    /// The iterator yields at most `max_attempts` delays.
    pub fn delays(&self) -> Backoff {
        Backoff {
            next_ms: self.initial_ms as f64,
            multiplier: self.multiplier,
            remaining: self.max_attempts,
        }
    }
}

/// Iterator over the delays of a [`BackoffPolicy`].
#[derive(Debug, Clone)]
pub struct Backoff {
    next_ms: f64,
    multiplier: f64,
    remaining: u32,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let delay = Duration::from_millis(self.next_ms as u64);
        self.next_ms *= self.multiplier;
        Some(delay)
    }
}
