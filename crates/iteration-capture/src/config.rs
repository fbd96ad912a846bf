// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Polling configuration and default timeouts.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ITERATION_CAPTURE_POLL_MS` | Delay between pane polls | `500` |
//! | `ITERATION_CAPTURE_DELAY_MS` | Settle delay after a marker is seen | `200` |
//!
//! Environment overrides only apply through [`CaptureConfig::from_env`];
//! [`CaptureConfig::default`] never reads the environment.

use std::time::Duration;

/// Default delay between pane polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default settle delay between detecting a marker and re-capturing.
pub const DEFAULT_CAPTURE_DELAY: Duration = Duration::from_millis(200);

/// Default timeout for a single `wait_for_iteration`.
pub const DEFAULT_ITERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default budget for a whole `capture_sequence`.
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(300);

/// Default timeout for `wait_for_termination`.
pub const DEFAULT_TERMINATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Default poll interval for `wait_for_termination`.
pub const DEFAULT_TERMINATION_POLL: Duration = Duration::from_secs(1);

/// Consecutive identical captures that count as termination.
pub const REQUIRED_STABLE_CAPTURES: u32 = 3;

pub const ENV_POLL_MS: &str = "ITERATION_CAPTURE_POLL_MS";
pub const ENV_CAPTURE_DELAY_MS: &str = "ITERATION_CAPTURE_DELAY_MS";

/// Polling knobs for an `IterationCapture`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    /// How often to poll the pane while waiting for a marker.
    pub poll_interval: Duration,
    /// Pause after a marker is detected, before the state is re-captured.
    pub capture_delay: Duration,
}

impl CaptureConfig {
    /// Defaults overridden by `ITERATION_CAPTURE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    /// Unparseable values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |name: &str| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
        };

        Self {
            poll_interval: millis(ENV_POLL_MS).unwrap_or(DEFAULT_POLL_INTERVAL),
            capture_delay: millis(ENV_CAPTURE_DELAY_MS).unwrap_or(DEFAULT_CAPTURE_DELAY),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_capture_delay(mut self, capture_delay: Duration) -> Self {
        self.capture_delay = capture_delay;
        self
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            capture_delay: DEFAULT_CAPTURE_DELAY,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
