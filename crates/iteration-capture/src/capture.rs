// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Polling waiters over a pane source.
//!
//! Every wait is bounded by a timeout measured on the capturer's [`Clock`].
//! Not observing a marker in time is reported as `None` / `false`, never as
//! an error; only capture failures from the source surface as `Err`.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{CaptureConfig, REQUIRED_STABLE_CAPTURES};
use crate::markers;
use crate::source::PaneSource;
use crate::state::{CaptureSequenceResult, IterationState};
use crate::time::{Clock, ClockHandle};

/// Captures pane state at iteration boundaries by polling for `[iter N]`.
pub struct IterationCapture<S> {
    source: S,
    config: CaptureConfig,
    clock: ClockHandle,
    last_iteration: Option<u32>,
}

impl<S: PaneSource> IterationCapture<S> {
    /// Capturer with default polling knobs and the system clock.
    pub fn new(source: S) -> Self {
        Self::with_config(source, CaptureConfig::default())
    }

    pub fn with_config(source: S, config: CaptureConfig) -> Self {
        Self {
            source,
            config,
            clock: ClockHandle::system(),
            last_iteration: None,
        }
    }

    /// Replace the clock used for deadlines and sleeps.
    pub fn with_clock(mut self, clock: impl Into<ClockHandle>) -> Self {
        self.clock = clock.into();
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Last target successfully captured by [`Self::capture_sequence`].
    pub fn last_iteration(&self) -> Option<u32> {
        self.last_iteration
    }

    /// Wait until the pane shows `[iter N]` with `N >= n`, then capture it.
    ///
    /// After the marker is seen the capturer sleeps for the settle delay and
    /// re-captures, so the returned state reflects a fully drawn frame. A
    /// pane that has already moved past `n` counts as having reached it.
    /// Returns `Ok(None)` if the marker does not show up within `timeout`.
    pub async fn wait_for_iteration(
        &self,
        n: u32,
        timeout: Duration,
    ) -> Result<Option<IterationState>, S::Error> {
        let start = self.clock.now();

        while self.clock.elapsed_since(start) < timeout {
            let content = self.source.capture_pane().await?;

            match markers::parse_iteration(&content) {
                Some(current) if current >= n => {
                    debug!(wanted = n, current, "iteration marker reached");
                    self.clock.sleep(self.config.capture_delay).await;
                    let content = self.source.capture_pane().await?;
                    return Ok(Some(IterationState::from_content(content, n)));
                }
                Some(current) => trace!(wanted = n, current, "iteration not reached yet"),
                None => trace!(wanted = n, "no iteration marker on pane"),
            }

            self.clock.sleep(self.config.poll_interval).await;
        }

        debug!(wanted = n, ?timeout, "timed out waiting for iteration");
        Ok(None)
    }

    /// Capture iterations `1..=max_iter` in order.
    ///
    /// Each wait gets `timeout_per_iter`, clipped to what is left of
    /// `total_timeout`. Running out of the overall budget sets `timed_out`.
    /// A single wait that comes back empty ends the run without setting it:
    /// the loop most likely finished before reaching `max_iter`.
    pub async fn capture_sequence(
        &mut self,
        max_iter: u32,
        timeout_per_iter: Duration,
        total_timeout: Duration,
    ) -> Result<CaptureSequenceResult, S::Error> {
        let mut result = CaptureSequenceResult::default();
        let start = self.clock.now();

        for target in 1..=max_iter {
            let elapsed = self.clock.elapsed_since(start);
            if elapsed >= total_timeout {
                debug!(wanted = target, ?total_timeout, "sequence budget exhausted");
                result.timed_out = true;
                break;
            }

            let remaining = timeout_per_iter.min(total_timeout - elapsed);
            match self.wait_for_iteration(target, remaining).await? {
                Some(state) => {
                    result.states.push(state);
                    self.last_iteration = Some(target);
                }
                None => {
                    debug!(wanted = target, "iteration not observed, ending sequence");
                    break;
                }
            }
        }

        Ok(result)
    }

    /// Wait for the monitored process to end.
    ///
    /// The process counts as ended when the pane shows a `$` shell prompt, or
    /// when [`REQUIRED_STABLE_CAPTURES`] consecutive captures match the
    /// previous one. Quiescence is a heuristic: a live process that stops
    /// drawing is reported as terminated too.
    ///
    /// Returns the final pane text and whether termination was observed. On
    /// timeout the text is the last distinct capture.
    pub async fn wait_for_termination(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<(String, bool), S::Error> {
        let start = self.clock.now();
        let mut last_content = String::new();
        let mut stable_count = 0;

        while self.clock.elapsed_since(start) < timeout {
            let content = self.source.capture_pane().await?;

            if markers::is_shell_prompt(&content) {
                debug!("shell prompt visible, process ended");
                return Ok((content, true));
            }

            if content == last_content {
                stable_count += 1;
                if stable_count >= REQUIRED_STABLE_CAPTURES {
                    debug!(stable_count, "pane stable, treating process as ended");
                    return Ok((content, true));
                }
            } else {
                stable_count = 0;
                last_content = content;
            }

            self.clock.sleep(poll_interval).await;
        }

        debug!(?timeout, "timed out waiting for termination");
        Ok((last_content, false))
    }

    /// [`Self::wait_for_termination`] with the result as `(exited, text)`.
    pub async fn wait_for_process_exit(
        &self,
        timeout: Duration,
        check_interval: Duration,
    ) -> Result<(bool, String), S::Error> {
        let (content, terminated) = self.wait_for_termination(timeout, check_interval).await?;
        Ok((terminated, content))
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
