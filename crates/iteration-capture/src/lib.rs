// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Iteration capture helpers for end-to-end TUI tests.
//!
//! Watches the rendered text of a terminal pane for the markers an iterating
//! loop prints (`[iter N]`, elapsed time, mode glyph, exit codes) and lets a
//! test wait on them with timeouts:
//!
//! - [`IterationCapture::wait_for_iteration`] polls until `[iter N]` appears
//! - [`IterationCapture::capture_sequence`] collects iterations `1..=max`
//! - [`IterationCapture::wait_for_termination`] waits for a shell prompt or a
//!   quiet pane
//!
//! The pane is read through [`PaneSource`]. [`TmuxPane`] reads a tmux pane the
//! test already created; [`ScriptedPane`] replays frames from memory.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use iteration_capture::{IterationCapture, TmuxPane};
//!
//! # async fn run() -> Result<(), iteration_capture::TmuxError> {
//! let mut capture = IterationCapture::new(TmuxPane::new("e2e-loop"));
//! let result = capture
//!     .capture_sequence(3, Duration::from_secs(60), Duration::from_secs(300))
//!     .await?;
//! assert!(!result.timed_out);
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod markers;
pub mod source;
pub mod state;
pub mod time;
pub mod tmux;

pub use capture::IterationCapture;
pub use config::CaptureConfig;
pub use markers::{extract_exit_code, LoopMode};
pub use source::{CaptureFuture, PaneSource, ScriptedError, ScriptedPane};
pub use state::{CaptureSequenceResult, FrameWriteError, IterationState};
pub use time::{Clock, ClockHandle, FakeClock, SystemClock};
pub use tmux::{TmuxError, TmuxPane};
