// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured iteration states and sequence results.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markers::{self, LoopMode};

/// Pane state captured once an iteration marker was observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationState {
    pub iteration: u32,
    pub content: String,
    pub elapsed_time: Option<String>,
    pub mode: Option<LoopMode>,
    pub captured_at: DateTime<Utc>,
}

impl IterationState {
    /// Parse a state from raw pane text.
    ///
    /// The iteration comes from the first `[iter N]` marker, or
    /// `expected_iter` when the text has none.
    pub fn from_content(content: impl Into<String>, expected_iter: u32) -> Self {
        let content = content.into();
        Self {
            iteration: markers::parse_iteration(&content).unwrap_or(expected_iter),
            elapsed_time: markers::parse_elapsed_time(&content),
            mode: markers::parse_mode(&content),
            content,
            captured_at: Utc::now(),
        }
    }
}

/// Outcome of `IterationCapture::capture_sequence`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSequenceResult {
    /// States in the order their targets were requested.
    pub states: Vec<IterationState>,
    pub final_exit_code: Option<i32>,
    /// The overall budget ran out before every target was attempted.
    pub timed_out: bool,
}

impl CaptureSequenceResult {
    pub fn iterations_captured(&self) -> usize {
        self.states.len()
    }

    /// First captured state that reports iteration `n`.
    pub fn get_iteration(&self, n: u32) -> Option<&IterationState> {
        self.states.iter().find(|s| s.iteration == n)
    }

    pub fn last_state(&self) -> Option<&IterationState> {
        self.states.last()
    }

    /// Set `final_exit_code` from pane text, if the text reports one.
    /// Returns the extracted code.
    pub fn record_exit_code(&mut self, text: &str) -> Option<i32> {
        let code = markers::extract_exit_code(text);
        if code.is_some() {
            self.final_exit_code = code;
        }
        code
    }

    /// Dump the sequence for post-mortem inspection.
    ///
    /// Writes `frame_NNN_iter_NNNNNN.txt` with the pane content of each state,
    /// numbered by position so repeated iterations keep separate files, and a
    /// `sequence.json` summary without the content.
    pub fn write_frames(&self, dir: &Path) -> Result<(), FrameWriteError> {
        fs::create_dir_all(dir)?;

        let mut frames = Vec::with_capacity(self.states.len());
        for (idx, state) in self.states.iter().enumerate() {
            let file = frame_file_name(idx, state.iteration);
            fs::write(dir.join(&file), &state.content)?;
            frames.push(FrameSummary {
                iteration: state.iteration,
                elapsed_time: state.elapsed_time.as_deref(),
                mode: state.mode,
                captured_at: state.captured_at,
                file,
            });
        }

        let summary = SequenceSummary {
            iterations_captured: self.iterations_captured(),
            final_exit_code: self.final_exit_code,
            timed_out: self.timed_out,
            frames,
        };
        fs::write(
            dir.join("sequence.json"),
            serde_json::to_string_pretty(&summary)?,
        )?;
        Ok(())
    }
}

fn frame_file_name(idx: usize, iteration: u32) -> String {
    format!("frame_{:03}_iter_{:06}.txt", idx + 1, iteration)
}

#[derive(Serialize)]
struct SequenceSummary<'a> {
    iterations_captured: usize,
    final_exit_code: Option<i32>,
    timed_out: bool,
    frames: Vec<FrameSummary<'a>>,
}

#[derive(Serialize)]
struct FrameSummary<'a> {
    iteration: u32,
    elapsed_time: Option<&'a str>,
    mode: Option<LoopMode>,
    captured_at: DateTime<Utc>,
    file: String,
}

/// Errors from [`CaptureSequenceResult::write_frames`].
#[derive(Debug, Error)]
pub enum FrameWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
