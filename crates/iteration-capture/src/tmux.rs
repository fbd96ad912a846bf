// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux-backed pane source.
//!
//! Only reads pane contents. Creating, sizing and killing sessions is left to
//! the test driver that owns the session.

use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;

use crate::source::{CaptureFuture, PaneSource};

/// Errors from running `tmux capture-pane`.
#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tmux capture-pane for '{target}' exited with {status}: {stderr}")]
    CaptureFailed {
        target: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// A tmux pane addressed by target (`session`, `session:window` or
/// `session:window.pane`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TmuxPane {
    target: String,
    socket: Option<String>,
    escape_sequences: bool,
    program: String,
}

impl TmuxPane {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            socket: None,
            escape_sequences: false,
            program: "tmux".to_string(),
        }
    }

    /// Talk to the server on a named socket (`tmux -L <name>`).
    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    /// Keep ANSI escape sequences in captured text (`capture-pane -e`).
    pub fn with_escape_sequences(mut self, enabled: bool) -> Self {
        self.escape_sequences = enabled;
        self
    }

    /// Override the tmux binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Arguments passed to the tmux binary for one capture.
    pub fn capture_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref socket) = self.socket {
            args.push("-L".to_string());
            args.push(socket.clone());
        }
        args.push("capture-pane".to_string());
        args.push("-p".to_string());
        if self.escape_sequences {
            args.push("-e".to_string());
        }
        args.push("-t".to_string());
        args.push(self.target.clone());
        args
    }

    /// Capture the current pane content.
    pub async fn capture(&self) -> Result<String, TmuxError> {
        let output = Command::new(&self.program)
            .args(self.capture_args())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TmuxError::Io {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TmuxError::CaptureFailed {
                target: self.target.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl PaneSource for TmuxPane {
    type Error = TmuxError;

    fn capture_pane(&self) -> CaptureFuture<'_, Self::Error> {
        Box::pin(self.capture())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
