// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pane text sources.
//!
//! A [`PaneSource`] returns the full rendered text of a terminal pane each
//! time it is asked. The waiters only ever read from it.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Boxed future returned by [`PaneSource::capture_pane`].
pub type CaptureFuture<'a, E> = Pin<Box<dyn Future<Output = Result<String, E>> + Send + 'a>>;

/// Something that can snapshot the rendered text of a pane.
pub trait PaneSource: Send + Sync {
    /// Error raised by a failed capture. Waiters propagate it unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Capture the latest full snapshot of the pane.
    fn capture_pane(&self) -> CaptureFuture<'_, Self::Error>;
}

impl<T: PaneSource + ?Sized> PaneSource for &T {
    type Error = T::Error;

    fn capture_pane(&self) -> CaptureFuture<'_, Self::Error> {
        (**self).capture_pane()
    }
}

impl<T: PaneSource + ?Sized> PaneSource for Box<T> {
    type Error = T::Error;

    fn capture_pane(&self) -> CaptureFuture<'_, Self::Error> {
        (**self).capture_pane()
    }
}

impl<T: PaneSource + ?Sized> PaneSource for Arc<T> {
    type Error = T::Error;

    fn capture_pane(&self) -> CaptureFuture<'_, Self::Error> {
        (**self).capture_pane()
    }
}

/// Error injected into a [`ScriptedPane`] frame sequence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("scripted capture failed: {message}")]
pub struct ScriptedError {
    pub message: String,
}

/// In-memory pane that replays a fixed sequence of frames.
///
/// Each capture consumes the next frame. Once the script runs out, the last
/// frame is returned forever, which models a pane that stopped changing.
#[derive(Debug, Default)]
pub struct ScriptedPane {
    frames: Mutex<VecDeque<Result<String, ScriptedError>>>,
    last: Mutex<String>,
    captures: AtomicUsize,
}

impl ScriptedPane {
    /// Create a pane that replays `frames` in order.
    pub fn new<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: Mutex::new(frames.into_iter().map(|f| Ok(f.into())).collect()),
            last: Mutex::new(String::new()),
            captures: AtomicUsize::new(0),
        }
    }

    /// Append a frame to the end of the script.
    pub fn then(self, frame: impl Into<String>) -> Self {
        self.push(frame);
        self
    }

    /// Append `count` copies of a frame.
    pub fn then_repeat(self, frame: impl Into<String>, count: usize) -> Self {
        let frame = frame.into();
        {
            let mut frames = self.frames.lock();
            frames.extend(std::iter::repeat_n(Ok(frame), count));
        }
        self
    }

    /// Append a capture failure to the end of the script.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.frames.lock().push_back(Err(ScriptedError {
            message: message.into(),
        }));
        self
    }

    /// Append a frame while the pane is shared with a running waiter.
    pub fn push(&self, frame: impl Into<String>) {
        self.frames.lock().push_back(Ok(frame.into()));
    }

    /// Number of captures served so far, including failed ones.
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    /// Frames not yet served.
    pub fn remaining(&self) -> usize {
        self.frames.lock().len()
    }

    fn next_frame(&self) -> Result<String, ScriptedError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        let next = self.frames.lock().pop_front();
        match next {
            Some(Ok(frame)) => {
                *self.last.lock() = frame.clone();
                Ok(frame)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().clone()),
        }
    }
}

impl PaneSource for ScriptedPane {
    type Error = ScriptedError;

    fn capture_pane(&self) -> CaptureFuture<'_, Self::Error> {
        let frame = self.next_frame();
        Box::pin(async move { frame })
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
