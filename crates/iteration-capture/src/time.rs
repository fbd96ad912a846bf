// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction for deterministic polling.
//!
//! Waiters measure their deadlines and sleep through a [`Clock`]. Tests swap
//! in a [`FakeClock`] so a sixty second timeout completes instantly.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Monotonic clock used by the waiters.
pub trait Clock: Send + Sync {
    /// Monotonic time since the clock's origin.
    fn now(&self) -> Duration;

    /// Sleep for a duration
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// [`Clock::now`] truncated to whole milliseconds.
    fn now_millis(&self) -> u64 {
        self.now().as_millis() as u64
    }

    /// Time elapsed since an earlier [`Clock::now`] snapshot.
    fn elapsed_since(&self, start: Duration) -> Duration {
        self.now().saturating_sub(start)
    }
}

/// Real clock backed by tokio's monotonic instant.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Fake clock for testing with controllable time.
///
/// Clones share the same underlying time, so a test can keep a handle and
/// inspect how much virtual time a waiter consumed.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_millis: Arc<AtomicU64>,
    auto_advance: bool,
}

impl FakeClock {
    /// Create a new fake clock starting at a given time
    pub fn new(start_millis: u64) -> Self {
        Self {
            current_millis: Arc::new(AtomicU64::new(start_millis)),
            auto_advance: true,
        }
    }

    pub fn at_zero() -> Self {
        Self::new(0)
    }

    /// Clone sharing the same time, with sleep no longer advancing it.
    pub fn without_auto_advance(&self) -> Self {
        Self {
            current_millis: Arc::clone(&self.current_millis),
            auto_advance: false,
        }
    }

    /// Advance time by a duration
    pub fn advance(&self, duration: Duration) {
        self.current_millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.current_millis.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at_zero()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.current_millis.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        if self.auto_advance {
            self.advance(duration);
        }
        // No actual sleep - return immediately
        Box::pin(async {})
    }
}

/// Clock handle that can be either real or fake
#[derive(Clone, Debug)]
pub enum ClockHandle {
    System(SystemClock),
    Fake(FakeClock),
}

impl ClockHandle {
    pub fn system() -> Self {
        Self::System(SystemClock::new())
    }

    pub fn fake() -> Self {
        Self::Fake(FakeClock::at_zero())
    }

    /// Get as fake clock for manipulation (returns None for system clock)
    pub fn as_fake(&self) -> Option<&FakeClock> {
        match self {
            Self::Fake(f) => Some(f),
            Self::System(_) => None,
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Self::Fake(_))
    }
}

impl Clock for ClockHandle {
    fn now(&self) -> Duration {
        match self {
            Self::System(c) => c.now(),
            Self::Fake(c) => c.now(),
        }
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        match self {
            Self::System(c) => c.sleep(duration),
            Self::Fake(c) => c.sleep(duration),
        }
    }
}

impl Default for ClockHandle {
    fn default() -> Self {
        Self::system()
    }
}

impl From<FakeClock> for ClockHandle {
    fn from(clock: FakeClock) -> Self {
        Self::Fake(clock)
    }
}

impl From<SystemClock> for ClockHandle {
    fn from(clock: SystemClock) -> Self {
        Self::System(clock)
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
