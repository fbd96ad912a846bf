// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Integration tests against a real tmux server.
//!
//! Each test runs its own server on a private socket. Tests return early when
//! tmux is not installed.

use std::io::Write;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use iteration_capture::{
    extract_exit_code, CaptureConfig, IterationCapture, TmuxError, TmuxPane,
};
use tempfile::NamedTempFile;

static TMUX_AVAILABLE: OnceLock<bool> = OnceLock::new();
static SOCKET_COUNTER: AtomicU64 = AtomicU64::new(0);

fn tmux_available() -> bool {
    *TMUX_AVAILABLE.get_or_init(|| {
        Command::new("tmux")
            .arg("-V")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Private tmux server running one script; killed on drop.
struct TmuxServer {
    socket: String,
    _script: NamedTempFile,
}

impl TmuxServer {
    const SESSION: &'static str = "loop";

    fn start(script: &str) -> Self {
        let socket = format!(
            "iteration-capture-{}-{}",
            std::process::id(),
            SOCKET_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let mut file = tempfile::Builder::new().suffix(".sh").tempfile().unwrap();
        file.write_all(script.as_bytes()).unwrap();
        file.flush().unwrap();

        let status = Command::new("tmux")
            .args(["-L", &socket, "new-session", "-d", "-s", Self::SESSION])
            .args(["-x", "100", "-y", "20"])
            .arg(format!("sh {}", file.path().display()))
            .status()
            .expect("failed to start tmux");
        assert!(status.success(), "failed to create tmux session on {}", socket);

        Self {
            socket,
            _script: file,
        }
    }

    fn pane(&self) -> TmuxPane {
        TmuxPane::new(Self::SESSION).with_socket(&self.socket)
    }
}

impl Drop for TmuxServer {
    fn drop(&mut self) {
        let _ = Command::new("tmux")
            .args(["-L", &self.socket, "kill-server"])
            .output();
    }
}

fn fast_config() -> CaptureConfig {
    CaptureConfig::default()
        .with_poll_interval(Duration::from_millis(50))
        .with_capture_delay(Duration::from_millis(50))
}

#[tokio::test(flavor = "current_thread")]
async fn captures_iterations_from_live_pane() {
    if !tmux_available() {
        return;
    }
    init_tracing();

    let server = TmuxServer::start(
        "printf '[iter 1] auto 00:01\\n'\n\
         sleep 0.5\n\
         printf '\\033[2J\\033[H'\n\
         printf '[iter 2] auto 00:02\\n'\n\
         sleep 30\n",
    );
    let mut capture = IterationCapture::with_config(server.pane(), fast_config());

    let result = capture
        .capture_sequence(2, Duration::from_secs(10), Duration::from_secs(20))
        .await
        .unwrap();

    assert_eq!(result.iterations_captured(), 2);
    assert!(!result.timed_out);
    let second = result.get_iteration(2).unwrap();
    assert_eq!(second.elapsed_time.as_deref(), Some("00:02"));
}

#[tokio::test(flavor = "current_thread")]
async fn quiet_pane_counts_as_terminated() {
    if !tmux_available() {
        return;
    }
    init_tracing();

    let server =
        TmuxServer::start("printf '[iter 1] Loop finished, exit code: 3\\n'\nsleep 30\n");
    let capture = IterationCapture::with_config(server.pane(), fast_config());

    // Let the shell draw before watching for quiescence
    capture
        .wait_for_iteration(1, Duration::from_secs(10))
        .await
        .unwrap()
        .expect("marker never appeared");

    let (content, terminated) = capture
        .wait_for_termination(Duration::from_secs(10), Duration::from_millis(100))
        .await
        .unwrap();

    assert!(terminated);
    assert_eq!(extract_exit_code(&content), Some(3));
}

#[tokio::test(flavor = "current_thread")]
async fn missing_session_is_capture_failure() {
    if !tmux_available() {
        return;
    }

    let server = TmuxServer::start("sleep 30\n");
    let pane = TmuxPane::new("no-such-session").with_socket(&server.socket);
    let capture = IterationCapture::new(pane);

    let err = capture
        .wait_for_iteration(1, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TmuxError::CaptureFailed { .. }), "got {err:?}");
}
