// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Marker extraction from rendered pane text.
//!
//! Every extractor runs a first-match search with a fixed pattern. Missing or
//! malformed markers yield `None`; nothing here returns an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Builds a static regex from a constant pattern.
macro_rules! static_regex {
    ($name:ident, $pattern:literal) => {
        #[allow(clippy::expect_used)]
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new($pattern).expect(concat!("invalid constant pattern: ", $pattern))
        });
    };
}

// ASCII digits only: `\d` also matches digits that `str::parse` rejects.
static_regex!(ITERATION_REGEX, r"\[iter\s+([0-9]+)\]");
static_regex!(ELAPSED_REGEX, r"([0-9]{1,2}:[0-9]{2})");
static_regex!(MODE_REGEX, r"(?i)[▶►]\s*(auto|interactive|observe)");
static_regex!(SHELL_PROMPT_REGEX, r"\$\s*$");

static_regex!(EXIT_CODE_REGEX, r"(?i)exit\s+code[:\s]+([0-9]+)");
static_regex!(EXITED_WITH_REGEX, r"(?i)exited?\s+with\s+(?:code\s+)?([0-9]+)");
static_regex!(STATUS_VAR_REGEX, r"\$\?\s*[=:]\s*([0-9]+)");
static_regex!(RETURNED_REGEX, r"(?i)return(?:ed)?\s+([0-9]+)");

/// Exit-code patterns in priority order. The first one that matches wins.
static EXIT_CODE_PATTERNS: [&LazyLock<Regex>; 4] = [
    &EXIT_CODE_REGEX,
    &EXITED_WITH_REGEX,
    &STATUS_VAR_REGEX,
    &RETURNED_REGEX,
];

/// Loop mode shown next to the play glyph in the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    Auto,
    Interactive,
    Observe,
}

impl LoopMode {
    /// Lowercase label as rendered in the pane.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Interactive => "interactive",
            Self::Observe => "observe",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "interactive" => Some(Self::Interactive),
            "observe" => Some(Self::Observe),
            _ => None,
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First `[iter N]` marker in the text.
///
/// Returns `None` when no marker is present or the digits do not fit a `u32`.
pub fn parse_iteration(text: &str) -> Option<u32> {
    ITERATION_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First `M:SS` / `MM:SS` timestamp in the text.
pub fn parse_elapsed_time(text: &str) -> Option<String> {
    ELAPSED_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Mode label following a `▶` or `►` glyph, case-insensitive.
pub fn parse_mode(text: &str) -> Option<LoopMode> {
    MODE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| LoopMode::from_label(m.as_str()))
}

/// Exit code reported somewhere in the text.
///
/// Recognizes, in priority order: `exit code: N`, `exited with [code] N`,
/// `$?=N` / `$?:N` and `return[ed] N`.
pub fn extract_exit_code(text: &str) -> Option<i32> {
    EXIT_CODE_PATTERNS.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// True when the trimmed text ends with a `$` shell prompt.
pub fn is_shell_prompt(text: &str) -> bool {
    SHELL_PROMPT_REGEX.is_match(text.trim())
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
