//! Input cleanup and spelling modes
//!
//! Everything typed by the user passes through [`sanitize`] before it is
//! spelled, then through [`apply_mode`] for the selected [`SpellingMode`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Longest input we will spell, in characters
pub const MAX_INPUT_CHARS: usize = 64;

/// Anything that is not a lowercase letter, a digit or a space
static NOT_MINIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9 ]").unwrap());

/// Runs of spaces left behind after stripping
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// How much of the input is spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpellingMode {
    /// Every character as typed
    #[default]
    Full,
    /// Lowercase letters, digits and spaces only
    Minimal,
}

impl SpellingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpellingMode::Full => "full",
            SpellingMode::Minimal => "minimal",
        }
    }
}

impl fmt::Display for SpellingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpellingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(SpellingMode::Full),
            "minimal" => Ok(SpellingMode::Minimal),
            other => Err(format!("unknown spelling mode '{}'", other)),
        }
    }
}

/// Trim, drop control characters (C0, DEL and C1) and cap the length
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .take(MAX_INPUT_CHARS)
        .collect()
}

/// Reduce sanitized text to what the selected mode spells
pub fn apply_mode(text: &str, mode: SpellingMode) -> String {
    match mode {
        SpellingMode::Full => text.to_string(),
        SpellingMode::Minimal => {
            let lower = text.to_lowercase();
            let stripped = NOT_MINIMAL.replace_all(&lower, "");
            SPACE_RUNS.replace_all(&stripped, " ").trim().to_string()
        }
    }
}
