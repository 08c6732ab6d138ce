//! Per-session mutable state
//!
//! Owned by the caller and lent to the pipeline one cycle at a time, so two
//! cycles never touch the same session concurrently.

use crate::history::HistoryLog;
use crate::workflow::Analysis;
use emp_common::Genre;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 of one captured clip
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputDigest(String);

impl InputDigest {
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct SessionContext {
    history: HistoryLog,
    last_input: Option<InputDigest>,
    analysis_count: u64,
    current: Option<Analysis>,
    genre: Genre,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the state of a fresh session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// True when `digest` is the input processed last
    pub fn is_repeat(&self, digest: &InputDigest) -> bool {
        self.last_input.as_ref() == Some(digest)
    }

    pub fn analysis_count(&self) -> u64 {
        self.analysis_count
    }

    /// Most recent analysis, if any
    pub fn current(&self) -> Option<&Analysis> {
        self.current.as_ref()
    }

    pub(crate) fn complete_analysis(&mut self, digest: InputDigest, analysis: Analysis) {
        self.last_input = Some(digest);
        self.analysis_count += 1;
        self.current = Some(analysis);
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn set_genre(&mut self, genre: Genre) {
        self.genre = genre;
    }
}
