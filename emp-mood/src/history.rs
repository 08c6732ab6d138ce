//! Session recommendation history
//!
//! Append-only for the session, except that an entry equal to the current
//! last one (same emotion, genre and top track) is suppressed. Entries are
//! read newest first. Nothing is persisted.

use chrono::{DateTime, Local};
use emp_common::time::clock_label;
use emp_common::{Emotion, Genre};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One completed recommendation cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub emotion: Emotion,
    pub genre: Genre,
    /// `"<name> - <artist>"` of the first recommended track
    pub top_track: String,
}

impl HistoryEntry {
    fn same_cycle(&self, emotion: Emotion, genre: Genre, top_track: &str) -> bool {
        self.emotion == emotion && self.genre == genre && self.top_track == top_track
    }

    /// `"HH:MM <emoji> <emotion>"`
    pub fn headline(&self) -> String {
        format!(
            "{} {} {}",
            clock_label(&self.timestamp),
            self.emotion.emoji(),
            self.emotion.display_name()
        )
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.headline(), self.genre, self.top_track)
    }
}

#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless it repeats the last one
    ///
    /// Returns `true` when the entry was appended. Only the pipeline records
    /// history, after a recommendation that produced tracks.
    pub(crate) fn record(
        &mut self,
        emotion: Emotion,
        genre: Genre,
        top_track: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> bool {
        let top_track = top_track.into();
        if let Some(last) = self.entries.last() {
            if last.same_cycle(emotion, genre, &top_track) {
                debug!(top_track = %top_track, "Suppressed duplicate history entry");
                return false;
            }
        }
        self.entries.push(HistoryEntry {
            timestamp,
            emotion,
            genre,
            top_track,
        });
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in reverse-chronological order
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
