//! Mood → search query mapping

use emp_common::{Emotion, Genre};
use std::fmt;
use std::str::FromStr;

/// Search term used when the mood label is not recognized
pub const FALLBACK_TERM: &str = "top hits";

/// Mood search term for a canonical emotion
pub fn mood_term(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Neutral => "chill",
        Emotion::Happy => "happy",
        Emotion::Sad => "sad",
        Emotion::Angry => "workout",
    }
}

/// Catalog search string
///
/// The mood term alone for [`Genre::All`], otherwise `"<term> <genre>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(emotion: Emotion, genre: Genre) -> Self {
        Self::with_term(mood_term(emotion), genre)
    }

    /// Query from a free-form label; unknown labels search [`FALLBACK_TERM`]
    pub fn from_label(label: &str, genre: Genre) -> Self {
        match Emotion::from_str(label) {
            Ok(emotion) => Self::new(emotion, genre),
            Err(_) => {
                tracing::debug!(label = %label, "Unrecognized mood label, using fallback term");
                Self::with_term(FALLBACK_TERM, genre)
            }
        }
    }

    fn with_term(term: &str, genre: Genre) -> Self {
        if genre.is_unconstrained() {
            Self(term.to_string())
        } else {
            Self(format!("{} {}", term, genre.as_str()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
