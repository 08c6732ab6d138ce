//! Canonical mood vocabulary shared by every EMP component
//!
//! `Emotion` is the currency between classifiers, fusion, query building and
//! history. `Genre` is the closed set of filters a listener may pick.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse emotion label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
}

impl Emotion {
    /// All labels in display order
    pub const ALL: [Emotion; 4] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
        }
    }

    /// Human-facing name used in history and CLI output
    pub fn display_name(&self) -> &'static str {
        match self {
            Emotion::Neutral => "Neutral (calm)",
            Emotion::Happy => "Happy (joy)",
            Emotion::Sad => "Sad (sorrow)",
            Emotion::Angry => "Angry (anger)",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Neutral => "😐",
            Emotion::Happy => "😄",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Emotion::Neutral)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    /// Accepts canonical names and the short codes (`neu`, `hap`, `sad`, `ang`)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" | "neu" => Ok(Emotion::Neutral),
            "happy" | "hap" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" | "ang" => Ok(Emotion::Angry),
            other => Err(Error::InvalidInput(format!(
                "unknown emotion '{}' (expected one of: neutral, happy, sad, angry)",
                other
            ))),
        }
    }
}

/// Genre filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[default]
    All,
    #[serde(rename = "J-Pop")]
    JPop,
    #[serde(rename = "K-Pop")]
    KPop,
    Pop,
    Rock,
    Jazz,
    #[serde(rename = "Hip-Hop")]
    HipHop,
    #[serde(rename = "Lo-Fi")]
    LoFi,
    Classical,
    Electronic,
}

impl Genre {
    /// Closed filter set in menu order (`All` first)
    pub const ALL: [Genre; 10] = [
        Genre::All,
        Genre::JPop,
        Genre::KPop,
        Genre::Pop,
        Genre::Rock,
        Genre::Jazz,
        Genre::HipHop,
        Genre::LoFi,
        Genre::Classical,
        Genre::Electronic,
    ];

    /// Display name, also the text appended to catalog queries
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::All => "All",
            Genre::JPop => "J-Pop",
            Genre::KPop => "K-Pop",
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::Jazz => "Jazz",
            Genre::HipHop => "Hip-Hop",
            Genre::LoFi => "Lo-Fi",
            Genre::Classical => "Classical",
            Genre::Electronic => "Electronic",
        }
    }

    /// `All` means no genre constraint
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Genre::All)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Genre::ALL.iter().map(|g| g.as_str()).collect();
                Error::InvalidInput(format!(
                    "unknown genre '{}' (expected one of: {})",
                    wanted,
                    names.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_parses_short_codes() {
        assert_eq!("neu".parse::<Emotion>().unwrap(), Emotion::Neutral);
        assert_eq!("hap".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!("sad".parse::<Emotion>().unwrap(), Emotion::Sad);
        assert_eq!("ang".parse::<Emotion>().unwrap(), Emotion::Angry);
    }

    #[test]
    fn test_emotion_parses_canonical_names_case_insensitively() {
        assert_eq!(" Happy ".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!("ANGRY".parse::<Emotion>().unwrap(), Emotion::Angry);
        assert!("furious".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_emotion_display_is_canonical_name() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.to_string().parse::<Emotion>().unwrap(), emotion);
        }
        assert_eq!(Emotion::default(), Emotion::Neutral);
    }

    #[test]
    fn test_genre_parse_is_case_insensitive() {
        assert_eq!("jazz".parse::<Genre>().unwrap(), Genre::Jazz);
        assert_eq!("hip-hop".parse::<Genre>().unwrap(), Genre::HipHop);
        assert_eq!("LO-FI".parse::<Genre>().unwrap(), Genre::LoFi);
        assert_eq!("All".parse::<Genre>().unwrap(), Genre::All);
    }

    #[test]
    fn test_genre_rejects_unknown_names() {
        let err = "polka".parse::<Genre>().unwrap_err();
        assert!(err.to_string().contains("polka"));
    }

    #[test]
    fn test_only_all_is_unconstrained() {
        let unconstrained: Vec<Genre> = Genre::ALL
            .iter()
            .copied()
            .filter(|g| g.is_unconstrained())
            .collect();
        assert_eq!(unconstrained, vec![Genre::All]);
        assert_eq!(Genre::ALL[0], Genre::All);
    }
}
