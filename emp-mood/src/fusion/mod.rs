// Fusion - Audio/Text Emotion Arbitration
//
// Two readings in, one label out. Vocal tone is the primary signal; spoken
// content only decides when the tone is neutral and the words are not.
//
// | audio    | text     | final | decided by |
// |----------|----------|-------|------------|
// | neutral  | neutral  | neu   | audio      |
// | neutral  | X ≠ neu  | X     | text       |
// | Y ≠ neu  | anything | Y     | audio      |
//
// A fallback reading fuses like any other neutral reading.

use crate::types::EmotionReading;
use emp_common::Emotion;
use serde::Serialize;
use std::fmt;

/// Fuse two canonical labels
pub fn fuse(audio: Emotion, text: Emotion) -> Emotion {
    match decide(audio, text) {
        DecidedBy::Audio => audio,
        DecidedBy::Text => text,
    }
}

fn decide(audio: Emotion, text: Emotion) -> DecidedBy {
    if audio.is_neutral() && !text.is_neutral() {
        DecidedBy::Text
    } else {
        DecidedBy::Audio
    }
}

/// Which signal the fused label came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecidedBy {
    Audio,
    Text,
}

impl fmt::Display for DecidedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecidedBy::Audio => f.write_str("audio"),
            DecidedBy::Text => f.write_str("text"),
        }
    }
}

/// Both readings plus the fused verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedEmotion {
    pub audio: EmotionReading,
    pub text: EmotionReading,
    pub final_label: Emotion,
    pub decided_by: DecidedBy,
}

impl FusedEmotion {
    pub fn from_readings(audio: EmotionReading, text: EmotionReading) -> Self {
        let decided_by = decide(audio.label, text.label);
        let final_label = match decided_by {
            DecidedBy::Audio => audio.label,
            DecidedBy::Text => text.label,
        };
        Self {
            audio,
            text,
            final_label,
            decided_by,
        }
    }
}
