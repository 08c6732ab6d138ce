//! Mood workflow
//!
//! One cycle per captured clip:
//! 1. Write the clip to a scratch file (removed on every exit path)
//! 2. Transcribe and classify vocal tone from the same file
//! 3. Classify the transcript
//! 4. Fuse both readings
//! 5. On request, turn the fused (or manually chosen) emotion plus a genre
//!    into recommendations, recording successful cycles in the session history

pub mod pipeline;

pub use pipeline::MoodPipeline;

use crate::fusion::FusedEmotion;
use crate::types::EmotionReading;
use emp_common::Emotion;
use serde::Serialize;

/// Shown in place of an empty transcript
pub const NO_SPEECH_LABEL: &str = "(no speech detected)";

/// Result of analyzing one clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Trimmed transcript; empty when nothing was said
    pub transcript: String,
    pub fused: FusedEmotion,
}

impl Analysis {
    pub fn final_label(&self) -> Emotion {
        self.fused.final_label
    }

    pub fn audio(&self) -> &EmotionReading {
        &self.fused.audio
    }

    pub fn text(&self) -> &EmotionReading {
        &self.fused.text
    }

    pub fn transcript_display(&self) -> &str {
        if self.transcript.is_empty() {
            NO_SPEECH_LABEL
        } else {
            &self.transcript
        }
    }
}
