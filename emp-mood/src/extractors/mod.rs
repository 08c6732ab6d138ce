// Tier 1 Extractors - Mood Signal Extraction
//
// Two independent signals are extracted from one captured clip:
// - vocal tone (audio emotion classifier over the decoded waveform)
// - spoken content (transcriber → translator → sentiment classifier)
//
// The model traits below are the seams to black-box collaborators. The
// classifier wrappers own label mapping and the neutral fallback policy.

use crate::error::MoodResult;
use crate::types::Waveform;
use async_trait::async_trait;
use std::path::Path;

pub mod audio_emotion;
pub mod inference_client;
pub mod text_emotion;
pub mod transcriber;

pub use audio_emotion::{map_tone_label, AudioEmotionClassifier};
pub use inference_client::InferenceClient;
pub use text_emotion::{map_sentiment_label, TextEmotionClassifier};
pub use transcriber::TranscriptionAdapter;

/// Speech-to-text model
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an existing audio file; silence yields an empty string
    async fn transcribe(&self, audio_path: &Path) -> MoodResult<String>;
}

/// Vocal tone emotion model
#[async_trait]
pub trait ToneClassifier: Send + Sync {
    /// Classify a waveform, returning the model's native label
    async fn classify(&self, waveform: &Waveform) -> MoodResult<String>;
}

/// Text translation model
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> MoodResult<String>;
}

/// Text emotion model
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify text, returning the top native label and its score
    async fn classify(&self, text: &str) -> MoodResult<(String, f64)>;
}
