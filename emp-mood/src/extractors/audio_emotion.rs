// Audio Emotion Classifier
//
// Vocal tone → canonical emotion. The model's native vocabulary is always
// passed through `map_tone_label`, even when it already looks canonical.
// Fail-open: decode errors, missing models and failed calls all yield a
// neutral reading tagged with the matching `Fallback`.

use super::ToneClassifier;
use crate::provider::ModelProvider;
use crate::types::{EmotionReading, Fallback, Waveform};
use crate::utils::decode_to_waveform;
use emp_common::Emotion;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Map a tone model label onto the canonical set (case-insensitive)
///
/// Covers the short SUPERB codes (`neu`, `hap`, `sad`, `ang`) and their long forms.
pub fn map_tone_label(raw: &str) -> Option<Emotion> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "neu" | "neutral" => Some(Emotion::Neutral),
        "hap" | "happy" | "happiness" | "joy" => Some(Emotion::Happy),
        "sad" | "sadness" => Some(Emotion::Sad),
        "ang" | "angry" | "anger" => Some(Emotion::Angry),
        _ => None,
    }
}

pub struct AudioEmotionClassifier {
    model: Arc<ModelProvider<dyn ToneClassifier>>,
}

impl AudioEmotionClassifier {
    pub fn new(model: Arc<ModelProvider<dyn ToneClassifier>>) -> Self {
        Self { model }
    }

    pub fn provider(&self) -> &ModelProvider<dyn ToneClassifier> {
        &self.model
    }

    /// Decode `audio_path` to 16 kHz mono and classify it
    pub async fn classify_file(&self, audio_path: &Path) -> EmotionReading {
        let path = audio_path.to_path_buf();
        let decoded = tokio::task::spawn_blocking(move || decode_to_waveform(&path)).await;

        match decoded {
            Ok(Ok(waveform)) if waveform.is_empty() => {
                warn!("Audio emotion: clip decoded to no samples, defaulting to neutral");
                EmotionReading::fallback(Fallback::InvocationFailed)
            }
            Ok(Ok(waveform)) => {
                debug!(
                    seconds = waveform.duration_seconds(),
                    samples = waveform.samples.len(),
                    "Clip decoded"
                );
                self.classify_waveform(&waveform).await
            }
            Ok(Err(e)) => {
                warn!("Audio emotion: decode failed, defaulting to neutral: {:#}", e);
                EmotionReading::fallback(Fallback::InvocationFailed)
            }
            Err(e) => {
                warn!("Audio emotion: decode task failed, defaulting to neutral: {}", e);
                EmotionReading::fallback(Fallback::InvocationFailed)
            }
        }
    }

    /// Classify an already decoded waveform
    pub async fn classify_waveform(&self, waveform: &Waveform) -> EmotionReading {
        let model = match self.model.get() {
            Ok(model) => model,
            Err(e) => {
                warn!("Audio emotion: {}, defaulting to neutral", e);
                return EmotionReading::fallback(Fallback::ModelUnavailable);
            }
        };

        let raw = match model.classify(waveform).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Audio emotion: classification failed, defaulting to neutral: {}", e);
                return EmotionReading::fallback(Fallback::InvocationFailed);
            }
        };

        match map_tone_label(&raw) {
            Some(label) => {
                debug!(raw = %raw, label = %label, "Audio emotion classified");
                EmotionReading::classified(label, raw, None)
            }
            None => {
                warn!(raw = %raw, "Audio emotion: unrecognized label, defaulting to neutral");
                EmotionReading::fallback_with_raw(Fallback::UnrecognizedLabel, raw, None)
            }
        }
    }
}
