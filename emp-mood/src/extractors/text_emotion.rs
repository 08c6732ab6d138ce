// Text Emotion Classifier
//
// Transcript → translation → sentiment model → canonical emotion.
//
// Both models are lazy: the sentiment model is constructed on the first
// non-empty transcript, the translator on the first one needing translation. An empty transcript short-circuits to neutral without
// touching either provider.

use super::{SentimentClassifier, Translator};
use crate::provider::ModelProvider;
use crate::types::{EmotionReading, Fallback};
use emp_common::config::{InferenceConfig, TextEmotionConfig};
use emp_common::Emotion;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Map a sentiment model label onto the canonical set
///
/// Fear is folded into sad and surprise into happy.
pub fn map_sentiment_label(raw: &str) -> Option<Emotion> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "joy" | "optimism" | "surprise" => Some(Emotion::Happy),
        "anger" => Some(Emotion::Angry),
        "sadness" | "fear" => Some(Emotion::Sad),
        "neutral" => Some(Emotion::Neutral),
        _ => None,
    }
}

pub struct TextEmotionClassifier {
    translator: Arc<ModelProvider<dyn Translator>>,
    sentiment: Arc<ModelProvider<dyn SentimentClassifier>>,
    source_language: String,
    target_language: String,
    /// Confidence gate; `None` accepts every prediction
    min_confidence: Option<f64>,
}

impl TextEmotionClassifier {
    pub fn new(
        translator: Arc<ModelProvider<dyn Translator>>,
        sentiment: Arc<ModelProvider<dyn SentimentClassifier>>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            sentiment,
            source_language: source_language.into(),
            target_language: target_language.into(),
            min_confidence: None,
        }
    }

    /// Classifier with languages and confidence gate taken from config
    pub fn from_config(
        translator: Arc<ModelProvider<dyn Translator>>,
        sentiment: Arc<ModelProvider<dyn SentimentClassifier>>,
        inference: &InferenceConfig,
        policy: &TextEmotionConfig,
    ) -> Self {
        Self::new(
            translator,
            sentiment,
            &inference.source_language,
            &inference.target_language,
        )
        .with_min_confidence(policy.min_confidence)
    }

    pub fn with_min_confidence(mut self, min_confidence: Option<f64>) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn translator_provider(&self) -> &ModelProvider<dyn Translator> {
        &self.translator
    }

    pub fn sentiment_provider(&self) -> &ModelProvider<dyn SentimentClassifier> {
        &self.sentiment
    }

    /// Classify a transcript in the spoken language
    pub async fn classify(&self, transcript: &str) -> EmotionReading {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            debug!("Text emotion: empty transcript, neutral without model calls");
            return EmotionReading::fallback(Fallback::EmptyTranscript);
        }

        let sentiment = match self.sentiment.get() {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!("Text emotion: {}, defaulting to neutral", e);
                return EmotionReading::fallback(Fallback::ModelUnavailable);
            }
        };

        let text = if self.source_language.eq_ignore_ascii_case(&self.target_language) {
            transcript.to_string()
        } else {
            // Translator loads only when a translation is actually needed
            let translator = match self.translator.get() {
                Ok(translator) => translator,
                Err(e) => {
                    warn!("Text emotion: {}, defaulting to neutral", e);
                    return EmotionReading::fallback(Fallback::ModelUnavailable);
                }
            };
            match translator
                .translate(transcript, &self.source_language, &self.target_language)
                .await
            {
                Ok(text) => {
                    debug!(translated = %text, "Transcript translated");
                    text
                }
                Err(e) => {
                    warn!("Text emotion: translation failed, defaulting to neutral: {}", e);
                    return EmotionReading::fallback(Fallback::InvocationFailed);
                }
            }
        };

        let (raw, score) = match sentiment.classify(&text).await {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("Text emotion: classification failed, defaulting to neutral: {}", e);
                return EmotionReading::fallback(Fallback::InvocationFailed);
            }
        };

        info!(raw = %raw, score = score, "Text emotion raw prediction");

        let Some(label) = map_sentiment_label(&raw) else {
            debug!(raw = %raw, "Text emotion: unrecognized label, defaulting to neutral");
            return EmotionReading::fallback_with_raw(Fallback::UnrecognizedLabel, raw, Some(score));
        };

        if let Some(min) = self.min_confidence {
            if score < min {
                debug!(score = score, min = min, "Text emotion below confidence gate");
                return EmotionReading::fallback_with_raw(Fallback::LowConfidence, raw, Some(score));
            }
        }

        EmotionReading::classified(label, raw, Some(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_sentiment_label_table() {
        let table = [
            ("joy", Emotion::Happy),
            ("optimism", Emotion::Happy),
            ("anger", Emotion::Angry),
            ("sadness", Emotion::Sad),
            ("fear", Emotion::Sad),
            ("surprise", Emotion::Happy),
            ("neutral", Emotion::Neutral),
        ];
        for (raw, expected) in table {
            assert_eq!(map_sentiment_label(raw), Some(expected), "label {}", raw);
        }
    }

    #[test]
    fn test_map_sentiment_label_is_case_insensitive() {
        assert_eq!(map_sentiment_label("Joy"), Some(Emotion::Happy));
        assert_eq!(map_sentiment_label("LABEL_3"), None);
        assert_eq!(map_sentiment_label(""), None);
    }
}
