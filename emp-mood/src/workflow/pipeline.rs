//! Pipeline Orchestrator
//!
//! Owns the collaborators and runs one cycle at a time against a borrowed
//! `SessionContext`. The only writer of session history.
//!
//! # Error Handling
//! - Classifier failures never escape: each reading falls back to neutral
//! - Catalog failures never escape: they become `RecommendationResult::Error`
//! - Only writing the scratch file can fail an analysis
//!
//! # Example
//! ```rust,ignore
//! let pipeline = MoodPipeline::from_config(&config, credentials)?;
//! let mut session = SessionContext::new();
//! if let Some(analysis) = pipeline.analyze(&mut session, &bytes, Some("wav")).await? {
//!     let result = pipeline.recommend(&mut session, analysis.final_label(), Genre::All).await;
//! }
//! ```

use super::Analysis;
use crate::catalog::{CatalogClient, Recommender, SpotifyClient};
use crate::config::{resolve_inference_token, CatalogCredentials};
use crate::error::MoodResult;
use crate::extractors::{
    AudioEmotionClassifier, InferenceClient, SentimentClassifier, TextEmotionClassifier,
    ToneClassifier, Transcriber, TranscriptionAdapter, Translator,
};
use crate::fusion::FusedEmotion;
use crate::provider::ModelProvider;
use crate::session::{InputDigest, SessionContext};
use crate::types::RecommendationResult;
use crate::utils::ScratchAudio;
use emp_common::config::TomlConfig;
use emp_common::{time, Emotion, Genre};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MoodPipeline {
    transcriber: TranscriptionAdapter,
    audio: AudioEmotionClassifier,
    text: TextEmotionClassifier,
    recommender: Recommender,
}

impl MoodPipeline {
    pub fn new(
        transcriber: TranscriptionAdapter,
        audio: AudioEmotionClassifier,
        text: TextEmotionClassifier,
        recommender: Recommender,
    ) -> Self {
        Self {
            transcriber,
            audio,
            text,
            recommender,
        }
    }

    /// Pipeline backed by the hosted inference endpoint and the Spotify catalog
    ///
    /// Model providers are lazy; nothing is contacted until first use.
    ///
    /// # Errors
    /// * `MoodError::Http` - catalog HTTP client construction failed
    pub fn from_config(config: &TomlConfig, credentials: CatalogCredentials) -> MoodResult<Self> {
        let token = resolve_inference_token(config);
        if token.is_none() {
            warn!("No inference API token configured; every reading will fall back to neutral");
        }

        let asr: Arc<ModelProvider<dyn Transcriber>> = {
            let (inference, token) = (config.inference.clone(), token.clone());
            Arc::new(ModelProvider::new("asr", move || {
                let client = InferenceClient::new(&inference, token.clone())?;
                Ok(Arc::new(client) as Arc<dyn Transcriber>)
            }))
        };
        let tone: Arc<ModelProvider<dyn ToneClassifier>> = {
            let (inference, token) = (config.inference.clone(), token.clone());
            Arc::new(ModelProvider::new("tone", move || {
                let client = InferenceClient::new(&inference, token.clone())?;
                Ok(Arc::new(client) as Arc<dyn ToneClassifier>)
            }))
        };
        let translator: Arc<ModelProvider<dyn Translator>> = {
            let (inference, token) = (config.inference.clone(), token.clone());
            Arc::new(ModelProvider::new("translator", move || {
                let client = InferenceClient::new(&inference, token.clone())?;
                Ok(Arc::new(client) as Arc<dyn Translator>)
            }))
        };
        let sentiment: Arc<ModelProvider<dyn SentimentClassifier>> = {
            let (inference, token) = (config.inference.clone(), token);
            Arc::new(ModelProvider::new("sentiment", move || {
                let client = InferenceClient::new(&inference, token.clone())?;
                Ok(Arc::new(client) as Arc<dyn SentimentClassifier>)
            }))
        };

        let catalog: Arc<dyn CatalogClient> =
            Arc::new(SpotifyClient::new(credentials, &config.catalog)?);

        Ok(Self::new(
            TranscriptionAdapter::new(asr),
            AudioEmotionClassifier::new(tone),
            TextEmotionClassifier::from_config(
                translator,
                sentiment,
                &config.inference,
                &config.text_emotion,
            ),
            Recommender::from_config(catalog, &config.catalog),
        ))
    }

    /// Load the models every cycle needs (speech and tone) ahead of the first clip
    ///
    /// Failures are memoized by the providers and only logged here. The text
    /// models stay lazy until the first non-empty transcript.
    pub fn warm_up(&self) {
        for (name, outcome) in [
            (
                self.transcriber.provider().name(),
                self.transcriber.provider().get().map(|_| ()),
            ),
            (
                self.audio.provider().name(),
                self.audio.provider().get().map(|_| ()),
            ),
        ] {
            if let Err(e) = outcome {
                warn!("Warm-up of '{}' failed: {}", name, e);
            }
        }
    }

    pub fn transcriber(&self) -> &TranscriptionAdapter {
        &self.transcriber
    }

    pub fn audio_classifier(&self) -> &AudioEmotionClassifier {
        &self.audio
    }

    pub fn text_classifier(&self) -> &TextEmotionClassifier {
        &self.text
    }

    /// Analyze one captured clip
    ///
    /// Returns `Ok(None)` without doing any work when `bytes` are identical to
    /// the clip analyzed last in this session.
    ///
    /// # Errors
    /// * `MoodError::Io` - the scratch file could not be written
    pub async fn analyze(
        &self,
        session: &mut SessionContext,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> MoodResult<Option<Analysis>> {
        let digest = InputDigest::of(bytes);
        if session.is_repeat(&digest) {
            info!(digest = %digest, "Input identical to the last analyzed clip, skipping");
            return Ok(None);
        }

        let analysis = {
            let scratch = ScratchAudio::write(bytes, extension)?;
            self.analyze_file(scratch.path()).await
        };

        session.complete_analysis(digest, analysis.clone());
        Ok(Some(analysis))
    }

    /// Run transcription, both classifiers and fusion on an existing file
    pub async fn analyze_file(&self, audio_path: &Path) -> Analysis {
        debug!(path = %audio_path.display(), "Analyzing clip");

        let (transcript, audio) = tokio::join!(
            self.transcriber.transcribe(audio_path),
            self.audio.classify_file(audio_path)
        );
        let text = self.text.classify(&transcript).await;
        let fused = FusedEmotion::from_readings(audio, text);

        info!(
            audio = %fused.audio.label,
            text = %fused.text.label,
            final_label = %fused.final_label,
            decided_by = %fused.decided_by,
            "Emotion fused"
        );

        Analysis { transcript, fused }
    }

    /// Recommend tracks for `emotion` and `genre`
    ///
    /// `emotion` may differ from the analyzed label (manual override). A
    /// result with tracks is recorded in the session history.
    pub async fn recommend(
        &self,
        session: &mut SessionContext,
        emotion: Emotion,
        genre: Genre,
    ) -> RecommendationResult {
        let result = self.recommender.recommend(emotion, genre).await;
        if let Some(top) = result.top_track() {
            session
                .history_mut()
                .record(emotion, genre, top.describe(), time::now());
        }
        result
    }
}
