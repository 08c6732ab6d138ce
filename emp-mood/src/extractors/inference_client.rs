//! Hosted model inference client
//!
//! One HTTP client serves all four model seams. Every model is addressed as
//! `POST {base_url}/{model}` with a bearer token:
//!
//! | Seam                  | Request body                | Response                          |
//! |-----------------------|-----------------------------|-----------------------------------|
//! | `Transcriber`         | raw audio bytes             | `{"text": "..."}`                 |
//! | `ToneClassifier`      | 16 kHz mono WAV             | `[{"label", "score"}, ...]`       |
//! | `Translator`          | `{"inputs": "..."}`         | `[{"translation_text": "..."}]`   |
//! | `SentimentClassifier` | `{"inputs": "..."}`         | `[[{"label", "score"}, ...]]`     |
//!
//! A body of the form `{"error": "..."}` is surfaced as a collaborator error
//! whatever the status code. There are no retries; callers fall back to neutral.

use super::{SentimentClassifier, ToneClassifier, Transcriber, Translator};
use crate::error::{MoodError, MoodResult};
use crate::types::Waveform;
use async_trait::async_trait;
use emp_common::config::InferenceConfig;
use reqwest::{header, Client};
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("emp-mood/", env!("CARGO_PKG_VERSION"));

/// Client for a hosted inference endpoint
pub struct InferenceClient {
    client: Client,
    base_url: String,
    token: String,
    asr_model: String,
    tone_model: String,
    translation_model: String,
    sentiment_model: String,
}

impl InferenceClient {
    /// Build a client from config and an already resolved token
    ///
    /// # Errors
    /// * `MoodError::Unavailable` - no token
    /// * `MoodError::Http` - HTTP client construction failed
    pub fn new(config: &InferenceConfig, token: Option<String>) -> MoodResult<Self> {
        let token = token.ok_or_else(|| {
            MoodError::Unavailable("no inference API token configured".to_string())
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            asr_model: config.asr_model.clone(),
            tone_model: config.tone_model.clone(),
            translation_model: config.translation_model.clone(),
            sentiment_model: config.sentiment_model.clone(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    async fn post_bytes(&self, model: &str, content_type: &str, body: Vec<u8>) -> MoodResult<Value> {
        debug!(model = %model, bytes = body.len(), "Posting audio to inference endpoint");
        let response = self
            .client
            .post(self.model_url(model))
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        read_json(model, response).await
    }

    async fn post_inputs(&self, model: &str, inputs: &str) -> MoodResult<Value> {
        debug!(model = %model, chars = inputs.chars().count(), "Posting text to inference endpoint");
        let response = self
            .client
            .post(self.model_url(model))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "inputs": inputs }))
            .send()
            .await?;
        read_json(model, response).await
    }
}

async fn read_json(model: &str, response: reqwest::Response) -> MoodResult<Value> {
    let status = response.status();
    let text = response.text().await?;
    let body: Option<Value> = serde_json::from_str(&text).ok();

    if let Some(message) = body.as_ref().and_then(error_message) {
        return Err(MoodError::Collaborator(format!(
            "{} returned {}: {}",
            model, status, message
        )));
    }
    if !status.is_success() {
        return Err(MoodError::Collaborator(format!(
            "{} returned {}: {}",
            model,
            status,
            text.chars().take(200).collect::<String>()
        )));
    }

    body.ok_or_else(|| MoodError::Collaborator(format!("{} returned a non-JSON body", model)))
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Extract the transcript from an ASR response
pub fn parse_transcription(body: &Value) -> MoodResult<String> {
    let text = match body {
        Value::Array(items) => items.first().and_then(|item| item.get("text")),
        other => other.get("text"),
    };
    text.and_then(Value::as_str)
        .map(|t| t.trim().to_string())
        .ok_or_else(|| MoodError::Collaborator("transcription response has no text".to_string()))
}

/// Highest scoring `{label, score}` entry of a classification response
///
/// Accepts both a flat list and a list nested one level deep. Entries
/// without a string label or numeric score are ignored.
pub fn top_label(body: &Value) -> MoodResult<(String, f64)> {
    let entries: &[Value] = match body.as_array() {
        Some(outer) => match outer.first() {
            Some(Value::Array(inner)) => inner.as_slice(),
            _ => outer.as_slice(),
        },
        None => &[],
    };

    entries
        .iter()
        .filter_map(|entry| {
            let label = entry.get("label")?.as_str()?;
            let score = entry.get("score")?.as_f64()?;
            Some((label.to_string(), score))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| MoodError::Collaborator("classification response has no labels".to_string()))
}

/// Extract the translated text from a translation response
pub fn parse_translation(body: &Value) -> MoodResult<String> {
    let text = match body {
        Value::Array(items) => items.first().and_then(|item| item.get("translation_text")),
        other => other.get("translation_text"),
    };
    text.and_then(Value::as_str)
        .map(|t| t.trim().to_string())
        .ok_or_else(|| MoodError::Collaborator("translation response has no text".to_string()))
}

/// Encode a waveform as 16-bit PCM WAV
pub fn encode_wav(waveform: &Waveform) -> MoodResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| MoodError::Decode(format!("WAV encode failed: {}", e)))?;
        for sample in &waveform.samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| MoodError::Decode(format!("WAV encode failed: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| MoodError::Decode(format!("WAV encode failed: {}", e)))?;
    }
    Ok(cursor.into_inner())
}

fn audio_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") | Some("mp4") | Some("aac") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Transcriber for InferenceClient {
    async fn transcribe(&self, audio_path: &Path) -> MoodResult<String> {
        let bytes = tokio::fs::read(audio_path).await?;
        let body = self
            .post_bytes(&self.asr_model, audio_content_type(audio_path), bytes)
            .await?;
        parse_transcription(&body)
    }
}

#[async_trait]
impl ToneClassifier for InferenceClient {
    async fn classify(&self, waveform: &Waveform) -> MoodResult<String> {
        let wav = encode_wav(waveform)?;
        let body = self.post_bytes(&self.tone_model, "audio/wav", wav).await?;
        let (label, score) = top_label(&body)?;
        debug!(label = %label, score = score, "Tone model prediction");
        Ok(label)
    }
}

#[async_trait]
impl Translator for InferenceClient {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> MoodResult<String> {
        debug!(from = %source_lang, to = %target_lang, "Translating transcript");
        let body = self.post_inputs(&self.translation_model, text).await?;
        parse_translation(&body)
    }
}

#[async_trait]
impl SentimentClassifier for InferenceClient {
    async fn classify(&self, text: &str) -> MoodResult<(String, f64)> {
        let body = self.post_inputs(&self.sentiment_model, text).await?;
        top_label(&body)
    }
}
