//! Core types for the mood pipeline
//!
//! - `Waveform`: decoded mono audio handed to the tone classifier
//! - `EmotionReading` / `Fallback`: a classifier's verdict plus why it defaulted, if it did
//! - `Track` / `RecommendationResult`: the sanitized output of a recommendation cycle

use emp_common::Emotion;
use serde::Serialize;
use std::fmt;

/// Sample rate every classifier input is resampled to
pub const MODEL_SAMPLE_RATE: u32 = 16_000;

// ============================================================================
// Audio
// ============================================================================

/// Mono PCM audio
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Mono samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ============================================================================
// Classifier verdicts
// ============================================================================

/// Why a classifier substituted its safe default instead of a real prediction
///
/// | Fallback            | Trigger                                      |
/// |---------------------|----------------------------------------------|
/// | `EmptyTranscript`   | nothing was said (text classifier only)      |
/// | `ModelUnavailable`  | model construction failed (memoized)         |
/// | `InvocationFailed`  | model call or audio decode failed            |
/// | `UnrecognizedLabel` | model answered outside the mapping table     |
/// | `LowConfidence`     | score under the configured confidence gate   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    EmptyTranscript,
    ModelUnavailable,
    InvocationFailed,
    UnrecognizedLabel,
    LowConfidence,
}

impl Fallback {
    /// Safe label substituted for this failure kind
    pub fn default_label(&self) -> Emotion {
        match self {
            Fallback::EmptyTranscript
            | Fallback::ModelUnavailable
            | Fallback::InvocationFailed
            | Fallback::UnrecognizedLabel
            | Fallback::LowConfidence => Emotion::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Fallback::EmptyTranscript => "empty transcript",
            Fallback::ModelUnavailable => "model unavailable",
            Fallback::InvocationFailed => "model invocation failed",
            Fallback::UnrecognizedLabel => "unrecognized label",
            Fallback::LowConfidence => "low confidence",
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier's verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionReading {
    /// Canonical label (the fallback's default when `fallback` is set)
    pub label: Emotion,
    /// Label in the model's native vocabulary, when the model answered
    pub raw_label: Option<String>,
    /// Model score for `raw_label`, when reported
    pub confidence: Option<f64>,
    /// Set when the label is a substituted default
    pub fallback: Option<Fallback>,
}

impl EmotionReading {
    /// Genuine classification
    pub fn classified(label: Emotion, raw_label: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            label,
            raw_label: Some(raw_label.into()),
            confidence,
            fallback: None,
        }
    }

    /// Substituted default
    pub fn fallback(fallback: Fallback) -> Self {
        Self {
            label: fallback.default_label(),
            raw_label: None,
            confidence: None,
            fallback: Some(fallback),
        }
    }

    /// Substituted default that still remembers what the model said
    pub fn fallback_with_raw(
        fallback: Fallback,
        raw_label: impl Into<String>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            raw_label: Some(raw_label.into()),
            confidence,
            ..Self::fallback(fallback)
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

// ============================================================================
// Recommendation output
// ============================================================================

/// Sanitized playable track
///
/// Only obtainable through [`Track::new`], which refuses blank required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    name: String,
    artist: String,
    url: String,
    image: Option<String>,
    id: Option<String>,
}

impl Track {
    /// Build a track, or `None` if name, artist or url is blank
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        url: impl Into<String>,
    ) -> Option<Self> {
        let name = name.into();
        let artist = artist.into();
        let url = url.into();
        if is_blank(&name) || is_blank(&artist) || is_blank(&url) {
            return None;
        }
        Some(Self {
            name,
            artist,
            url,
            image: None,
            id: None,
        })
    }

    /// Attach artwork; blank values are ignored
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image.filter(|s| !is_blank(s));
        self
    }

    /// Attach catalog id; blank values are ignored
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id.filter(|s| !is_blank(s));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// `"<name> - <artist>"`, the form stored in history
    pub fn describe(&self) -> String {
        format!("{} - {}", self.name, self.artist)
    }

    /// Embeddable player URL when the catalog id is known
    pub fn embed_url(&self) -> Option<String> {
        self.id
            .as_ref()
            .map(|id| format!("https://open.spotify.com/embed/track/{}", id))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Outcome of one recommendation request
///
/// Never an empty success: no usable tracks is always an `Error` with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationResult {
    Tracks { tracks: Vec<Track> },
    Error { reason: String },
}

impl RecommendationResult {
    /// Wrap tracks, turning an empty list into `Error` with `empty_reason`
    pub fn from_tracks(tracks: Vec<Track>, empty_reason: impl Into<String>) -> Self {
        if tracks.is_empty() {
            RecommendationResult::error(empty_reason)
        } else {
            RecommendationResult::Tracks { tracks }
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        RecommendationResult::Error {
            reason: reason.into(),
        }
    }

    pub fn is_tracks(&self) -> bool {
        matches!(self, RecommendationResult::Tracks { .. })
    }

    pub fn tracks(&self) -> Option<&[Track]> {
        match self {
            RecommendationResult::Tracks { tracks } => Some(tracks),
            RecommendationResult::Error { .. } => None,
        }
    }

    pub fn top_track(&self) -> Option<&Track> {
        self.tracks().and_then(|t| t.first())
    }

    pub fn error_reason(&self) -> Option<&str> {
        match self {
            RecommendationResult::Tracks { .. } => None,
            RecommendationResult::Error { reason } => Some(reason),
        }
    }
}
