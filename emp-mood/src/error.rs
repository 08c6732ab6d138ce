//! Error types for emp-mood
//!
//! Collaborator calls (models, catalog) return `MoodResult`. None of these
//! errors reach the listener directly: classifiers turn them into a neutral
//! fallback and the recommender turns them into an error result with a reason.

use thiserror::Error;

/// Mood pipeline error type
#[derive(Debug, Error)]
pub enum MoodError {
    /// Transport failure talking to a hosted model or the catalog
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Audio could not be decoded or resampled
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Collaborator answered, but not with something usable
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Model could not be constructed (memoized by the provider)
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// emp-common error
    #[error("Common error: {0}")]
    Common(#[from] emp_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for mood pipeline operations
pub type MoodResult<T> = Result<T, MoodError>;
