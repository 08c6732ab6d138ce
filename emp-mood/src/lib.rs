//! emp-mood library
//!
//! Spoken mood → fused emotion → sanitized catalog recommendations, plus the
//! per-session history of completed cycles. The `emp-mood` binary is a thin
//! command-line front end over [`workflow::MoodPipeline`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fusion;
pub mod history;
pub mod provider;
pub mod session;
pub mod types;
pub mod utils;
pub mod workflow;

pub use crate::error::{MoodError, MoodResult};
pub use crate::fusion::{fuse, DecidedBy, FusedEmotion};
pub use crate::history::{HistoryEntry, HistoryLog};
pub use crate::provider::{ModelProvider, ModelState};
pub use crate::session::{InputDigest, SessionContext};
pub use crate::types::{EmotionReading, Fallback, RecommendationResult, Track, Waveform};
pub use crate::workflow::{Analysis, MoodPipeline};
