//! # EMP Common Library
//!
//! Shared code for the EMP (Emotion Music Player) crates:
//! - Canonical mood vocabulary (`Emotion`, `Genre`)
//! - Configuration loading
//! - Error types
//! - Time helpers

pub mod config;
pub mod error;
pub mod mood;
pub mod time;

pub use error::{Error, Result};
pub use mood::{Emotion, Genre};
