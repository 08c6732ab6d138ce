//! Test Helper Utilities
//!
//! Shared fakes and fixtures for emp-mood integration tests
#![allow(dead_code)]

pub mod audio_generator;
pub mod catalog_fixtures;
pub mod fakes;
pub mod http_server;

// Re-export commonly used items
pub use audio_generator::{generate_test_wav, wav_bytes, AudioConfig};
pub use catalog_fixtures::{playlist_search, track_item, track_listing};
pub use fakes::{
    counting_provider, failing_provider, FakeCatalog, FakeSentiment, FakeTone, FakeTranscriber,
    FakeTranslator, Harness,
};
pub use http_server::TestServer;
