//! Utility modules for emp-mood

pub mod audio_decoder;
pub mod scratch_audio;

pub use audio_decoder::{decode_to_waveform, resample_mono};
pub use scratch_audio::ScratchAudio;
