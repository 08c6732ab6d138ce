//! Audio Decoding Utilities
//!
//! **Purpose:** Decode a captured clip to the mono 16 kHz waveform the tone
//! classifier expects.
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, FLAC, OGG, AAC/M4A)
//! and rubato for resampling.

use crate::types::{Waveform, MODEL_SAMPLE_RATE};
use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to mono f32 samples at [`MODEL_SAMPLE_RATE`]
///
/// **Algorithm:**
/// 1. Probe the container (extension used as a hint)
/// 2. Decode every packet of the default audio track
/// 3. Average channels down to mono
/// 4. Resample to 16 kHz when the native rate differs
///
/// # Errors
/// * File I/O errors
/// * Unsupported format or no audio track
/// * Resampler construction or processing failure
pub fn decode_to_waveform(file_path: &Path) -> Result<Waveform> {
    let (samples, native_rate) = decode_mono(file_path)?;

    let samples = if native_rate != MODEL_SAMPLE_RATE {
        tracing::debug!(
            from = native_rate,
            to = MODEL_SAMPLE_RATE,
            "Resampling using rubato"
        );
        resample_mono(samples, native_rate, MODEL_SAMPLE_RATE)
            .context("Failed to resample audio")?
    } else {
        samples
    };

    Ok(Waveform::new(samples, MODEL_SAMPLE_RATE))
}

/// Decode to mono at the file's native sample rate
fn decode_mono(file_path: &Path) -> Result<(Vec<f32>, u32)> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open audio file: {}", file_path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Failed to probe audio file: {}", file_path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate unknown")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("Failed to create decoder for: {}", file_path.display()))?;

    let mut mono: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // End of stream
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(anyhow::anyhow!("Error reading packet: {}", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt frame: skip it, keep the rest of the clip
                tracing::debug!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to decode packet in {}: {}",
                    file_path.display(),
                    e
                ))
            }
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let buf = sample_buf
            .get_or_insert_with(|| SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        if buf.capacity() < decoded.capacity() * channels {
            *buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        }
        buf.copy_interleaved_ref(decoded);

        mono.extend(
            buf.samples()
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    }

    tracing::debug!(
        path = %file_path.display(),
        total_samples = mono.len(),
        sample_rate = sample_rate,
        "Audio decoding complete"
    );

    Ok((mono, sample_rate))
}

/// Resample mono samples with sinc interpolation
///
/// Single-pass: the chunk size equals the input length.
pub fn resample_mono(samples: Vec<f32>, source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples);
    }
    anyhow::ensure!(source_rate > 0, "Source sample rate must be non-zero");

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let num_frames = samples.len();

    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        2.0,        // Max resample ratio factor
        params,
        num_frames, // Chunk size = input length
        1,          // Mono
    )
    .context("Failed to create rubato resampler")?;

    let input_channels = vec![samples];
    let mut output = resampler
        .process(&input_channels, None)
        .context("Rubato resampling failed")?;

    let resampled = output.pop().unwrap_or_default();

    tracing::debug!(
        "Resampled {} frames ({} Hz) → {} frames ({} Hz)",
        num_frames,
        source_rate,
        resampled.len(),
        target_rate
    );

    Ok(resampled)
}
