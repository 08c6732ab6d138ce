//! Per-cycle scratch copy of the captured clip
//!
//! The transcriber and the tone classifier both read the clip from disk. The
//! copy lives exactly as long as its `ScratchAudio` value: dropping it (normal
//! return, `?` early exit or unwinding panic) removes the file.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Extension used when the caller does not know the container format
pub const DEFAULT_EXTENSION: &str = "wav";

/// Temporary audio file removed on drop
#[derive(Debug)]
pub struct ScratchAudio {
    file: NamedTempFile,
}

impl ScratchAudio {
    /// Write `bytes` to a fresh uniquely named file in the system temp dir
    pub fn write(bytes: &[u8], extension: Option<&str>) -> std::io::Result<Self> {
        let suffix = format!(".{}", normalize_extension(extension));
        let mut file = tempfile::Builder::new()
            .prefix("emp-input-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "Scratch audio written");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Strip a leading dot and reject anything that is not a plain alphanumeric extension
pub fn normalize_extension(extension: Option<&str>) -> String {
    extension
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
