// Transcription Adapter
//
// Wraps the speech-to-text model. Always yields plain text: silence, a
// missing model or a failed call all come back as an empty transcript, which
// downstream treats as "no speech detected".

use super::Transcriber;
use crate::provider::ModelProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct TranscriptionAdapter {
    model: Arc<ModelProvider<dyn Transcriber>>,
}

impl TranscriptionAdapter {
    pub fn new(model: Arc<ModelProvider<dyn Transcriber>>) -> Self {
        Self { model }
    }

    pub fn provider(&self) -> &ModelProvider<dyn Transcriber> {
        &self.model
    }

    /// Transcribe `audio_path`, returning trimmed text or an empty string
    pub async fn transcribe(&self, audio_path: &Path) -> String {
        if !audio_path.exists() {
            warn!(path = %audio_path.display(), "Refusing to transcribe missing file");
            return String::new();
        }

        let model = match self.model.get() {
            Ok(model) => model,
            Err(e) => {
                warn!("Transcription skipped: {}", e);
                return String::new();
            }
        };

        match model.transcribe(audio_path).await {
            Ok(text) => {
                let text = text.trim().to_string();
                debug!(chars = text.chars().count(), "Transcription complete");
                text
            }
            Err(e) => {
                warn!("Transcription failed: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MoodError, MoodResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        text: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transcriber for Echo {
        async fn transcribe(&self, _audio_path: &Path) -> MoodResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl Transcriber for Broken {
        async fn transcribe(&self, _audio_path: &Path) -> MoodResult<String> {
            Err(MoodError::Collaborator("decoder crashed".to_string()))
        }
    }

    fn adapter_for(model: Arc<dyn Transcriber>) -> TranscriptionAdapter {
        TranscriptionAdapter::new(Arc::new(ModelProvider::ready("asr", model)))
    }

    #[tokio::test]
    async fn test_transcript_is_trimmed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let adapter = adapter_for(Arc::new(Echo {
            text: "  こんにちは  ",
            calls: AtomicUsize::new(0),
        }));
        assert_eq!(adapter.transcribe(file.path()).await, "こんにちは");
    }

    #[tokio::test]
    async fn test_missing_path_is_never_sent_to_model() {
        let echo = Arc::new(Echo {
            text: "hello",
            calls: AtomicUsize::new(0),
        });
        let adapter = adapter_for(echo.clone());

        let text = adapter
            .transcribe(Path::new("/definitely/not/here.wav"))
            .await;

        assert!(text.is_empty());
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_yields_empty_transcript() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let adapter = adapter_for(Arc::new(Broken));
        assert!(adapter.transcribe(file.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_model_yields_empty_transcript() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let adapter = TranscriptionAdapter::new(Arc::new(ModelProvider::new("asr", || {
            Err(MoodError::Unavailable("no token".to_string()))
        })));
        assert!(adapter.transcribe(file.path()).await.is_empty());
    }
}
