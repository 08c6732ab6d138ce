//! Fake collaborators with call counters

use async_trait::async_trait;
use emp_mood::catalog::{CatalogClient, Recommender};
use emp_mood::extractors::{
    AudioEmotionClassifier, SentimentClassifier, TextEmotionClassifier, ToneClassifier,
    Transcriber, TranscriptionAdapter, Translator,
};
use emp_mood::{ModelProvider, MoodError, MoodPipeline, MoodResult, Waveform};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Model providers
// ============================================================================

/// Lazy provider that counts how often its loader runs
pub fn counting_provider<T: ?Sized + Send + Sync + 'static>(
    name: &str,
    model: Arc<T>,
    loads: Arc<AtomicUsize>,
) -> Arc<ModelProvider<T>> {
    Arc::new(ModelProvider::new(name, move || {
        loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&model))
    }))
}

/// Lazy provider whose loader always fails
pub fn failing_provider<T: ?Sized + Send + Sync + 'static>(
    name: &str,
    loads: Arc<AtomicUsize>,
) -> Arc<ModelProvider<T>> {
    Arc::new(ModelProvider::new(name, move || {
        loads.fetch_add(1, Ordering::SeqCst);
        Err(MoodError::Unavailable("weights not found".to_string()))
    }))
}

// ============================================================================
// Models
// ============================================================================

pub struct FakeTranscriber {
    text: String,
    pub calls: AtomicUsize,
    /// Every path received, with whether it existed at call time
    pub seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl FakeTranscriber {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> MoodResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((audio_path.to_path_buf(), audio_path.exists()));
        Ok(self.text.clone())
    }
}

pub struct FakeTone {
    outcome: Result<String, String>,
    pub calls: AtomicUsize,
}

impl FakeTone {
    pub fn label(label: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(label.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToneClassifier for FakeTone {
    async fn classify(&self, _waveform: &Waveform) -> MoodResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(MoodError::Collaborator)
    }
}

pub struct FakeTranslator {
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeTranslator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> MoodResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MoodError::Collaborator("translator timed out".to_string()));
        }
        Ok(format!("[{}->{}] {}", source_lang, target_lang, text))
    }
}

pub struct FakeSentiment {
    label: String,
    score: f64,
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
}

impl FakeSentiment {
    pub fn new(label: &str, score: f64) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            score,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentimentClassifier for FakeSentiment {
    async fn classify(&self, text: &str) -> MoodResult<(String, f64)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        Ok((self.label.clone(), self.score))
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub struct FakeCatalog {
    search: Result<Value, String>,
    listing: Result<Value, String>,
    pub search_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    /// `(query, limit, market)` of every search
    pub searches: Mutex<Vec<(String, u32, Option<String>)>>,
    /// `(collection_id, limit)` of every listing
    pub listings: Mutex<Vec<(String, u32)>>,
}

impl FakeCatalog {
    pub fn new(search: Value, listing: Value) -> Arc<Self> {
        Self::with_outcomes(Ok(search), Ok(listing))
    }

    pub fn with_outcomes(search: Result<Value, String>, listing: Result<Value, String>) -> Arc<Self> {
        Arc::new(Self {
            search,
            listing,
            search_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            searches: Mutex::new(Vec::new()),
            listings: Mutex::new(Vec::new()),
        })
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _, _)| q.clone())
            .collect()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search_collections(
        &self,
        query: &str,
        limit: u32,
        market: Option<&str>,
    ) -> MoodResult<Value> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), limit, market.map(str::to_string)));
        self.search.clone().map_err(MoodError::Collaborator)
    }

    async fn list_items(&self, collection_id: &str, limit: u32) -> MoodResult<Value> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listings
            .lock()
            .unwrap()
            .push((collection_id.to_string(), limit));
        self.listing.clone().map_err(MoodError::Collaborator)
    }
}

// ============================================================================
// Pipeline harness
// ============================================================================

/// All fakes wired into one pipeline
pub struct Harness {
    pub transcriber: Arc<FakeTranscriber>,
    pub tone: Arc<FakeTone>,
    pub translator: Arc<FakeTranslator>,
    pub sentiment: Arc<FakeSentiment>,
    pub catalog: Arc<FakeCatalog>,
    /// Loader runs of the translator and sentiment providers combined
    pub text_loads: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(
        transcriber: Arc<FakeTranscriber>,
        tone: Arc<FakeTone>,
        sentiment: Arc<FakeSentiment>,
        catalog: Arc<FakeCatalog>,
    ) -> Self {
        Self {
            transcriber,
            tone,
            translator: FakeTranslator::new(),
            sentiment,
            catalog,
            text_loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn pipeline(&self) -> MoodPipeline {
        let asr = Arc::clone(&self.transcriber) as Arc<dyn Transcriber>;
        let tone = Arc::clone(&self.tone) as Arc<dyn ToneClassifier>;
        let translator = Arc::clone(&self.translator) as Arc<dyn Translator>;
        let sentiment = Arc::clone(&self.sentiment) as Arc<dyn SentimentClassifier>;
        let catalog = Arc::clone(&self.catalog) as Arc<dyn CatalogClient>;

        MoodPipeline::new(
            TranscriptionAdapter::new(Arc::new(ModelProvider::ready("asr", asr))),
            AudioEmotionClassifier::new(Arc::new(ModelProvider::ready("tone", tone))),
            TextEmotionClassifier::new(
                counting_provider("translator", translator, Arc::clone(&self.text_loads)),
                counting_provider("sentiment", sentiment, Arc::clone(&self.text_loads)),
                "ja",
                "en",
            ),
            Recommender::new(catalog),
        )
    }

    pub fn text_loads(&self) -> usize {
        self.text_loads.load(Ordering::SeqCst)
    }
}
