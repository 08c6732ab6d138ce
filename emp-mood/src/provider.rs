//! Memoizing model provider
//!
//! Wraps an expensive constructor so the model is built at most once per
//! process and shared afterwards. A failed construction is remembered too:
//! later calls report the stored reason without running the constructor
//! again, until [`ModelProvider::reset`] is called.

use crate::error::{MoodError, MoodResult};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

type Loader<T> = Box<dyn Fn() -> MoodResult<Arc<T>> + Send + Sync>;

enum Slot<T: ?Sized> {
    Unloaded,
    Ready(Arc<T>),
    Failed(String),
}

/// Externally visible provider state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    Unloaded,
    Ready,
    Failed(String),
}

/// Construct-once handle to a shared model
pub struct ModelProvider<T: ?Sized> {
    name: String,
    loader: Loader<T>,
    slot: Mutex<Slot<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> ModelProvider<T> {
    /// Lazy provider; `loader` runs on the first [`get`](Self::get)
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> MoodResult<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            loader: Box::new(loader),
            slot: Mutex::new(Slot::Unloaded),
        }
    }

    /// Provider around an already constructed model
    pub fn ready(name: impl Into<String>, model: Arc<T>) -> Self {
        let shared = Arc::clone(&model);
        Self {
            name: name.into(),
            loader: Box::new(move || Ok(Arc::clone(&shared))),
            slot: Mutex::new(Slot::Ready(model)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared model handle, constructing it on first use
    ///
    /// # Errors
    /// * `MoodError::Unavailable` - construction failed now or on an earlier call
    pub fn get(&self) -> MoodResult<Arc<T>> {
        let mut slot = self.lock();
        match &*slot {
            Slot::Ready(model) => return Ok(Arc::clone(model)),
            Slot::Failed(reason) => return Err(MoodError::Unavailable(reason.clone())),
            Slot::Unloaded => {}
        }

        info!("Loading model '{}'", self.name);
        match (self.loader)() {
            Ok(model) => {
                info!("Model '{}' ready", self.name);
                *slot = Slot::Ready(Arc::clone(&model));
                Ok(model)
            }
            Err(e) => {
                let reason = format!("{}: {}", self.name, e);
                warn!("Failed to load model {}", reason);
                *slot = Slot::Failed(reason.clone());
                Err(MoodError::Unavailable(reason))
            }
        }
    }

    pub fn state(&self) -> ModelState {
        match &*self.lock() {
            Slot::Unloaded => ModelState::Unloaded,
            Slot::Ready(_) => ModelState::Ready,
            Slot::Failed(reason) => ModelState::Failed(reason.clone()),
        }
    }

    /// Forget the loaded model or memoized failure so the next `get` retries
    pub fn reset(&self) {
        *self.lock() = Slot::Unloaded;
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        // A panic inside the loader cannot leave the slot half-written
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: ?Sized> fmt::Debug for ModelProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProvider")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
