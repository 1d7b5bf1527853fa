//! Testing utilities for Reverb.
//!
//! - [`RecordingHook`]: A hook that records every event it receives
//! - [`CountingHook`]: A hook that counts invocations

use reverb_core::{BoxError, Event, Hook, HookResult};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Hook
// ============================================================================

/// A hook that records all events it receives.
///
/// Clones share the same record, so keep one clone and register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHook::<u32>::new();
/// emitter.on("tick", recorder.clone(), 0)?;
///
/// emitter.emit("tick", 1).await?;
/// assert_eq!(recorder.count(), 1);
/// ```
pub struct RecordingHook<A> {
    events: Arc<Mutex<Vec<Event<A>>>>,
    result: HookResult,
}

impl<A> RecordingHook<A> {
    /// Create a new recording hook that returns `Next`.
    pub fn new() -> Self {
        Self::with_result(HookResult::Next)
    }

    /// Create a recording hook that returns a specific result.
    pub fn with_result(result: HookResult) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<A: Clone> RecordingHook<A> {
    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<Event<A>> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of the recorded events, in order.
    pub fn names(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|event| event.name().to_string())
            .collect()
    }
}

impl<A> Default for RecordingHook<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for RecordingHook<A> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            result: self.result,
        }
    }
}

impl<A: Clone + Send + Sync + 'static> Hook<A> for RecordingHook<A> {
    async fn on_event(&self, event: &Event<A>) -> Result<HookResult, BoxError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(self.result)
    }
}

// ============================================================================
// Counting Hook
// ============================================================================

/// A hook that counts invocations.
#[derive(Clone, Default)]
pub struct CountingHook {
    count: Arc<AtomicUsize>,
}

impl CountingHook {
    /// Create a new counting hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<A: Send + Sync + 'static> Hook<A> for CountingHook {
    async fn on_event(&self, _event: &Event<A>) -> Result<HookResult, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(HookResult::Next)
    }
}
