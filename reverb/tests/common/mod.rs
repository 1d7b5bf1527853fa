#![allow(dead_code)]

use reverb::{BoxError, Event, Hook, HookResult};
use std::sync::{Arc, Mutex, Once};

// ============================================================================
// Tracing
// ============================================================================

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Order Recording
// ============================================================================

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A hook that appends its label to a shared log and returns `result`.
pub struct OrderRecordingHook {
    pub label: &'static str,
    pub log: Log,
    pub result: HookResult,
}

impl OrderRecordingHook {
    pub fn next(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: log.clone(),
            result: HookResult::Next,
        }
    }

    pub fn stop(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: log.clone(),
            result: HookResult::Stop,
        }
    }
}

impl<A: Send + Sync + 'static> Hook<A> for OrderRecordingHook {
    async fn on_event(&self, _event: &Event<A>) -> Result<HookResult, BoxError> {
        self.log.lock().unwrap().push(self.label.to_string());
        Ok(self.result)
    }
}

/// A hook that fails with `message`.
pub struct FailingHook {
    pub message: &'static str,
}

impl<A: Send + Sync + 'static> Hook<A> for FailingHook {
    async fn on_event(&self, _event: &Event<A>) -> Result<HookResult, BoxError> {
        Err(self.message.into())
    }
}
