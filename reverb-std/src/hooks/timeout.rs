//! Timeout hook for time-limited listeners.

use reverb_core::{BoxError, Event, Hook, HookResult};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned when a wrapped hook runs out of time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("listener for `{event}` timed out after {elapsed:?}")]
pub struct TimeoutError {
    /// The emitted event name.
    pub event: String,
    /// The configured limit.
    pub elapsed: Duration,
}

/// A hook that fails its dispatch when the inner hook takes too long.
pub struct TimeoutHook<H> {
    inner: H,
    duration: Duration,
}

impl<H> TimeoutHook<H> {
    /// Wrap `inner` with a time limit.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<A: Send + Sync + 'static, H: Hook<A>> Hook<A> for TimeoutHook<H> {
    async fn on_event(&self, event: &Event<A>) -> Result<HookResult, BoxError> {
        match timeout(self.duration, self.inner.on_event(event)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError {
                event: event.name().to_string(),
                elapsed: self.duration,
            })),
        }
    }
}
