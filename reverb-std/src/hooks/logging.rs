//! Logging hook for event observation.

use reverb_core::{BoxError, Event, Hook, HookResult};
use tracing::Level;

/// A hook that logs every listener invocation and lets it run.
///
/// Install it as an emitter's `before` hook to trace dispatch.
#[derive(Debug, Clone, Copy)]
pub struct LoggingHook {
    level: Level,
}

impl LoggingHook {
    /// Log at `DEBUG`.
    pub fn new() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }

    /// Log at the given level.
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Send + Sync + 'static> Hook<A> for LoggingHook {
    async fn on_event(&self, event: &Event<A>) -> Result<HookResult, BoxError> {
        let (name, pattern, listener, priority) = (
            event.name(),
            event.pattern(),
            event.listener().get(),
            event.priority(),
        );
        if self.level == Level::ERROR {
            tracing::error!(event = name, pattern, listener, priority, "listener running");
        } else if self.level == Level::WARN {
            tracing::warn!(event = name, pattern, listener, priority, "listener running");
        } else if self.level == Level::INFO {
            tracing::info!(event = name, pattern, listener, priority, "listener running");
        } else if self.level == Level::DEBUG {
            tracing::debug!(event = name, pattern, listener, priority, "listener running");
        } else {
            tracing::trace!(event = name, pattern, listener, priority, "listener running");
        }
        Ok(HookResult::Next)
    }
}
