//! # Hooks
//!
//! A hook is the unit an emitter runs for a matched event: a registered
//! listener, or a `before`/`after` hook wrapped around every listener.
//!
//! Hooks receive the [`Event`] of the listener currently running and decide
//! whether the dispatch continues (`Next`) or is aborted (`Stop`).
//!
//! Any `Fn(Event<A>) -> impl Future` closure whose output implements
//! [`IntoHookResult`] is a hook, so most callers never implement the trait
//! by hand.

use crate::{error::BoxError, event::Event, response::IntoHookResult};
use futures::future::BoxFuture;
use std::future::Future;

/// Result of hook execution indicating whether to continue or stop propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookResult {
    /// Continue with the next task in the queue.
    Next,
    /// Abort the dispatch; no further task runs.
    Stop,
}

/// An async callable invoked with the matched [`Event`].
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch. Emitters store
/// hooks as [`DynHook`] trait objects, which every `Hook` is automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook<{A}>`",
    label = "missing `Hook` implementation",
    note = "Closures of the form `Fn(Event<{A}>) -> impl Future` are hooks when their output implements `IntoHookResult`."
)]
pub trait Hook<A>: Send + Sync + 'static {
    /// Called when a matched event reaches this hook.
    fn on_event(
        &self,
        event: &Event<A>,
    ) -> impl Future<Output = Result<HookResult, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Hook`].
pub trait DynHook<A>: Send + Sync + 'static {
    /// Called when a matched event reaches this hook (dynamic dispatch version).
    fn on_event_dyn<'a>(&'a self, event: &'a Event<A>)
    -> BoxFuture<'a, Result<HookResult, BoxError>>;
}

impl<A, T: Hook<A>> DynHook<A> for T {
    fn on_event_dyn<'a>(
        &'a self,
        event: &'a Event<A>,
    ) -> BoxFuture<'a, Result<HookResult, BoxError>> {
        Box::pin(self.on_event(event))
    }
}

impl<A, F, Fut> Hook<A> for F
where
    A: Clone + Send + Sync + 'static,
    F: Fn(Event<A>) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoHookResult,
{
    fn on_event(
        &self,
        event: &Event<A>,
    ) -> impl Future<Output = Result<HookResult, BoxError>> + Send {
        let fut = (self)(event.clone());
        async move { fut.await.into_hook_result() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventMatch, ListenerId};
    use std::sync::Arc;

    fn event(args: u32) -> Event<u32> {
        Event::new(Arc::new(EventMatch::literal("tick")), ListenerId::next(), 0, args)
    }

    struct Even;

    impl Hook<u32> for Even {
        async fn on_event(&self, event: &Event<u32>) -> Result<HookResult, BoxError> {
            Ok(if event.args() % 2 == 0 {
                HookResult::Next
            } else {
                HookResult::Stop
            })
        }
    }

    #[tokio::test]
    async fn test_closure_is_hook() {
        let hook = |event: Event<u32>| async move { *event.args() < 10 };
        assert_eq!(hook.on_event(&event(3)).await.unwrap(), HookResult::Next);
        assert_eq!(hook.on_event(&event(12)).await.unwrap(), HookResult::Stop);
    }

    #[tokio::test]
    async fn test_struct_hook_as_dyn() {
        let hook: Arc<dyn DynHook<u32>> = Arc::new(Even);
        assert_eq!(hook.on_event_dyn(&event(4)).await.unwrap(), HookResult::Next);
        assert_eq!(hook.on_event_dyn(&event(5)).await.unwrap(), HookResult::Stop);
    }
}
