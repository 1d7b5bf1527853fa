//! # reverb-core
//!
//! Core primitives for the Reverb event emitter.
//!
//! This crate has minimal dependencies and holds everything an emitter is
//! built from, without any matching strategy:
//!
//! - [`ItemQueue`] - a priority queue, FIFO within a priority
//! - [`TaskQueue`] - runs async [`Task`]s in priority order with optional
//!   `before`/`after` tasks, stopping at the first [`HookResult::Stop`]
//! - [`Hook`] - an async callable receiving the matched [`Event`]
//! - [`Status`] - the outcome of a dispatch (`200 OK`, `404 Not Found`,
//!   `309 Aborted`)
//!
//! Emitters, matchers and the router live in `reverb-std`.
//!
//! # Error Types
//!
//! - [`ReverbError`] - Top-level error type
//! - [`PatternError`] - Pattern compilation errors
//! - [`BoxError`] - Errors returned by tasks and hooks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod hook;
mod queue;
mod response;
pub mod status;
mod task;

// Re-exports
pub use error::{BoxError, PatternError, ReverbError};
pub use event::{Event, EventData, EventKey, EventMatch, ListenerId};
pub use hook::{DynHook, Hook, HookResult};
pub use queue::ItemQueue;
pub use response::IntoHookResult;
pub use status::Status;
pub use task::{DynTask, Task, TaskQueue};
