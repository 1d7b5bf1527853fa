//! # reverb-std
//!
//! Emitters, matchers and the router for the Reverb event emitter.
//!
//! This crate provides:
//! - **Emitters**: [`Emitter`](emitter::Emitter) with the
//!   [`EventEmitter`](emitter::EventEmitter) and
//!   [`ExpressEmitter`](emitter::ExpressEmitter) flavours
//! - **Matchers**: [`Exact`](matcher::Exact) and
//!   [`Express`](matcher::Express) behind the [`Matcher`](matcher::Matcher)
//!   trait
//! - **Routing**: [`Router`](router::Router) and
//!   [`ContextRouter`](router::ContextRouter) with
//!   [`Request`](router::Request) and [`Response`](router::Response)
//! - **Standard hooks**: Logging, Timeout

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use reverb_core;

// Modules
pub mod emitter;
pub mod hooks;
pub mod matcher;
pub mod router;
pub mod testing;
