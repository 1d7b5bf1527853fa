//! # reverb - Pattern-Matching Event Emitter
//!
//! `reverb` maps event names to prioritized async listeners. Names can be
//! literal, path-like patterns (`:name`, `*`, `**`) or raw regular
//! expressions, and a [`Router`] layers the `"METHOD path"` convention on
//! top with a shared [`Request`] and [`Response`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reverb::prelude::*;
//!
//! let emitter = ExpressEmitter::<u32>::new();
//! emitter.on("user/:id", |event: Event<u32>| async move {
//!     println!("user {} got {}", event.param("id").unwrap_or("?"), event.args());
//! }, 0)?;
//!
//! assert_eq!(emitter.emit("user/42", 7).await?, Status::Ok);
//! ```
//!
//! ## Routing
//!
//! ```rust,ignore
//! let router = Router::new();
//! router.route("GET", "/increment/:i", |req: Request, res: Response, _: Router| async move {
//!     let i: i64 = req.data("i").and_then(|v| v.as_str()?.parse().ok()).unwrap_or(0);
//!     res.set_results(json!({ "i": i + 1 }));
//! }, 0)?;
//!
//! let response = router.resolve("GET /increment/1", Request::new()).await?;
//! assert_eq!(response.results, Some(json!({ "i": 2 })));
//! ```
//!
//! ## Aborting
//!
//! A listener or hook that returns `false` (or [`HookResult::Stop`]) stops
//! the dispatch, which then reports [`Status::Abort`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use reverb_core::{
    // Error types
    BoxError,
    // Hook
    DynHook,
    // Task queue
    DynTask,
    // Event data
    Event,
    EventData,
    EventKey,
    EventMatch,
    Hook,
    HookResult,
    IntoHookResult,
    ItemQueue,
    ListenerId,
    PatternError,
    ReverbError,
    // Status
    Status,
    Task,
    TaskQueue,
    status,
};

// Emitters
pub use reverb_std::emitter::{
    Emitter, EventEmitter, ExpressEmitter, ListenerInfo, Prepare,
};

// Matchers
pub use reverb_std::matcher::{Exact, Express, Matcher};

// Routing
pub use reverb_std::router::{
    ContextRouter, Request, Response, Route, RouteArgs, RouteHandler, Router, StatusResponse,
};

pub use regex::Regex;

/// Standard hook implementations.
pub mod hooks {
    #![allow(clippy::wildcard_imports)]
    pub use reverb_std::hooks::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use reverb_std::testing::*;
}

/// Prelude module - common imports for Reverb.
///
/// # Usage
///
/// ```rust,ignore
/// use reverb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Emitters
        Event,
        EventEmitter,
        ExpressEmitter,
        // Core traits
        Hook,
        HookResult,
        ListenerId,
        PatternError,
        // Routing
        Request,
        Response,
        ReverbError,
        RouteArgs,
        Router,
        Status,
        StatusResponse,
    };
    pub use serde_json::json;
}
