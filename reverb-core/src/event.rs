//! Event match data handed to listeners and hooks.
//!
//! When an event name is emitted, every registry key that matches it yields
//! an [`EventMatch`]. Each listener bound to that key then receives an
//! [`Event`]: the match, the listener's own handle and priority, and the
//! arguments given to `emit`.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Opaque handle identifying one registered listener.
///
/// Handles are unique within the process and increase with registration
/// order, which is what equal-priority listeners are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocate the next handle.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw handle value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A key in an emitter's listener registry.
///
/// Literal names and compiled patterns live in separate namespaces, so the
/// literal `"^a$"` never collides with the expression `^a$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKey {
    /// An exact event name.
    Literal(String),
    /// The source of a compiled regular expression.
    Pattern(String),
}

impl EventKey {
    /// Shorthand for [`EventKey::Literal`].
    pub fn literal(name: impl Into<String>) -> Self {
        EventKey::Literal(name.into())
    }

    /// Shorthand for [`EventKey::Pattern`].
    pub fn pattern(source: impl Into<String>) -> Self {
        EventKey::Pattern(source.into())
    }

    /// The literal name or expression source.
    pub fn as_str(&self) -> &str {
        match self {
            EventKey::Literal(name) => name,
            EventKey::Pattern(source) => source,
        }
    }

    /// Returns true for [`EventKey::Pattern`].
    pub fn is_pattern(&self) -> bool {
        matches!(self, EventKey::Pattern(_))
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Literal(name) => f.write_str(name),
            EventKey::Pattern(source) => write!(f, "/{source}/"),
        }
    }
}

/// Values captured from an emitted event name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
    /// Positional captures (`*`, `**` and raw regex groups).
    pub args: Vec<String>,
    /// Named captures (`:name`).
    pub params: HashMap<String, String>,
}

/// The result of matching one registry key against an emitted event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMatch {
    /// The emitted event name.
    pub event: String,
    /// The pattern that matched: the literal name, the registered pattern
    /// string, or the regex source for raw expressions.
    pub pattern: String,
    /// The registry key that matched.
    pub key: EventKey,
    /// Captured values.
    pub data: EventData,
}

impl EventMatch {
    /// An exact match of a literal name.
    pub fn literal(event: impl Into<String>) -> Self {
        let event = event.into();
        Self {
            pattern: event.clone(),
            key: EventKey::Literal(event.clone()),
            event,
            data: EventData::default(),
        }
    }
}

/// What a listener or hook receives when it runs.
#[derive(Debug, Clone)]
pub struct Event<A> {
    matched: Arc<EventMatch>,
    listener: ListenerId,
    priority: i32,
    args: A,
}

impl<A> Event<A> {
    /// Create an event for one listener invocation.
    pub fn new(matched: Arc<EventMatch>, listener: ListenerId, priority: i32, args: A) -> Self {
        Self {
            matched,
            listener,
            priority,
            args,
        }
    }

    /// The emitted event name.
    pub fn name(&self) -> &str {
        &self.matched.event
    }

    /// The pattern that matched.
    pub fn pattern(&self) -> &str {
        &self.matched.pattern
    }

    /// The registry key that matched.
    pub fn key(&self) -> &EventKey {
        &self.matched.key
    }

    /// The full match.
    pub fn matched(&self) -> &EventMatch {
        &self.matched
    }

    /// Captured values.
    pub fn data(&self) -> &EventData {
        &self.matched.data
    }

    /// Positional captures.
    pub fn captures(&self) -> &[String] {
        &self.matched.data.args
    }

    /// A named capture.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.matched.data.params.get(name).map(String::as_str)
    }

    /// All named captures.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.matched.data.params
    }

    /// Handle of the listener being run.
    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    /// Priority of the listener being run.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The arguments given to `emit`.
    pub fn args(&self) -> &A {
        &self.args
    }

    /// Consume the event, keeping the arguments.
    pub fn into_args(self) -> A {
        self.args
    }
}
