//! Event emitters.
//!
//! An [`Emitter`] maps event names to prioritized listeners. On `emit`,
//! every key matching the name contributes its listeners to one
//! [`TaskQueue`], which runs them highest priority first.
//!
//! The matching strategy is a type parameter:
//!
//! - [`EventEmitter`] - literal names only ([`Exact`])
//! - [`ExpressEmitter`] - `:name`, `*`, `**` patterns and raw regexes
//!   ([`Express`])

use crate::matcher::{Exact, Express, Matcher};
use regex::Regex;
use reverb_core::{
    BoxError, DynHook, Event, EventKey, EventMatch, Hook, HookResult, ListenerId, PatternError,
    Status, Task, TaskQueue,
};
use std::{
    collections::HashMap,
    fmt, ptr,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Emitter matching literal event names.
pub type EventEmitter<A> = Emitter<A, Exact>;

/// Emitter matching `:name`, `*` and `**` patterns.
pub type ExpressEmitter<A> = Emitter<A, Express>;

/// Step run on every listener's [`Event`] before the `before` hook.
pub type Prepare<A> = Arc<dyn Fn(&Event<A>) + Send + Sync>;

/// A registered listener, as reported by [`Emitter::listeners`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerInfo {
    /// Handle returned at registration.
    pub id: ListenerId,
    /// Registration priority.
    pub priority: i32,
}

struct ListenerRecord<A> {
    id: ListenerId,
    priority: i32,
    hook: Arc<dyn DynHook<A>>,
}

impl<A> Clone for ListenerRecord<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            priority: self.priority,
            hook: self.hook.clone(),
        }
    }
}

struct State<A, M> {
    listeners: HashMap<EventKey, Vec<ListenerRecord<A>>>,
    matcher: M,
    before: Option<Arc<dyn DynHook<A>>>,
    after: Option<Arc<dyn DynHook<A>>>,
    prepare: Option<Prepare<A>>,
}

impl<A, M> State<A, M> {
    fn matches(&self, event: &str) -> HashMap<EventKey, EventMatch>
    where
        M: Matcher,
    {
        let mut found = HashMap::new();
        let literal = EventKey::literal(event);
        if self.listeners.contains_key(&literal) {
            found.insert(literal, EventMatch::literal(event));
        }
        for matched in self.matcher.find(event) {
            if self.listeners.contains_key(&matched.key) {
                found.insert(matched.key.clone(), matched);
            }
        }
        found
    }

    /// The key `name` is stored under: its compiled key, or the pattern
    /// key whose source is `name` for raw and route expressions.
    fn key_for(&self, name: &str) -> EventKey
    where
        M: Matcher,
    {
        let key = self.matcher.key_of(name);
        if self.listeners.contains_key(&key) {
            return key;
        }
        let source = EventKey::pattern(name);
        if self.listeners.contains_key(&source) {
            return source;
        }
        key
    }

    fn remove_from(&mut self, key: &EventKey, id: ListenerId) -> bool
    where
        M: Matcher,
    {
        let Some(records) = self.listeners.get_mut(key) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        if records.is_empty() {
            self.drop_key(key);
        }
        removed
    }

    fn drop_key(&mut self, key: &EventKey) -> bool
    where
        M: Matcher,
    {
        self.matcher.forget(key);
        self.listeners.remove(key).is_some()
    }
}

/// One listener bound to one match, queued by [`Emitter::tasks`].
struct ListenerTask<A> {
    matched: Arc<EventMatch>,
    id: ListenerId,
    priority: i32,
    hook: Arc<dyn DynHook<A>>,
    before: Option<Arc<dyn DynHook<A>>>,
    after: Option<Arc<dyn DynHook<A>>>,
    prepare: Option<Prepare<A>>,
}

impl<A: Clone + Send + Sync + 'static> Task<A> for ListenerTask<A> {
    async fn call(&self, args: &A) -> Result<HookResult, BoxError> {
        let event = Event::new(self.matched.clone(), self.id, self.priority, args.clone());

        if let Some(prepare) = &self.prepare {
            prepare(&event);
        }
        if let Some(before) = &self.before {
            if before.on_event_dyn(&event).await? == HookResult::Stop {
                return Ok(HookResult::Stop);
            }
        }
        if self.hook.on_event_dyn(&event).await? == HookResult::Stop {
            return Ok(HookResult::Stop);
        }
        if let Some(after) = &self.after {
            if after.on_event_dyn(&event).await? == HookResult::Stop {
                return Ok(HookResult::Stop);
            }
        }
        Ok(HookResult::Next)
    }
}

/// Maps event names to prioritized listeners.
///
/// All methods take `&self`; registration state sits behind a lock that is
/// released before any listener runs, so listeners may register, remove or
/// emit on the same emitter.
pub struct Emitter<A, M = Exact> {
    state: RwLock<State<A, M>>,
}

impl<A, M: Default> Default for Emitter<A, M> {
    fn default() -> Self {
        Self::with_matcher(M::default())
    }
}

impl<A, M> fmt::Debug for Emitter<A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Emitter")
            .field("keys", &state.listeners.len())
            .field("before", &state.before.is_some())
            .field("after", &state.after.is_some())
            .finish()
    }
}

impl<A, M> Emitter<A, M> {
    /// Create an emitter using the given matching strategy.
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            state: RwLock::new(State {
                listeners: HashMap::new(),
                matcher,
                before: None,
                after: None,
                prepare: None,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State<A, M>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<A, M>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A, M: Default> Emitter<A, M> {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A, M> Emitter<A, M>
where
    A: Clone + Send + Sync + 'static,
    M: Matcher,
{
    /// Set a step run on every listener's event before the `before` hook.
    pub fn with_prepare(self, prepare: impl Fn(&Event<A>) + Send + Sync + 'static) -> Self {
        self.write().prepare = Some(Arc::new(prepare));
        self
    }

    /// Listen to `name`, returning a handle for later removal.
    ///
    /// Higher priorities run first; equal priorities run in registration
    /// order.
    pub fn on(
        &self,
        name: &str,
        hook: impl Hook<A>,
        priority: i32,
    ) -> Result<ListenerId, PatternError> {
        let mut state = self.write();
        let key = state.matcher.compile(name)?;
        Ok(Self::insert(&mut state, key, Arc::new(hook), priority))
    }

    fn insert(
        state: &mut State<A, M>,
        key: EventKey,
        hook: Arc<dyn DynHook<A>>,
        priority: i32,
    ) -> ListenerId {
        let id = ListenerId::next();
        tracing::debug!(key = %key, listener = %id, priority, "listener added");
        state
            .listeners
            .entry(key)
            .or_default()
            .push(ListenerRecord { id, priority, hook });
        id
    }

    /// Stop the listener `id` from listening to `name`.
    ///
    /// `name` is either what was registered with [`on`](Self::on) or the
    /// source of a stored expression. Returns false if `id` was not
    /// listening to it.
    pub fn unbind(&self, name: &str, id: ListenerId) -> bool {
        let key = self.read().key_for(name);
        self.unbind_key(&key, id)
    }

    /// Stop the listener `id` from listening to `key`.
    pub fn unbind_key(&self, key: &EventKey, id: ListenerId) -> bool {
        let removed = self.write().remove_from(key, id);
        if removed {
            tracing::debug!(key = %key, listener = %id, "listener removed");
        }
        removed
    }

    /// Remove the listener `id` from every key.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut state = self.write();
        let keys: Vec<EventKey> = state
            .listeners
            .iter()
            .filter(|(_, records)| records.iter().any(|r| r.id == id))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            state.remove_from(key, id);
        }
        !keys.is_empty()
    }

    /// Remove every listener of `name`.
    pub fn clear(&self, name: &str) -> bool {
        let key = self.read().key_for(name);
        self.clear_key(&key)
    }

    /// Remove every listener stored under `key`.
    pub fn clear_key(&self, key: &EventKey) -> bool {
        let cleared = self.write().drop_key(key);
        if cleared {
            tracing::debug!(key = %key, "event cleared");
        }
        cleared
    }

    /// Set the hook run before every listener.
    pub fn before(&self, hook: impl Hook<A>) -> &Self {
        self.write().before = Some(Arc::new(hook));
        self
    }

    /// Set the hook run after every listener.
    pub fn after(&self, hook: impl Hook<A>) -> &Self {
        self.write().after = Some(Arc::new(hook));
        self
    }

    /// Every registry key matching `event`, with its captures.
    pub fn matches(&self, event: &str) -> HashMap<EventKey, EventMatch> {
        self.read().matches(event)
    }

    /// A queue holding one task per listener matching `event`.
    pub fn tasks(&self, event: &str) -> TaskQueue<A> {
        let state = self.read();
        let mut bound: Vec<(Arc<EventMatch>, &ListenerRecord<A>)> = Vec::new();
        for (key, matched) in state.matches(event) {
            let matched = Arc::new(matched);
            if let Some(records) = state.listeners.get(&key) {
                bound.extend(records.iter().map(|r| (matched.clone(), r)));
            }
        }
        bound.sort_by_key(|(_, r)| r.id);

        let mut queue = TaskQueue::new();
        for (matched, record) in bound {
            let task = ListenerTask {
                matched,
                id: record.id,
                priority: record.priority,
                hook: record.hook.clone(),
                before: state.before.clone(),
                after: state.after.clone(),
                prepare: state.prepare.clone(),
            };
            queue.add(task, record.priority);
        }
        queue
    }

    /// Run every listener matching `event` with `args`.
    ///
    /// Returns [`Status::NotFound`] when nothing matches, without running
    /// any hook. Listener errors are returned unchanged.
    pub async fn emit(&self, event: &str, args: A) -> Result<Status, BoxError> {
        let mut queue = self.tasks(event);
        if queue.is_empty() {
            tracing::debug!(event, "no listeners");
            return Ok(Status::NotFound);
        }

        let listeners = queue.len();
        let status = queue.run(args).await?;
        tracing::debug!(event, listeners, status = %status, "event emitted");
        Ok(status)
    }

    /// Copy every listener and compiled pattern of `other` into this emitter.
    ///
    /// The copy is one-time: later registrations on either side are not
    /// shared. Hooks and the prepare step of `other` are not copied.
    pub fn merge(&self, other: &Self) -> &Self {
        if ptr::eq(self, other) {
            return self;
        }
        let (listeners, matcher) = {
            let other = other.read();
            (other.listeners.clone(), other.matcher.clone())
        };

        let mut state = self.write();
        state.matcher.merge(&matcher);
        let mut copied = 0usize;
        for (key, records) in listeners {
            let existing = state.listeners.entry(key).or_default();
            for record in records {
                if existing.iter().all(|r| r.id != record.id) {
                    existing.push(record);
                    copied += 1;
                }
            }
        }
        tracing::debug!(copied, "emitter merged");
        self
    }

    /// Listeners stored under the key `name` registers under.
    pub fn listeners(&self, name: &str) -> Vec<ListenerInfo> {
        let state = self.read();
        let key = state.key_for(name);
        state
            .listeners
            .get(&key)
            .map(|records| {
                records
                    .iter()
                    .map(|r| ListenerInfo {
                        id: r.id,
                        priority: r.priority,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Registry keys, sorted.
    pub fn keys(&self) -> Vec<EventKey> {
        let mut keys: Vec<EventKey> = self.read().listeners.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns true if any listener is stored under `key`.
    pub fn contains_key(&self, key: &EventKey) -> bool {
        self.read().listeners.contains_key(key)
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        self.read().listeners.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.read().listeners.is_empty()
    }
}

impl<A> Emitter<A, Express> {
    /// Create an emitter splitting pattern segments on `separator`.
    pub fn with_separator(separator: char) -> Self {
        Self::with_matcher(Express::new(separator))
    }

    /// The pattern segment separator.
    pub fn separator(&self) -> char {
        self.read().matcher.separator()
    }
}

impl<A: Clone + Send + Sync + 'static> Emitter<A, Express> {
    /// Listen to every event `regex` matches.
    ///
    /// Captures are handed to listeners positionally.
    pub fn on_regex(&self, regex: Regex, hook: impl Hook<A>, priority: i32) -> ListenerId {
        let mut state = self.write();
        let key = state.matcher.insert_regex(regex);
        Self::insert(&mut state, key, Arc::new(hook), priority)
    }

    /// Listen to a ready regular expression whose captures are named after
    /// the tokens of `pattern`.
    pub fn on_expression(
        &self,
        expression: &str,
        pattern: &str,
        hook: impl Hook<A>,
        priority: i32,
    ) -> Result<ListenerId, PatternError> {
        let mut state = self.write();
        let key = state.matcher.insert(expression, pattern)?;
        Ok(Self::insert(&mut state, key, Arc::new(hook), priority))
    }

    /// Convert a pattern into a regular expression fragment.
    pub fn fragment(&self, pattern: &str) -> String {
        self.read().matcher.fragment(pattern)
    }
}
