//! Event-driven router.
//!
//! A [`ContextRouter`] is an [`ExpressEmitter`] whose events follow the
//! `"METHOD path"` convention and whose listeners receive a shared
//! [`Request`], [`Response`] and a context. [`Router`] passes itself as
//! that context.
//!
//! ```rust,ignore
//! let router = Router::new();
//! router.route("GET", "/users/:id", |req: Request, res: Response, _: Router| async move {
//!     res.set_results(json!({ "id": req.data("id") }));
//! }, 0)?;
//!
//! let response = router.resolve("GET /users/42", Request::new()).await?;
//! ```

mod request;
mod response;

pub use request::Request;
pub use response::{Response, StatusResponse};

use crate::emitter::ExpressEmitter;
use reverb_core::{
    BoxError, Event, EventKey, Hook, HookResult, IntoHookResult, ListenerId, PatternError,
    ReverbError, Status,
};
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    ops::Deref,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Arguments every route listener receives.
///
/// `context` is the third handler argument: the [`Router`] itself, or
/// whatever richer context a [`ContextRouter`] is dispatched with.
#[derive(Debug, Clone)]
pub struct RouteArgs<C = Router> {
    /// The request being routed.
    pub request: Request,
    /// The response being built.
    pub response: Response,
    /// The context the request is dispatched in.
    pub context: C,
}

/// A `(method, path)` pair registered with [`ContextRouter::route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Uppercased method, `*` or `ANY` for every method.
    pub method: String,
    /// Path pattern.
    pub path: String,
}

/// An async route listener.
///
/// Implemented for every `Fn(Request, Response, C) -> impl Future`
/// closure whose output implements [`IntoHookResult`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a route handler over `{C}`",
    label = "missing `RouteHandler` implementation",
    note = "Route handlers are closures of the form `Fn(Request, Response, {C}) -> impl Future`."
)]
pub trait RouteHandler<C>: Send + Sync + 'static {
    /// Handle a routed request.
    fn handle(
        &self,
        request: Request,
        response: Response,
        context: C,
    ) -> impl Future<Output = Result<HookResult, BoxError>> + Send;
}

impl<C, F, Fut> RouteHandler<C> for F
where
    F: Fn(Request, Response, C) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoHookResult,
{
    fn handle(
        &self,
        request: Request,
        response: Response,
        context: C,
    ) -> impl Future<Output = Result<HookResult, BoxError>> + Send {
        let fut = (self)(request, response, context);
        async move { fut.await.into_hook_result() }
    }
}

struct RouteTask<H>(H);

impl<C, H> Hook<RouteArgs<C>> for RouteTask<H>
where
    C: Clone + Send + Sync + 'static,
    H: RouteHandler<C>,
{
    async fn on_event(&self, event: &Event<RouteArgs<C>>) -> Result<HookResult, BoxError> {
        let RouteArgs {
            request,
            response,
            context,
        } = event.args().clone();
        self.0.handle(request, response, context).await
    }
}

/// Writes captured params, then positional captures under `"0"`, `"1"`, …
/// into the request data.
fn inject_captures<C>(event: &Event<RouteArgs<C>>) {
    let request = &event.args().request;
    for (name, value) in event.params() {
        request.set_data(name.clone(), Value::String(value.clone()));
    }
    for (i, value) in event.captures().iter().enumerate() {
        request.set_data(i.to_string(), Value::String(value.clone()));
    }
}

enum RouteKey {
    Literal(String),
    Expression { expression: String, pattern: String },
}

impl RouteKey {
    fn key(&self) -> EventKey {
        match self {
            RouteKey::Literal(event) => EventKey::literal(event.as_str()),
            RouteKey::Expression { expression, .. } => EventKey::pattern(expression.as_str()),
        }
    }
}

fn is_any(method: &str) -> bool {
    method == "*" || method.eq_ignore_ascii_case("any")
}

struct RouterInner<C> {
    emitter: ExpressEmitter<RouteArgs<C>>,
    routes: RwLock<HashMap<EventKey, Route>>,
}

/// Routes `"METHOD path"` events to listeners receiving a context `C`.
///
/// The context is supplied per dispatch. Wrap a `ContextRouter<Self>` to
/// hand listeners a richer handle than [`Router`]:
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct Console {
///     router: ContextRouter<Console>,
///     brand: String,
/// }
///
/// impl Console {
///     async fn run(&self, command: &str) -> Result<StatusResponse, ReverbError> {
///         self.router
///             .resolve_in(command, Request::new(), Response::new(), self.clone())
///             .await
///     }
/// }
/// ```
///
/// `ContextRouter` is a cheap handle: clones share the same routes and
/// listeners.
pub struct ContextRouter<C> {
    inner: Arc<RouterInner<C>>,
}

impl<C> Clone for ContextRouter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Clone + Send + Sync + 'static> Default for ContextRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ContextRouter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes = self
            .inner
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Router")
            .field("routes", &routes)
            .field("emitter", &self.inner.emitter)
            .finish()
    }
}

impl<C: Clone + Send + Sync + 'static> ContextRouter<C> {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RouterInner {
                emitter: ExpressEmitter::new().with_prepare(inject_captures::<C>),
                routes: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// The underlying emitter, for introspection.
    pub fn emitter(&self) -> &ExpressEmitter<RouteArgs<C>> {
        &self.inner.emitter
    }

    fn route_key(&self, method: &str, path: &str) -> RouteKey {
        let fragment = self.inner.emitter.fragment(path);
        let tail = regex::escape(&self.inner.emitter.separator().to_string());

        if is_any(method) {
            let pattern = if fragment != path { path } else { "" };
            return RouteKey::Expression {
                expression: format!("^[A-Z]+ {fragment}{tail}*$"),
                pattern: pattern.to_string(),
            };
        }

        let method = method.to_uppercase();
        let event = format!("{method} {path}");
        if fragment == path {
            return RouteKey::Literal(event);
        }
        RouteKey::Expression {
            expression: format!("^{method} {fragment}{tail}*$"),
            pattern: event,
        }
    }

    fn routes_mut(&self) -> RwLockWriteGuard<'_, HashMap<EventKey, Route>> {
        self.inner
            .routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn routes_ref(&self) -> RwLockReadGuard<'_, HashMap<EventKey, Route>> {
        self.inner
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Listen to `method` requests for `path`.
    ///
    /// `*` or `ANY` listens to every method. Paths without tokens register
    /// the literal event `"METHOD path"`.
    pub fn route(
        &self,
        method: &str,
        path: &str,
        handler: impl RouteHandler<C>,
        priority: i32,
    ) -> Result<ListenerId, PatternError> {
        let route_key = self.route_key(method, path);
        let key = route_key.key();
        let hook = RouteTask(handler);
        let id = match &route_key {
            RouteKey::Literal(event) => self.inner.emitter.on(event, hook, priority)?,
            RouteKey::Expression {
                expression,
                pattern,
            } => self
                .inner
                .emitter
                .on_expression(expression, pattern, hook, priority)?,
        };

        let method = if is_any(method) {
            method.to_string()
        } else {
            method.to_uppercase()
        };
        tracing::debug!(method = %method, path, key = %key, "route added");
        self.routes_mut().insert(
            key,
            Route {
                method,
                path: path.to_string(),
            },
        );
        Ok(id)
    }

    /// Listen to an event name or pattern.
    pub fn on(
        &self,
        name: &str,
        handler: impl RouteHandler<C>,
        priority: i32,
    ) -> Result<ListenerId, PatternError> {
        self.inner.emitter.on(name, RouteTask(handler), priority)
    }

    /// Stop the listener `id` from handling `method` requests for `path`.
    ///
    /// The route is forgotten once its last listener is gone.
    pub fn unbind(&self, method: &str, path: &str, id: ListenerId) -> bool {
        let key = self.route_key(method, path).key();
        let removed = self.inner.emitter.unbind_key(&key, id);
        if removed && !self.inner.emitter.contains_key(&key) {
            self.routes_mut().remove(&key);
        }
        removed
    }

    /// Remove a route and all of its listeners.
    pub fn clear_route(&self, method: &str, path: &str) -> bool {
        let key = self.route_key(method, path).key();
        self.routes_mut().remove(&key);
        self.inner.emitter.clear_key(&key)
    }

    /// Set the hook run before every listener.
    pub fn before(&self, hook: impl Hook<RouteArgs<C>>) -> &Self {
        self.inner.emitter.before(hook);
        self
    }

    /// Set the hook run after every listener.
    pub fn after(&self, hook: impl Hook<RouteArgs<C>>) -> &Self {
        self.inner.emitter.after(hook);
        self
    }

    /// Run every listener matching `event` in `context`.
    pub async fn emit_in(
        &self,
        event: &str,
        request: Request,
        response: Response,
        context: C,
    ) -> Result<Status, BoxError> {
        let args = RouteArgs {
            request,
            response,
            context,
        };
        self.inner.emitter.emit(event, args).await
    }

    /// Emit `event` in `context` and summarize the response.
    pub async fn resolve_in(
        &self,
        event: &str,
        request: Request,
        response: Response,
        context: C,
    ) -> Result<StatusResponse, ReverbError> {
        let status = self
            .emit_in(event, request, response.clone(), context)
            .await?;
        tracing::debug!(event, status = %status, code = response.code(), "resolved");
        Ok(response.to_status_response())
    }

    /// Copy the routes and listeners of `other` into this router.
    pub fn merge(&self, other: &ContextRouter<C>) -> &Self {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return self;
        }
        let routes = other.routes_ref().clone();
        self.routes_mut().extend(routes);
        self.inner.emitter.merge(&other.inner.emitter);
        self
    }

    /// Registered routes, sorted by key.
    pub fn routes(&self) -> Vec<(EventKey, Route)> {
        let mut routes: Vec<(EventKey, Route)> = self
            .routes_ref()
            .iter()
            .map(|(key, route)| (key.clone(), route.clone()))
            .collect();
        routes.sort_by(|a, b| a.0.cmp(&b.0));
        routes
    }

    /// The route registered under `key`.
    pub fn route_for(&self, key: &EventKey) -> Option<Route> {
        self.routes_ref().get(key).cloned()
    }
}

/// A router whose listeners receive the router itself as context.
///
/// Registration and introspection are those of [`ContextRouter`], reached
/// through `Deref`.
#[derive(Debug, Clone, Default)]
pub struct Router(ContextRouter<Router>);

impl Deref for Router {
    type Target = ContextRouter<Router>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every listener matching `event` with the request and response.
    pub async fn emit(
        &self,
        event: &str,
        request: Request,
        response: Response,
    ) -> Result<Status, BoxError> {
        self.0.emit_in(event, request, response, self.clone()).await
    }

    /// Emit `event` with a fresh response and summarize it.
    pub async fn resolve(
        &self,
        event: &str,
        request: impl Into<Request>,
    ) -> Result<StatusResponse, ReverbError> {
        self.resolve_with(event, request.into(), Response::new())
            .await
    }

    /// Emit the `"METHOD path"` event with a fresh response and summarize it.
    pub async fn resolve_route(
        &self,
        method: &str,
        path: &str,
        request: impl Into<Request>,
    ) -> Result<StatusResponse, ReverbError> {
        let event = format!("{} {path}", method.to_uppercase());
        self.resolve(&event, request).await
    }

    /// Emit `event` with the given response and summarize it.
    pub async fn resolve_with(
        &self,
        event: &str,
        request: Request,
        response: Response,
    ) -> Result<StatusResponse, ReverbError> {
        self.0
            .resolve_in(event, request, response, self.clone())
            .await
    }

    /// Copy the routes and listeners of `other` into this router.
    pub fn merge(&self, other: &Router) -> &Self {
        self.0.merge(&other.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_keys() {
        let router = Router::new();
        let noop = |_: Request, _: Response, _: Router| async {};

        router.route("get", "/about", noop, 0).unwrap();
        router.route("GET", "/users/:id", noop, 0).unwrap();
        router.route("any", "/health", noop, 0).unwrap();

        let keys: Vec<EventKey> = router.routes().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&EventKey::literal("GET /about")));
        assert!(keys.contains(&EventKey::pattern("^GET /users/([^/]+)/*$")));
        assert!(keys.contains(&EventKey::pattern("^[A-Z]+ /health/*$")));

        let route = router
            .route_for(&EventKey::pattern("^GET /users/([^/]+)/*$"))
            .unwrap();
        assert_eq!(route.method, "GET");
        assert_eq!(route.path, "/users/:id");
    }

    #[tokio::test]
    async fn test_params_reach_request_data() {
        let router = Router::new();
        router
            .route(
                "GET",
                "/users/:id/**",
                |req: Request, res: Response, _: Router| async move {
                    res.set_results(json!({
                        "id": req.data("id"),
                        "first": req.data("0"),
                        "second": req.data("1"),
                    }));
                },
                0,
            )
            .unwrap();

        let response = router
            .resolve("GET /users/42/a/b", Request::new())
            .await
            .unwrap();
        assert_eq!(
            response.results,
            Some(json!({ "id": "42", "first": "a", "second": "b" }))
        );
    }

    #[tokio::test]
    async fn test_trailing_separator_matches() {
        let router = Router::new();
        router
            .route(
                "POST",
                "/items/:id",
                |_: Request, res: Response, _: Router| async move {
                    res.set_status(201, None);
                },
                0,
            )
            .unwrap();

        let response = router
            .resolve("POST /items/9/", Request::new())
            .await
            .unwrap();
        assert_eq!(response.code, 201);
        assert_eq!(response.status, "Created");
    }

    #[tokio::test]
    async fn test_unmatched_resolve_is_untouched() {
        let router = Router::new();
        let response = router
            .resolve_route("get", "/missing", json!({}))
            .await
            .unwrap();
        assert_eq!(response, StatusResponse::default());
    }

    #[tokio::test]
    async fn test_unbind_route_listener() {
        let router = Router::new();
        let noop = |_: Request, _: Response, _: Router| async {};
        let first = router.route("GET", "/users/:id", noop, 0).unwrap();
        let second = router.route("get", "/users/:id", noop, 0).unwrap();
        let key = EventKey::pattern("^GET /users/([^/]+)/*$");

        assert!(router.unbind("GET", "/users/:id", first));
        assert!(!router.unbind("GET", "/users/:id", first));
        assert!(!router.unbind("POST", "/users/:id", second));
        assert!(router.route_for(&key).is_some());

        assert!(router.unbind("get", "/users/:id", second));
        assert!(router.routes().is_empty());
        let status = router
            .emit("GET /users/1", Request::new(), Response::new())
            .await
            .unwrap();
        assert_eq!(status, Status::NotFound);
    }

    #[tokio::test]
    async fn test_unbind_route_by_expression_source() {
        let router = Router::new();
        let noop = |_: Request, _: Response, _: Router| async {};
        let id = router.route("ANY", "/health", noop, 0).unwrap();

        assert!(router.emitter().unbind("^[A-Z]+ /health/*$", id));
        assert!(router.emitter().is_empty());
    }

    #[derive(Clone)]
    struct Session {
        router: ContextRouter<Session>,
        user: &'static str,
    }

    #[tokio::test]
    async fn test_custom_context_reaches_handler() {
        let session = Session {
            router: ContextRouter::new(),
            user: "ada",
        };
        session
            .router
            .route(
                "GET",
                "/whoami",
                |_: Request, res: Response, session: Session| async move {
                    res.set_results(json!({ "user": session.user }));
                },
                0,
            )
            .unwrap();

        let response = session
            .router
            .resolve_in(
                "GET /whoami",
                Request::new(),
                Response::new(),
                session.clone(),
            )
            .await
            .unwrap();
        assert_eq!(response.results, Some(json!({ "user": "ada" })));
    }

    #[tokio::test]
    async fn test_clear_route() {
        let router = Router::new();
        router
            .route("GET", "/a/:id", |_: Request, _: Response, _: Router| async {}, 0)
            .unwrap();

        assert!(router.clear_route("get", "/a/:id"));
        assert!(router.routes().is_empty());
        assert!(router.emitter().is_empty());
        let status = router
            .emit("GET /a/1", Request::new(), Response::new())
            .await
            .unwrap();
        assert_eq!(status, Status::NotFound);
    }
}
