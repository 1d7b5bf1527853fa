//! Router request.

use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[derive(Debug)]
struct RequestState {
    method: String,
    url: String,
    headers: HashMap<String, String>,
    data: Map<String, Value>,
    body: Option<Value>,
    mimetype: String,
}

impl Default for RequestState {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: "/".to_string(),
            headers: HashMap::new(),
            data: Map::new(),
            body: None,
            mimetype: "text/plain".to_string(),
        }
    }
}

/// A request threaded through every route listener.
///
/// Cloning a `Request` yields another handle to the same request, so data
/// written by one listener is seen by the next.
#[derive(Debug, Clone, Default)]
pub struct Request {
    inner: Arc<RwLock<RequestState>>,
}

impl Request {
    /// Create a `GET /` request with no data.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RequestState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RequestState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the method.
    pub fn with_method(self, method: impl Into<String>) -> Self {
        self.write().method = method.into();
        self
    }

    /// Set the url.
    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.write().url = url.into();
        self
    }

    /// Add a header.
    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.write()
            .headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the body and its mimetype.
    pub fn with_body(self, mimetype: impl Into<String>, body: Value) -> Self {
        {
            let mut state = self.write();
            state.mimetype = mimetype.into();
            state.body = Some(body);
        }
        self
    }

    /// Merge an object into the data store.
    pub fn with_data(self, data: Value) -> Self {
        self.merge_data(data);
        self
    }

    /// The request method.
    pub fn method(&self) -> String {
        self.read().method.clone()
    }

    /// The request url.
    pub fn url(&self) -> String {
        self.read().url.clone()
    }

    /// A header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<String> {
        self.read().headers.get(&name.to_ascii_lowercase()).cloned()
    }

    /// The body, if any.
    pub fn body(&self) -> Option<Value> {
        self.read().body.clone()
    }

    /// The body mimetype.
    pub fn mimetype(&self) -> String {
        self.read().mimetype.clone()
    }

    /// A top-level data value.
    pub fn data(&self, key: &str) -> Option<Value> {
        self.read().data.get(key).cloned()
    }

    /// A nested data value addressed by a dotted path such as `user.name`.
    ///
    /// Numeric segments index into arrays.
    pub fn data_path(&self, path: &str) -> Option<Value> {
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        let state = self.read();
        let value = state.data.get(head)?;
        if rest.is_empty() {
            return Some(value.clone());
        }
        let pointer = format!(
            "/{}",
            rest.replace('~', "~0").replace('/', "~1").replace('.', "/")
        );
        value.pointer(&pointer).cloned()
    }

    /// A copy of the whole data store.
    pub fn data_map(&self) -> Map<String, Value> {
        self.read().data.clone()
    }

    /// Set a top-level data value.
    pub fn set_data(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.write().data.insert(key.into(), value.into());
    }

    /// Merge an object into the data store, key by key.
    ///
    /// Non-object values are ignored.
    pub fn merge_data(&self, data: Value) {
        if let Value::Object(map) = data {
            self.write().data.extend(map);
        }
    }
}

impl From<Value> for Request {
    fn from(data: Value) -> Self {
        Request::new().with_data(data)
    }
}

impl From<Map<String, Value>> for Request {
    fn from(data: Map<String, Value>) -> Self {
        Request::new().with_data(Value::Object(data))
    }
}
