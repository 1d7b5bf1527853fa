//! Router response and its serializable summary.

use reverb_core::status;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const JSON: &str = "application/json";

/// Serializable summary of a [`Response`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Status code, `0` when nothing set one.
    pub code: u16,
    /// Reason phrase.
    pub status: String,
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field errors.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub errors: Map<String, Value>,
    /// Response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    /// Total count of possible results.
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Default)]
struct ResponseState {
    code: u16,
    status: String,
    error: Option<String>,
    errors: Map<String, Value>,
    body: Option<Value>,
    mimetype: Option<String>,
    total: u64,
}

impl ResponseState {
    fn set_status(&mut self, code: u16, message: Option<&str>) {
        self.code = code;
        self.status = message
            .or_else(|| status::reason(code))
            .unwrap_or_default()
            .to_string();
    }
}

/// A response threaded through every route listener.
///
/// Cloning a `Response` yields another handle to the same response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    inner: Arc<RwLock<ResponseState>>,
}

impl Response {
    /// Create an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ResponseState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ResponseState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The status code.
    pub fn code(&self) -> u16 {
        self.read().code
    }

    /// The reason phrase.
    pub fn status(&self) -> String {
        self.read().status.clone()
    }

    /// The error message, if any.
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Field errors.
    pub fn errors(&self) -> Map<String, Value> {
        self.read().errors.clone()
    }

    /// The body, if any.
    pub fn body(&self) -> Option<Value> {
        self.read().body.clone()
    }

    /// The body mimetype, if any.
    pub fn mimetype(&self) -> Option<String> {
        self.read().mimetype.clone()
    }

    /// Total count of possible results.
    pub fn total(&self) -> u64 {
        self.read().total
    }

    /// Set the status code, with `message` or the known reason phrase.
    pub fn set_status(&self, code: u16, message: Option<&str>) -> &Self {
        self.write().set_status(code, message);
        self
    }

    /// Set the body and its mimetype.
    pub fn set_body(&self, mimetype: impl Into<String>, body: Value, code: u16) -> &Self {
        let mut state = self.write();
        state.set_status(code, None);
        state.mimetype = Some(mimetype.into());
        state.body = Some(body);
        drop(state);
        self
    }

    /// Set a single JSON result with `200 OK`.
    pub fn set_results(&self, results: Value) -> &Self {
        self.write().total = 1;
        self.set_body(JSON, results, 200)
    }

    /// Set a page of JSON rows with `200 OK`.
    pub fn set_rows(&self, rows: Vec<Value>, total: u64) -> &Self {
        self.write().total = total;
        self.set_body(JSON, Value::Array(rows), 200)
    }

    /// Set an error message with field errors.
    pub fn set_error(
        &self,
        error: impl Into<String>,
        errors: Map<String, Value>,
        code: u16,
    ) -> &Self {
        let mut state = self.write();
        state.set_status(code, None);
        state.error = Some(error.into());
        state.errors = errors;
        drop(state);
        self
    }

    /// Summarize the response.
    pub fn to_status_response(&self) -> StatusResponse {
        let state = self.read();
        StatusResponse {
            code: state.code,
            status: state.status.clone(),
            error: state.error.clone(),
            errors: state.errors.clone(),
            results: state.body.clone(),
            total: state.total,
        }
    }

    /// Copy the set fields of a summary into this response.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_status_response(&self, response: &StatusResponse) -> &Self {
        let mut state = self.write();
        if response.code != 0 {
            state.code = response.code;
        }
        if !response.status.is_empty() {
            state.status = response.status.clone();
        } else if state.code != 0 {
            state.status = status::reason(state.code)
                .unwrap_or("Unknown Status")
                .to_string();
        }
        if let Some(error) = &response.error {
            state.error = Some(error.clone());
        }
        if !response.errors.is_empty() {
            state.errors.extend(response.errors.clone());
        }
        if let Some(results) = &response.results {
            if results.is_object() || results.is_array() {
                state.mimetype = Some(JSON.to_string());
            }
            state.body = Some(results.clone());
        }
        if response.total != 0 {
            state.total = response.total;
        }
        drop(state);
        self
    }
}
