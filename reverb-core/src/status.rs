//! Dispatch status codes.
//!
//! Every `run`/`emit` reports one of three outcomes. The numeric codes follow
//! HTTP conventions so a router can surface them unchanged; `Abort` uses the
//! non-standard `309 Aborted`.

use std::fmt;

/// The outcome of running a task queue or emitting an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Every queued task ran without stopping.
    Ok,
    /// Nothing was listening.
    NotFound,
    /// A task or hook returned [`HookResult::Stop`](crate::HookResult::Stop).
    Abort,
}

impl Status {
    /// Numeric code of this status.
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NotFound => 404,
            Status::Abort => 309,
        }
    }

    /// Reason phrase of this status.
    pub const fn message(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NotFound => "Not Found",
            Status::Abort => "Aborted",
        }
    }

    /// Returns true for [`Status::Ok`].
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

/// Reason phrase for a status code, if it is a known one.
pub fn reason(code: u16) -> Option<&'static str> {
    let phrase = match code {
        100 => "Continue",
        102 => "Processing",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        309 => "Aborted",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    };
    Some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::Abort.code(), 309);
        assert_eq!(Status::Abort.to_string(), "309 Aborted");
    }

    #[test]
    fn test_reason_lookup() {
        assert_eq!(reason(Status::Abort.code()), Some("Aborted"));
        assert_eq!(reason(400), Some("Bad Request"));
        assert_eq!(reason(799), None);
    }
}
