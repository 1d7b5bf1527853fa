//! Error types for Reverb.
//!
//! This module provides a small error hierarchy using `thiserror`:
//!
//! - [`ReverbError`] - Top-level error type for resolve-style operations
//! - [`PatternError`] - Errors raised while compiling event patterns
//!
//! Listener and hook failures are carried as a plain [`BoxError`] so they
//! reach the caller of `emit` unchanged.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for Reverb operations.
#[derive(Error, Debug)]
pub enum ReverbError {
    /// An event pattern could not be compiled.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// A listener or hook failed while an event was dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[source] BoxError),
}

/// Errors that can occur while compiling event patterns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The regular expression built from a pattern is not valid.
    #[error("invalid expression `{expression}`: {reason}")]
    InvalidExpression {
        /// The expression handed to the regex compiler.
        expression: String,
        /// The compiler's explanation.
        reason: String,
    },
}

impl From<BoxError> for ReverbError {
    fn from(err: BoxError) -> Self {
        ReverbError::Dispatch(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_display() {
        let err = PatternError::InvalidExpression {
            expression: "^(foo$".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid expression `^(foo$`: unclosed group"
        );
    }

    #[test]
    fn test_reverb_error_from_box() {
        let boxed: BoxError = "listener failed".into();
        let err = ReverbError::from(boxed);
        assert!(matches!(err, ReverbError::Dispatch(_)));
        assert_eq!(err.to_string(), "dispatch error: listener failed");
    }
}
