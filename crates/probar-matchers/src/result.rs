//! Result and error types for probar-matchers.
//!
//! Matching itself never fails: a matcher always produces a
//! [`MatchOutcome`](crate::MatchOutcome). These errors cover building
//! matchers from dynamic arguments, parsing selectors and suites, and the
//! `expect()` layer that turns failed outcomes into `Err`.

use thiserror::Error;

/// Result type for probar-matchers operations
pub type MatcherResult<T> = Result<T, MatcherError>;

/// Errors that can occur in probar-matchers
#[derive(Debug, Error)]
pub enum MatcherError {
    /// No matcher is registered under the requested name
    #[error("Unknown matcher '{name}'")]
    UnknownMatcher {
        /// Requested matcher name
        name: String,
    },

    /// Matcher arguments have the wrong arity or type
    #[error("Invalid arguments for '{matcher}': {message}")]
    InvalidArguments {
        /// Matcher name
        matcher: String,
        /// Error message
        message: String,
    },

    /// CSS selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// Offending selector
        selector: String,
        /// Parser message
        message: String,
    },

    /// Text pattern is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Suite file could not be parsed
    #[error("Failed to parse suite: {message}")]
    SuiteParse {
        /// Error message
        message: String,
    },

    /// Assertion failed (from `expect()`)
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Matcher message
        message: String,
    },

    /// Soft assertions collected one or more failures
    #[error("{count} soft assertion(s) failed:\n{summary}")]
    SoftAssertionsFailed {
        /// Number of failures
        count: usize,
        /// One line per failure
        summary: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MatcherError {
    /// Create an invalid arguments error
    #[must_use]
    pub fn invalid_arguments(matcher: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            matcher: matcher.into(),
            message: message.into(),
        }
    }

    /// Create an invalid selector error
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
