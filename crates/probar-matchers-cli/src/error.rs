//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// One or more expectations did not pass
    #[error("{failed} expectation(s) failed")]
    ExpectationsFailed {
        /// Number of failed expectations
        failed: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Matcher library error
    #[error("Matcher error: {0}")]
    Matcher(#[from] probar_matchers::MatcherError),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether this error only signals failed expectations
    #[must_use]
    pub const fn is_expectation_failure(&self) -> bool {
        matches!(self, Self::ExpectationsFailed { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_expectations_failed() {
        let err = CliError::ExpectationsFailed { failed: 2 };
        assert_eq!(err.to_string(), "2 expectation(s) failed");
        assert!(err.is_expectation_failure());
        assert!(!CliError::invalid_argument("x").is_expectation_failure());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }

    #[test]
    fn test_matcher_error_from() {
        let err: CliError = probar_matchers::MatcherError::UnknownMatcher {
            name: "toSparkle".to_string(),
        }
        .into();
        assert!(err.to_string().contains("Unknown matcher 'toSparkle'"));
    }
}
