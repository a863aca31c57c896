//! Negation-aware comparison wrapper.
//!
//! Every matcher is a raw predicate `check(negate, element)`. The two entry
//! points a host framework calls, `compare` and `negative_compare`, fix the
//! negate flag, and [`passes`] folds it into the predicate's own result so
//! "not" semantics live in one place.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::query::DomQuery;

/// Result of one matcher invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Whether the (possibly negated) assertion holds
    pub pass: bool,
    /// Human-readable description of the attempted assertion
    pub message: String,
}

impl MatchOutcome {
    /// Create an outcome
    #[must_use]
    pub fn new(pass: bool, message: impl Into<String>) -> Self {
        Self {
            pass,
            message: message.into(),
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.pass { "PASS" } else { "FAIL" };
        write!(f, "[{status}] {}", self.message)
    }
}

/// Fold the negate flag into a predicate result (`actual XOR negate`)
#[must_use]
pub const fn passes(actual: bool, negate: bool) -> bool {
    actual ^ negate
}

/// `" not"` when negated, empty otherwise
#[must_use]
pub const fn not_word(negate: bool) -> &'static str {
    if negate {
        " not"
    } else {
        ""
    }
}

/// A matcher over a [`DomQuery`] selection.
///
/// Implementors provide the raw predicate; `compare` and
/// `negative_compare` are the registration contract.
pub trait Matcher<Q: DomQuery> {
    /// Raw predicate with an explicit negate flag
    fn check(&self, negate: bool, element: &Q) -> MatchOutcome;

    /// Positive form
    fn compare(&self, element: &Q) -> MatchOutcome {
        self.check(false, element)
    }

    /// Negative form
    fn negative_compare(&self, element: &Q) -> MatchOutcome {
        self.check(true, element)
    }
}
