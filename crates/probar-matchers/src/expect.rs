//! Fluent and soft expectations over matchers.
//!
//! `expect(&selection).to(&matcher)?` turns a failed [`MatchOutcome`] into
//! [`MatcherError::AssertionFailed`]. [`SoftExpectations`] collects failures
//! instead and reports them together from `verify()`.
//!
//! ## Example
//!
//! ```ignore
//! let doc = HtmlDocument::parse("<p class='lead'>Hello</p>");
//! let p = doc.select("p");
//! expect(&p).to(&to_have_class("lead"))?;
//! expect(&p).not_to(&to_be_hidden())?;
//!
//! let mut soft = SoftExpectations::new();
//! soft.check(&p, &to_have_text("Bye"));
//! soft.check(&p, &to_have_tag("div"));
//! assert_eq!(soft.failure_count(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::compare::{MatchOutcome, Matcher};
use crate::query::DomQuery;
use crate::result::{MatcherError, MatcherResult};

/// Assertion builder for a selection
#[derive(Debug, Clone, Copy)]
pub struct Expect<'q, Q> {
    subject: &'q Q,
}

impl<'q, Q: DomQuery> Expect<'q, Q> {
    /// Create an expectation for a selection
    #[must_use]
    pub const fn new(subject: &'q Q) -> Self {
        Self { subject }
    }

    /// Assert the positive form
    pub fn to<M: Matcher<Q>>(&self, matcher: &M) -> MatcherResult<()> {
        into_result(matcher.compare(self.subject))
    }

    /// Assert the negative form
    pub fn not_to<M: Matcher<Q>>(&self, matcher: &M) -> MatcherResult<()> {
        into_result(matcher.negative_compare(self.subject))
    }
}

fn into_result(outcome: MatchOutcome) -> MatcherResult<()> {
    if outcome.pass {
        Ok(())
    } else {
        Err(MatcherError::AssertionFailed {
            message: outcome.message,
        })
    }
}

/// Create an expectation for a selection
#[must_use]
pub const fn expect<Q: DomQuery>(subject: &Q) -> Expect<'_, Q> {
    Expect::new(subject)
}

/// Mode for soft expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssertionMode {
    /// Collect all failures (default)
    #[default]
    Collect,
    /// Ignore further checks after the first failure
    FailFast,
}

/// A recorded expectation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationFailure {
    /// Matcher message
    pub message: String,
    /// Position of the check in the sequence
    pub index: usize,
}

/// Summary of soft expectation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationSummary {
    /// Checks evaluated
    pub total: usize,
    /// Checks that passed
    pub passed: usize,
    /// Checks that failed
    pub failed: usize,
}

/// Collects matcher failures without stopping the test
#[derive(Debug, Default)]
pub struct SoftExpectations {
    failures: Vec<ExpectationFailure>,
    mode: AssertionMode,
    checked: usize,
}

impl SoftExpectations {
    /// Create a collector in `Collect` mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assertion mode
    #[must_use]
    pub const fn mode(mut self, mode: AssertionMode) -> Self {
        self.mode = mode;
        self
    }

    fn halted(&self) -> bool {
        self.mode == AssertionMode::FailFast && !self.failures.is_empty()
    }

    /// Record the positive form; returns the outcome's pass flag
    pub fn check<Q: DomQuery, M: Matcher<Q>>(&mut self, subject: &Q, matcher: &M) -> bool {
        if self.halted() {
            return false;
        }
        self.record(matcher.compare(subject))
    }

    /// Record the negative form; returns the outcome's pass flag
    pub fn check_not<Q: DomQuery, M: Matcher<Q>>(&mut self, subject: &Q, matcher: &M) -> bool {
        if self.halted() {
            return false;
        }
        self.record(matcher.negative_compare(subject))
    }

    fn record(&mut self, outcome: MatchOutcome) -> bool {
        let index = self.checked;
        self.checked += 1;
        if !outcome.pass {
            self.failures.push(ExpectationFailure {
                message: outcome.message,
                index,
            });
        }
        outcome.pass
    }

    /// Recorded failures
    #[must_use]
    pub fn failures(&self) -> &[ExpectationFailure] {
        &self.failures
    }

    /// Number of failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of checks evaluated
    #[must_use]
    pub const fn checked_count(&self) -> usize {
        self.checked
    }

    /// Summary counts
    #[must_use]
    pub fn summary(&self) -> ExpectationSummary {
        ExpectationSummary {
            total: self.checked,
            passed: self.checked - self.failures.len(),
            failed: self.failures.len(),
        }
    }

    /// Fail with every collected message if any check failed
    pub fn verify(&self) -> MatcherResult<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let summary = self
            .failures
            .iter()
            .map(|f| format!("  {}. {}", f.index + 1, f.message))
            .collect::<Vec<_>>()
            .join("\n");
        Err(MatcherError::SoftAssertionsFailed {
            count: self.failures.len(),
            summary,
        })
    }

    /// Forget all checks
    pub fn clear(&mut self) {
        self.failures.clear();
        self.checked = 0;
    }
}
