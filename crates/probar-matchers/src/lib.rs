//! Probar Matchers: declarative DOM assertions
//!
//! A catalogue of named predicates over a selection of DOM elements
//! (existence, attributes, properties, text, form state, visibility, CSS,
//! containment) with uniform positive and negated forms.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   build    ┌─────────────┐  compare /   ┌──────────────┐
//! │ Registry     │──────────► │ DomMatcher  │─────────────►│ MatchOutcome │
//! │ ("toHaveX")  │            │ (check)     │  negative_   │ pass+message │
//! └──────────────┘            └──────┬──────┘  compare     └──────────────┘
//!                                    │ DomQuery
//!                             ┌──────▼──────┐
//!                             │ Selection   │ (scraper-backed HtmlDocument)
//!                             └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use probar_matchers::prelude::*;
//!
//! let doc = HtmlDocument::parse("<p class='lead'>Hello world</p>");
//! let p = doc.select("p");
//! assert!(to_have_text("world").compare(&p).pass);
//! assert!(to_be_hidden().negative_compare(&p).pass);
//! expect(&p).to(&to_have_class("lead"))?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod compare;
mod expect;
mod expected;
/// HTML-backed selections (scraper)
pub mod html;
mod matchers;
mod query;
mod registry;
mod result;
mod suite;

pub use compare::{not_word, passes, MatchOutcome, Matcher};
pub use expect::{
    expect, AssertionMode, Expect, ExpectationFailure, ExpectationSummary, SoftExpectations,
};
pub use expected::{camel_to_kebab, CssExpectation, TextExpectation, UNDEFINED};
pub use html::{HtmlDocument, Selection};
pub use matchers::{
    compare_css, to_be_checked, to_be_disabled, to_be_empty, to_be_focused, to_be_hidden,
    to_be_in_dom, to_be_matched_by, to_be_selected, to_be_visible, to_exist, to_have_attr,
    to_have_class, to_have_css, to_have_data, to_have_descendant, to_have_descendant_with_text,
    to_have_id, to_have_length, to_have_prop, to_have_tag, to_have_text, to_have_value,
    CssComparison, DomMatcher,
};
pub use query::{DomQuery, ElementState};
pub use registry::{text_arg, MatcherFactory, MatcherRegistry};
pub use result::{MatcherError, MatcherResult};
pub use suite::{evaluate, ExpectationResult, ExpectationSpec, Suite, SuiteReport};

/// Everything needed to write matcher assertions
pub mod prelude {
    pub use crate::compare::{MatchOutcome, Matcher};
    pub use crate::expect::{expect, SoftExpectations};
    pub use crate::html::{HtmlDocument, Selection};
    pub use crate::matchers::*;
    pub use crate::query::{DomQuery, ElementState};
    pub use crate::registry::MatcherRegistry;
    pub use crate::result::{MatcherError, MatcherResult};
}
