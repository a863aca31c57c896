//! The DOM matchers.
//!
//! Each matcher resolves one fact through [`DomQuery`], compares it to the
//! expected value and reports `{ pass, message }`. Negation is folded in by
//! [`passes`]; no matcher inverts its own result.
//!
//! ```ignore
//! let doc = HtmlDocument::parse(r#"<p class="foo bar">Hello</p>"#);
//! let p = doc.select("p");
//! assert!(to_have_class("foo").compare(&p).pass);
//! assert!(to_have_text("ell").compare(&p).pass);
//! assert!(to_be_hidden().negative_compare(&p).pass);
//! ```

use serde_json::Value;

use crate::compare::{not_word, passes, MatchOutcome, Matcher};
use crate::expected::{show_str, show_value, CssExpectation, TextExpectation};
use crate::query::{DomQuery, ElementState};

/// Every matcher with its bound expected arguments
#[derive(Debug, Clone)]
pub enum DomMatcher {
    /// Selection is non-empty
    Exist,
    /// Selection has exactly this many elements
    Length(usize),
    /// `id` attribute equals
    Id(String),
    /// Some element carries the class
    Class(String),
    /// Tag name equals (case-insensitive)
    Tag(String),
    /// Attribute is defined, or equals `expected`
    Attr {
        /// Attribute name
        name: String,
        /// Expected value; `None` means "must be defined"
        expected: Option<String>,
    },
    /// DOM property is defined, or strictly equals `expected`
    Prop {
        /// Property name
        name: String,
        /// Expected value; `None` means "must be defined"
        expected: Option<Value>,
    },
    /// Trimmed text matches
    Text(TextExpectation),
    /// Dataset value is defined, or strictly equals `expected`
    Data {
        /// Dataset key
        key: String,
        /// Expected value; `None` means "must be defined"
        expected: Option<Value>,
    },
    /// Form value strictly equals
    Value(Value),
    /// Every computed style property matches
    Css(CssExpectation),
    /// Element is in a state
    State(ElementState),
    /// First element is the active element
    Focused,
    /// First element is attached below the document element
    InDom,
    /// Some element matches the selector
    MatchedBy(String),
    /// Some descendant matches the selector
    Descendant(String),
    /// Trimmed text of the matching descendants matches
    DescendantWithText {
        /// Descendant selector
        selector: String,
        /// Expected text
        expected: TextExpectation,
    },
}

impl DomMatcher {
    /// Registry name of the matcher
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exist => "toExist",
            Self::Length(_) => "toHaveLength",
            Self::Id(_) => "toHaveId",
            Self::Class(_) => "toHaveClass",
            Self::Tag(_) => "toHaveTag",
            Self::Attr { .. } => "toHaveAttr",
            Self::Prop { .. } => "toHaveProp",
            Self::Text(_) => "toHaveText",
            Self::Data { .. } => "toHaveData",
            Self::Value(_) => "toHaveValue",
            Self::Css(_) => "toHaveCss",
            Self::State(ElementState::Checked) => "toBeChecked",
            Self::State(ElementState::Disabled) => "toBeDisabled",
            Self::State(ElementState::Empty) => "toBeEmpty",
            Self::State(ElementState::Hidden) => "toBeHidden",
            Self::State(ElementState::Selected) => "toBeSelected",
            Self::State(ElementState::Visible) => "toBeVisible",
            Self::Focused => "toBeFocused",
            Self::InDom => "toBeInDom",
            Self::MatchedBy(_) => "toBeMatchedBy",
            Self::Descendant(_) => "toHaveDescendant",
            Self::DescendantWithText { .. } => "toHaveDescendantWithText",
        }
    }
}

/// Selection is non-empty
#[must_use]
pub const fn to_exist() -> DomMatcher {
    DomMatcher::Exist
}

/// Selection has exactly `expected` elements
#[must_use]
pub const fn to_have_length(expected: usize) -> DomMatcher {
    DomMatcher::Length(expected)
}

/// `id` attribute equals `expected`
#[must_use]
pub fn to_have_id(expected: impl Into<String>) -> DomMatcher {
    DomMatcher::Id(expected.into())
}

/// Some element carries class `expected`
#[must_use]
pub fn to_have_class(expected: impl Into<String>) -> DomMatcher {
    DomMatcher::Class(expected.into())
}

/// Tag name equals `expected`, ignoring case
#[must_use]
pub fn to_have_tag(expected: impl Into<String>) -> DomMatcher {
    DomMatcher::Tag(expected.into())
}

/// Attribute `name` is defined (`expected == None`) or equals `expected`
#[must_use]
pub fn to_have_attr(name: impl Into<String>, expected: Option<&str>) -> DomMatcher {
    DomMatcher::Attr {
        name: name.into(),
        expected: expected.map(str::to_string),
    }
}

/// DOM property `name` is defined (`expected == None`) or strictly equals `expected`
#[must_use]
pub fn to_have_prop(name: impl Into<String>, expected: Option<Value>) -> DomMatcher {
    DomMatcher::Prop {
        name: name.into(),
        expected,
    }
}

/// Trimmed text contains `expected`, or matches it when it is a pattern
#[must_use]
pub fn to_have_text(expected: impl Into<TextExpectation>) -> DomMatcher {
    DomMatcher::Text(expected.into())
}

/// Dataset value `key` is defined (`expected == None`) or strictly equals `expected`
#[must_use]
pub fn to_have_data(key: impl Into<String>, expected: Option<Value>) -> DomMatcher {
    DomMatcher::Data {
        key: key.into(),
        expected,
    }
}

/// Form value strictly equals `expected`
#[must_use]
pub fn to_have_value(expected: impl Into<Value>) -> DomMatcher {
    DomMatcher::Value(expected.into())
}

/// Every expected CSS property matches the computed style
#[must_use]
pub fn to_have_css(expected: impl Into<CssExpectation>) -> DomMatcher {
    DomMatcher::Css(expected.into())
}

/// Element is checked
#[must_use]
pub const fn to_be_checked() -> DomMatcher {
    DomMatcher::State(ElementState::Checked)
}

/// Element is disabled
#[must_use]
pub const fn to_be_disabled() -> DomMatcher {
    DomMatcher::State(ElementState::Disabled)
}

/// Element has no children
#[must_use]
pub const fn to_be_empty() -> DomMatcher {
    DomMatcher::State(ElementState::Empty)
}

/// Element is hidden
#[must_use]
pub const fn to_be_hidden() -> DomMatcher {
    DomMatcher::State(ElementState::Hidden)
}

/// Option is selected
#[must_use]
pub const fn to_be_selected() -> DomMatcher {
    DomMatcher::State(ElementState::Selected)
}

/// Element is visible
#[must_use]
pub const fn to_be_visible() -> DomMatcher {
    DomMatcher::State(ElementState::Visible)
}

/// Element has focus
#[must_use]
pub const fn to_be_focused() -> DomMatcher {
    DomMatcher::Focused
}

/// Element is attached to the document
#[must_use]
pub const fn to_be_in_dom() -> DomMatcher {
    DomMatcher::InDom
}

/// Some element matches `selector`
#[must_use]
pub fn to_be_matched_by(selector: impl Into<String>) -> DomMatcher {
    DomMatcher::MatchedBy(selector.into())
}

/// Some descendant matches `selector`
#[must_use]
pub fn to_have_descendant(selector: impl Into<String>) -> DomMatcher {
    DomMatcher::Descendant(selector.into())
}

/// Text of the descendants matching `selector` satisfies `expected`
#[must_use]
pub fn to_have_descendant_with_text(
    selector: impl Into<String>,
    expected: impl Into<TextExpectation>,
) -> DomMatcher {
    DomMatcher::DescendantWithText {
        selector: selector.into(),
        expected: expected.into(),
    }
}

/// `None` expected means "defined"; otherwise strict equality
fn has_property<T: PartialEq>(actual: Option<&T>, expected: Option<&T>) -> bool {
    match expected {
        None => actual.is_some(),
        Some(e) => actual == Some(e),
    }
}

fn with_value_addendum(expected: Option<String>) -> String {
    expected
        .map(|e| format!(" with value '{e}'"))
        .unwrap_or_default()
}

/// Result of comparing expected CSS against a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssComparison {
    /// Every property matched
    Match,
    /// First property that did not match, with its computed value
    Mismatch {
        /// Property name (kebab-case)
        property: String,
        /// Computed value, if any
        actual: Option<String>,
    },
}

/// Compare expected CSS property by property, stopping at the first mismatch.
///
/// A literal expected `"auto"` also matches when the inline style for the
/// property is literally `"auto"`, whatever the computed value is.
pub fn compare_css<Q: DomQuery>(element: &Q, css: &CssExpectation) -> CssComparison {
    for (property, expected) in css.iter() {
        if expected == "auto" && element.inline_style(property).as_deref() == Some("auto") {
            continue;
        }
        let actual = element.css(property);
        if actual.as_deref() != Some(expected) {
            return CssComparison::Mismatch {
                property: property.to_string(),
                actual,
            };
        }
    }
    CssComparison::Match
}

fn text_outcome(
    negate: bool,
    expected: &TextExpectation,
    actual: &str,
    subject: &str,
) -> MatchOutcome {
    let not = not_word(negate);
    let mode = if expected.is_pattern() {
        "text matching"
    } else {
        "text"
    };
    MatchOutcome::new(
        passes(expected.matches(actual), negate),
        format!("Expected element{not} to have {subject}{mode} '{expected}', but had '{actual}'"),
    )
}

impl<Q: DomQuery> Matcher<Q> for DomMatcher {
    fn check(&self, negate: bool, el: &Q) -> MatchOutcome {
        let not = not_word(negate);
        let outcome = match self {
            Self::Exist => MatchOutcome::new(
                passes(!el.is_empty(), negate),
                format!("Expected element{not} to exist"),
            ),
            Self::Length(expected) => {
                let actual = el.len();
                MatchOutcome::new(
                    passes(actual == *expected, negate),
                    format!(
                        "Expected element{not} to have length {expected}, but had {actual}"
                    ),
                )
            }
            Self::Id(expected) => {
                let actual = el.attr("id");
                MatchOutcome::new(
                    passes(actual.as_deref() == Some(expected.as_str()), negate),
                    format!(
                        "Expected element{not} to have ID '{expected}', but had '{}'",
                        show_str(actual.as_deref())
                    ),
                )
            }
            Self::Class(expected) => {
                let actual = el.attr("class");
                MatchOutcome::new(
                    passes(el.has_class(expected), negate),
                    format!(
                        "Expected element{not} to have class '{expected}', but had '{}'",
                        show_str(actual.as_deref())
                    ),
                )
            }
            Self::Tag(expected) => {
                let actual = el.tag_name().map(|t| t.to_lowercase());
                let expected = expected.to_lowercase();
                MatchOutcome::new(
                    passes(actual.as_deref() == Some(expected.as_str()), negate),
                    format!(
                        "Expected element{not} to have tag '{expected}', but had '{}'",
                        show_str(actual.as_deref())
                    ),
                )
            }
            Self::Attr { name, expected } => {
                let actual = el.attr(name);
                MatchOutcome::new(
                    passes(has_property(actual.as_ref(), expected.as_ref()), negate),
                    format!(
                        "Expected element{not} to have attribute '{name}'{}, but had '{}'",
                        with_value_addendum(expected.clone()),
                        show_str(actual.as_deref())
                    ),
                )
            }
            Self::Prop { name, expected } => {
                let actual = el.prop(name);
                MatchOutcome::new(
                    passes(has_property(actual.as_ref(), expected.as_ref()), negate),
                    format!(
                        "Expected element{not} to have property '{name}'{}, but had '{}'",
                        with_value_addendum(expected.as_ref().map(|e| show_value(Some(e)))),
                        show_value(actual.as_ref())
                    ),
                )
            }
            Self::Text(expected) => {
                let text = el.text();
                text_outcome(negate, expected, text.trim(), "")
            }
            Self::Data { key, expected } => {
                let actual = el.data(key);
                MatchOutcome::new(
                    passes(has_property(actual.as_ref(), expected.as_ref()), negate),
                    format!(
                        "Expected element{not} to have data '{key}'{}, but had '{}'",
                        with_value_addendum(expected.as_ref().map(|e| show_value(Some(e)))),
                        show_value(actual.as_ref())
                    ),
                )
            }
            Self::Value(expected) => {
                let actual = el.value();
                MatchOutcome::new(
                    passes(actual.as_ref() == Some(expected), negate),
                    format!(
                        "Expected element{not} to have value '{}', but had '{}'",
                        show_value(Some(expected)),
                        show_value(actual.as_ref())
                    ),
                )
            }
            Self::Css(expected) => {
                let comparison = compare_css(el, expected);
                let mut message = format!("Expected element{not} to have CSS {expected}");
                if let CssComparison::Mismatch { property, actual } = &comparison {
                    if !negate {
                        message.push_str(&format!(
                            ", but '{property}' was '{}'",
                            show_str(actual.as_deref())
                        ));
                    }
                }
                MatchOutcome::new(passes(comparison == CssComparison::Match, negate), message)
            }
            Self::State(state) => MatchOutcome::new(
                passes(el.is(*state), negate),
                format!("Expected element{not} to be {state}"),
            ),
            Self::Focused => MatchOutcome::new(
                passes(el.is_focused(), negate),
                format!("Expected element{not} to be focused"),
            ),
            Self::InDom => MatchOutcome::new(
                passes(el.is_in_dom(), negate),
                format!("Expected element{not} to be attached to the DOM"),
            ),
            Self::MatchedBy(selector) => MatchOutcome::new(
                passes(el.filter_count(selector) > 0, negate),
                format!("Expected element{not} to be matched by '{selector}'"),
            ),
            Self::Descendant(selector) => MatchOutcome::new(
                passes(!el.find(selector).is_empty(), negate),
                format!("Expected element{not} to contain child '{selector}'"),
            ),
            Self::DescendantWithText { selector, expected } => {
                let text = el.find(selector).text();
                text_outcome(
                    negate,
                    expected,
                    text.trim(),
                    &format!("descendant '{selector}' with "),
                )
            }
        };
        tracing::debug!(
            matcher = self.name(),
            negate,
            pass = outcome.pass,
            "matcher evaluated"
        );
        outcome
    }
}
