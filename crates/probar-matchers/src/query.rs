//! The DOM-query abstraction matchers delegate to.
//!
//! A [`DomQuery`] is a selection of zero or more elements. Single-valued
//! accessors read the first element; `has_class`, `is` and `filter_count`
//! consider every element; `text` concatenates all of them. An empty
//! selection answers every question with "not present": `None`, empty
//! text, or `false`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Element state predicates (the `:checked`, `:hidden`, ... pseudo-classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// Checkbox/radio is checked, or option is selected
    Checked,
    /// Form control is disabled
    Disabled,
    /// Element has no element or text children
    Empty,
    /// Element generates no layout box
    Hidden,
    /// Option is selected
    Selected,
    /// Element generates a layout box
    Visible,
}

impl ElementState {
    /// All states, in declaration order
    pub const ALL: [Self; 6] = [
        Self::Checked,
        Self::Disabled,
        Self::Empty,
        Self::Hidden,
        Self::Selected,
        Self::Visible,
    ];

    /// Pseudo-class spelling (e.g. `:checked`)
    #[must_use]
    pub const fn pseudo_class(self) -> &'static str {
        match self {
            Self::Checked => ":checked",
            Self::Disabled => ":disabled",
            Self::Empty => ":empty",
            Self::Hidden => ":hidden",
            Self::Selected => ":selected",
            Self::Visible => ":visible",
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pseudo_class()[1..])
    }
}

/// Read-only view over a selection of DOM elements.
///
/// Implementations must never panic on an empty selection or an invalid
/// selector argument; both degrade to empty results.
pub trait DomQuery: Sized {
    /// Number of elements in the selection
    fn len(&self) -> usize;

    /// Whether the selection is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attribute value of the first element
    fn attr(&self, name: &str) -> Option<String>;

    /// DOM property of the first element
    fn prop(&self, name: &str) -> Option<Value>;

    /// Whether any element carries the class
    fn has_class(&self, class: &str) -> bool;

    /// Tag name of the first element
    fn tag_name(&self) -> Option<String>;

    /// Combined text content of every element
    fn text(&self) -> String;

    /// Dataset value of the first element
    fn data(&self, key: &str) -> Option<Value>;

    /// Form value of the first element
    fn value(&self) -> Option<Value>;

    /// Computed style of the first element
    fn css(&self, property: &str) -> Option<String>;

    /// Inline style declaration of the first element
    fn inline_style(&self, property: &str) -> Option<String>;

    /// Whether any element is in the given state
    fn is(&self, state: ElementState) -> bool;

    /// Whether the first element is the document's active element
    fn is_focused(&self) -> bool;

    /// Whether the first element is attached below the document element
    fn is_in_dom(&self) -> bool;

    /// Number of elements in the selection matching `selector`
    fn filter_count(&self, selector: &str) -> usize;

    /// Descendants of any element in the selection matching `selector`
    fn find(&self, selector: &str) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_class_spelling() {
        assert_eq!(ElementState::Checked.pseudo_class(), ":checked");
        assert_eq!(ElementState::Visible.pseudo_class(), ":visible");
    }

    #[test]
    fn test_display_strips_colon() {
        assert_eq!(ElementState::Hidden.to_string(), "hidden");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ElementState::Disabled).unwrap();
        assert_eq!(json, "\"disabled\"");
        let state: ElementState = serde_json::from_str("\"selected\"").unwrap();
        assert_eq!(state, ElementState::Selected);
    }

    #[test]
    fn test_all_is_exhaustive() {
        assert_eq!(ElementState::ALL.len(), 6);
    }
}
