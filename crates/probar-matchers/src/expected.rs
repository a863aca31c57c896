//! Expected-value types and message formatting helpers.

use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Rendering used for values that are not present
pub const UNDEFINED: &str = "undefined";

/// Expected text: a pattern to test, or a substring to find.
///
/// Substring mode is containment, never full equality: `"ell"` matches
/// `"Hello"`.
#[derive(Debug, Clone)]
pub enum TextExpectation {
    /// Observed text must contain this substring
    Contains(String),
    /// Observed text must match this pattern
    Pattern(Regex),
}

impl TextExpectation {
    /// Build a pattern expectation
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Whether this expectation is in pattern mode
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    /// Test observed text against the expectation
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Contains(needle) => actual.contains(needle.as_str()),
            Self::Pattern(re) => re.is_match(actual),
        }
    }
}

impl fmt::Display for TextExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(s) => f.write_str(s),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<&str> for TextExpectation {
    fn from(s: &str) -> Self {
        Self::Contains(s.to_string())
    }
}

impl From<String> for TextExpectation {
    fn from(s: String) -> Self {
        Self::Contains(s)
    }
}

impl From<Regex> for TextExpectation {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl From<&Regex> for TextExpectation {
    fn from(re: &Regex) -> Self {
        Self::Pattern(re.clone())
    }
}

/// Expected CSS: ordered `(property, value)` pairs.
///
/// Property names are stored in kebab-case; `backgroundColor` and
/// `background-color` are the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssExpectation {
    entries: Vec<(String, String)>,
}

impl CssExpectation {
    /// Create an empty expectation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a property, keeping first-insertion order
    #[must_use]
    pub fn with(mut self, property: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(property.as_ref(), value.into());
        self
    }

    fn insert(&mut self, property: &str, value: String) {
        let key = camel_to_kebab(property);
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Iterate properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no properties are expected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for CssExpectation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut css = Self::new();
        for (k, v) in iter {
            css.insert(k.as_ref(), v.into());
        }
        css
    }
}

impl<K: AsRef<str>, V: Into<String>, const N: usize> From<[(K, V); N]> for CssExpectation {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for CssExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("{}");
        }
        let body: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}: '{v}'"))
            .collect();
        write!(f, "{{ {} }}", body.join(", "))
    }
}

/// Convert `backgroundColor` to `background-color`; kebab input is unchanged
#[must_use]
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Render an optional string for a message
#[must_use]
pub fn show_str(value: Option<&str>) -> &str {
    value.unwrap_or(UNDEFINED)
}

/// Render an optional JSON value for a message (strings unquoted)
#[must_use]
pub fn show_value(value: Option<&Value>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(v) => render_value(v),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod text_tests {
        use super::*;

        #[test]
        fn test_contains_is_substring_not_equality() {
            let exp = TextExpectation::from("ell");
            assert!(exp.matches("Hello"));
            assert!(!exp.matches("Help"));
        }

        #[test]
        fn test_pattern_mode() {
            let exp = TextExpectation::pattern("^H").unwrap();
            assert!(exp.is_pattern());
            assert!(exp.matches("Hello"));
            assert!(!exp.matches("hello"));
        }

        #[test]
        fn test_display() {
            assert_eq!(TextExpectation::from("abc").to_string(), "abc");
            assert_eq!(TextExpectation::pattern("^H").unwrap().to_string(), "/^H/");
        }

        #[test]
        fn test_empty_substring_always_matches() {
            assert!(TextExpectation::from("").matches(""));
        }
    }

    mod css_tests {
        use super::*;

        #[test]
        fn test_keys_normalized_to_kebab() {
            let css = CssExpectation::from([("backgroundColor", "red")]);
            assert_eq!(css.iter().next(), Some(("background-color", "red")));
        }

        #[test]
        fn test_insertion_order_kept() {
            let css = CssExpectation::new()
                .with("width", "auto")
                .with("color", "red")
                .with("width", "10px");
            let keys: Vec<_> = css.iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec!["width", "color"]);
            assert_eq!(css.iter().next(), Some(("width", "10px")));
        }

        #[test]
        fn test_display() {
            let css = CssExpectation::from([("width", "auto"), ("color", "red")]);
            assert_eq!(css.to_string(), "{ width: 'auto', color: 'red' }");
            assert_eq!(CssExpectation::new().to_string(), "{}");
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_camel_to_kebab() {
            assert_eq!(camel_to_kebab("fontSize"), "font-size");
            assert_eq!(camel_to_kebab("font-size"), "font-size");
            assert_eq!(camel_to_kebab("userId"), "user-id");
        }

        #[test]
        fn test_show_value() {
            assert_eq!(show_value(None), "undefined");
            assert_eq!(show_value(Some(&json!("a"))), "a");
            assert_eq!(show_value(Some(&json!(3))), "3");
            assert_eq!(show_value(Some(&json!(["a", "b"]))), "a,b");
            assert_eq!(show_value(Some(&json!(null))), "null");
        }

        #[test]
        fn test_show_str() {
            assert_eq!(show_str(None), "undefined");
            assert_eq!(show_str(Some("x")), "x");
        }
    }
}
