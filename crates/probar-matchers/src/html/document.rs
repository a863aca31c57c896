//! Parsed HTML document backing [`Selection`](super::Selection).

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::selection::Selection;
use super::style::{self, StyleSheet};
use crate::result::{MatcherError, MatcherResult};

/// A static HTML document.
///
/// Documents parsed with [`parse`](Self::parse) are attached: their
/// elements are "in the DOM". Fragments parsed with
/// [`fragment`](Self::fragment) model detached nodes.
#[derive(Debug)]
pub struct HtmlDocument {
    html: Html,
    attached: bool,
    stylesheet: StyleSheet,
    computed_overrides: HashMap<(usize, String), String>,
    active: Option<usize>,
}

impl HtmlDocument {
    /// Parse a full document
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self::from_html(Html::parse_document(source), true)
    }

    /// Parse a detached fragment
    #[must_use]
    pub fn fragment(source: &str) -> Self {
        Self::from_html(Html::parse_fragment(source), false)
    }

    /// Read and parse a document from disk
    pub fn from_file(path: impl AsRef<Path>) -> MatcherResult<Self> {
        let source = fs::read_to_string(path)?;
        Ok(Self::parse(&source))
    }

    fn from_html(html: Html, attached: bool) -> Self {
        let stylesheet = StyleSheet::from_document(&html);
        let mut doc = Self {
            html,
            attached,
            stylesheet,
            computed_overrides: HashMap::new(),
            active: None,
        };
        let active = doc
            .elements()
            .position(|el| el.value().attr("autofocus").is_some());
        doc.active = active;
        doc
    }

    /// Whether this document is attached (not a fragment)
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Underlying parsed tree
    #[must_use]
    pub const fn html(&self) -> &Html {
        &self.html
    }

    /// The document element (`<html>`)
    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Every element in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().descendants().filter_map(ElementRef::wrap)
    }

    pub(crate) fn index_of(&self, el: ElementRef<'_>) -> Option<usize> {
        self.elements().position(|candidate| candidate == el)
    }

    /// Parse a selector, reporting failures as errors
    pub fn parse_selector(selector: &str) -> MatcherResult<Selector> {
        Selector::parse(selector)
            .map_err(|err| MatcherError::invalid_selector(selector, format!("{err:?}")))
    }

    /// Parse a selector, logging and returning `None` on failure
    pub(crate) fn lenient_selector(selector: &str) -> Option<Selector> {
        match Self::parse_selector(selector) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(selector, error = %err, "treating invalid selector as empty");
                None
            }
        }
    }

    /// Parse `selector` relative to a context element: every
    /// comma-separated alternative is anchored at `:scope`, so `div span`
    /// needs both the `div` and the `span` inside the context and `> li`
    /// selects direct children.
    pub(crate) fn scoped_selector(selector: &str) -> Option<Selector> {
        let scoped = split_selector_list(selector)
            .into_iter()
            .map(|part| format!(":scope {}", part.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let parsed = match Selector::parse(&scoped) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(selector, error = ?err, "treating invalid selector as empty");
                None
            }
        };
        parsed
    }

    /// Select elements; an invalid selector yields an empty selection
    #[must_use]
    pub fn select(&self, selector: &str) -> Selection<'_> {
        let nodes = Self::lenient_selector(selector)
            .map(|parsed| self.html.select(&parsed).collect())
            .unwrap_or_default();
        Selection::new(self, nodes)
    }

    /// Select elements, failing on an invalid selector
    pub fn try_select(&self, selector: &str) -> MatcherResult<Selection<'_>> {
        let parsed = Self::parse_selector(selector)?;
        Ok(Selection::new(self, self.html.select(&parsed).collect()))
    }

    /// Make the first element matching `selector` the active element.
    ///
    /// Returns whether an element was found; focus is unchanged otherwise.
    pub fn focus(&mut self, selector: &str) -> bool {
        let index = {
            let selection = self.select(selector);
            selection.first().and_then(|el| self.index_of(el))
        };
        if index.is_some() {
            self.active = index;
        }
        index.is_some()
    }

    /// Clear the active element
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// The active element, if any
    #[must_use]
    pub fn active_element(&self) -> Option<ElementRef<'_>> {
        self.active.and_then(|index| self.elements().nth(index))
    }

    /// Pin the computed value of `property` for every element matching
    /// `selector`, standing in for a browser-resolved value.
    ///
    /// Returns the number of elements affected.
    pub fn set_computed_style(
        &mut self,
        selector: &str,
        property: &str,
        value: impl Into<String>,
    ) -> usize {
        let property = crate::expected::camel_to_kebab(property);
        let value = value.into();
        let indices: Vec<usize> = {
            let selection = self.select(selector);
            selection
                .elements()
                .iter()
                .filter_map(|el| self.index_of(*el))
                .collect()
        };
        for index in &indices {
            self.computed_overrides
                .insert((*index, property.clone()), value.clone());
        }
        indices.len()
    }

    /// Append stylesheet text, as if from another `<style>` element
    pub fn add_stylesheet(&mut self, css: &str) {
        self.stylesheet.add_css(css);
    }

    /// Computed value of `property` for `el`
    pub fn computed_style(&self, el: ElementRef<'_>, property: &str) -> Option<String> {
        let property = crate::expected::camel_to_kebab(property);
        self.cascade(el, &property)
    }

    fn cascade(&self, el: ElementRef<'_>, property: &str) -> Option<String> {
        if let Some(index) = self.index_of(el) {
            if let Some(value) = self
                .computed_overrides
                .get(&(index, property.to_string()))
            {
                return Some(value.clone());
            }
        }
        if let Some(value) = style::inline_declaration(el, property) {
            return Some(value);
        }
        if let Some(value) = self.stylesheet.lookup(&el, property) {
            return Some(value);
        }
        if property == "display" {
            return Some(style::default_display(el).to_string());
        }
        if style::INHERITED.contains(&property) {
            if let Some(parent) = el.parent().and_then(ElementRef::wrap) {
                return self.cascade(parent, property);
            }
        }
        style::initial_value(property).map(str::to_string)
    }

    /// `:hidden`: no layout box for the element or an ancestor
    pub fn is_hidden(&self, el: ElementRef<'_>) -> bool {
        std::iter::once(el)
            .chain(el.ancestors().filter_map(ElementRef::wrap))
            .any(|node| self.cascade(node, "display").as_deref() == Some("none"))
    }
}

/// Split a selector list at top-level commas, leaving commas inside
/// brackets, parentheses and quoted strings alone
fn split_selector_list(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::DomQuery;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_document_is_attached() {
            let doc = HtmlDocument::parse("<p>x</p>");
            assert!(doc.is_attached());
            assert_eq!(doc.root().value().name(), "html");
        }

        #[test]
        fn test_fragment_is_detached() {
            let doc = HtmlDocument::fragment("<p>x</p>");
            assert!(!doc.is_attached());
            assert_eq!(doc.select("p").len(), 1);
        }

        #[test]
        fn test_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("page.html");
            std::fs::write(&path, "<h1>Title</h1>").unwrap();
            let doc = HtmlDocument::from_file(&path).unwrap();
            assert_eq!(doc.select("h1").len(), 1);
        }

        #[test]
        fn test_from_missing_file() {
            let err = HtmlDocument::from_file("/definitely/not/here.html").unwrap_err();
            assert!(matches!(err, MatcherError::Io(_)));
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_invalid_selector_is_empty() {
            let doc = HtmlDocument::parse("<p>x</p>");
            assert!(doc.select("p[").is_empty());
        }

        #[test]
        fn test_try_select_reports_error() {
            let doc = HtmlDocument::parse("<p>x</p>");
            let err = doc.try_select("p[").unwrap_err();
            assert!(matches!(err, MatcherError::InvalidSelector { .. }));
            assert_eq!(doc.try_select("p").unwrap().len(), 1);
        }

        #[test]
        fn test_split_selector_list() {
            assert_eq!(split_selector_list("a, b"), vec!["a", " b"]);
            assert_eq!(split_selector_list("a[x='1,2'], :is(b, c)"), vec!["a[x='1,2']", " :is(b, c)"]);
            assert_eq!(split_selector_list("> li"), vec!["> li"]);
        }

        #[test]
        fn test_scoped_selector() {
            assert!(HtmlDocument::scoped_selector("div span").is_some());
            assert!(HtmlDocument::scoped_selector("> li, em").is_some());
            assert!(HtmlDocument::scoped_selector("p[").is_none());
        }
    }

    mod focus_tests {
        use super::*;

        #[test]
        fn test_autofocus_is_initial_active_element() {
            let doc = HtmlDocument::parse("<input id='a'><input id='b' autofocus>");
            let active = doc.active_element().unwrap();
            assert_eq!(active.value().attr("id"), Some("b"));
        }

        #[test]
        fn test_focus_and_blur() {
            let mut doc = HtmlDocument::parse("<input id='a'><input id='b'>");
            assert!(doc.active_element().is_none());
            assert!(doc.focus("#a"));
            assert_eq!(doc.active_element().unwrap().value().attr("id"), Some("a"));
            assert!(!doc.focus("#missing"));
            assert_eq!(doc.active_element().unwrap().value().attr("id"), Some("a"));
            doc.blur();
            assert!(doc.active_element().is_none());
        }
    }

    mod style_tests {
        use super::*;

        fn first<'a>(doc: &'a HtmlDocument, css: &str) -> ElementRef<'a> {
            doc.select(css).first().unwrap()
        }

        #[test]
        fn test_cascade_order() {
            let mut doc = HtmlDocument::parse(
                "<style>p { color: blue; width: 10px }</style><p style='color: red'>x</p>",
            );
            let p = first(&doc, "p");
            assert_eq!(doc.computed_style(p, "color").as_deref(), Some("red"));
            assert_eq!(doc.computed_style(p, "width").as_deref(), Some("10px"));
            assert_eq!(doc.set_computed_style("p", "color", "rgb(0, 0, 0)"), 1);
            let p = first(&doc, "p");
            assert_eq!(doc.computed_style(p, "color").as_deref(), Some("rgb(0, 0, 0)"));
        }

        #[test]
        fn test_inherited_properties() {
            let doc = HtmlDocument::parse(
                "<div style='color: green; width: 5px'><span>x</span></div>",
            );
            let span = first(&doc, "span");
            assert_eq!(doc.computed_style(span, "color").as_deref(), Some("green"));
            assert_eq!(doc.computed_style(span, "width"), None);
            assert_eq!(doc.computed_style(span, "visibility").as_deref(), Some("visible"));
        }

        #[test]
        fn test_camel_case_property() {
            let doc = HtmlDocument::parse("<p style='font-size: 12px'>x</p>");
            let p = first(&doc, "p");
            assert_eq!(doc.computed_style(p, "fontSize").as_deref(), Some("12px"));
        }

        #[test]
        fn test_hidden_through_ancestor_and_sheet() {
            let mut doc = HtmlDocument::parse(
                "<div class='gone'><p id='a'>x</p></div><p id='b'>y</p><p id='c' hidden>z</p>",
            );
            doc.add_stylesheet(".gone { display: none }");
            assert!(doc.is_hidden(first(&doc, "#a")));
            assert!(!doc.is_hidden(first(&doc, "#b")));
            assert!(doc.is_hidden(first(&doc, "#c")));
        }

        #[test]
        fn test_author_style_overrides_hidden_attribute() {
            let doc = HtmlDocument::parse("<p hidden style='display: block'>x</p>");
            assert!(!doc.is_hidden(first(&doc, "p")));
        }
    }
}
