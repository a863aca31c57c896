//! Element selections over an [`HtmlDocument`].

use scraper::ElementRef;
use serde_json::Value;
use std::collections::HashSet;

use super::document::HtmlDocument;
use super::{form, style};
use crate::expected::camel_to_kebab;
use crate::query::{DomQuery, ElementState};

/// Zero or more elements of one document, in document order
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    doc: &'a HtmlDocument,
    nodes: Vec<ElementRef<'a>>,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(doc: &'a HtmlDocument, nodes: Vec<ElementRef<'a>>) -> Self {
        Self { doc, nodes }
    }

    /// An empty selection on `doc`
    #[must_use]
    pub fn empty(doc: &'a HtmlDocument) -> Self {
        Self::new(doc, Vec::new())
    }

    /// The selected elements
    #[must_use]
    pub fn elements(&self) -> &[ElementRef<'a>] {
        &self.nodes
    }

    /// First selected element
    #[must_use]
    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.nodes.first().copied()
    }

    /// Selection of the element at `index` (empty when out of range)
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        Self::new(self.doc, self.nodes.get(index).copied().into_iter().collect())
    }

    /// Owning document
    #[must_use]
    pub const fn document(&self) -> &'a HtmlDocument {
        self.doc
    }
}

impl DomQuery for Selection<'_> {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.first().and_then(|el| form::attribute(el, name))
    }

    fn prop(&self, name: &str) -> Option<Value> {
        self.first().and_then(|el| form::property(el, name))
    }

    fn has_class(&self, class: &str) -> bool {
        self.nodes
            .iter()
            .any(|el| el.value().classes().any(|c| c == class))
    }

    fn tag_name(&self) -> Option<String> {
        self.first().map(|el| el.value().name().to_string())
    }

    fn text(&self) -> String {
        self.nodes.iter().flat_map(|el| el.text()).collect()
    }

    fn data(&self, key: &str) -> Option<Value> {
        self.first().and_then(|el| form::data_value(el, key))
    }

    fn value(&self) -> Option<Value> {
        self.first().map(form::form_value)
    }

    fn css(&self, property: &str) -> Option<String> {
        self.first()
            .and_then(|el| self.doc.computed_style(el, property))
    }

    fn inline_style(&self, property: &str) -> Option<String> {
        let property = camel_to_kebab(property);
        self.first()
            .and_then(|el| style::inline_declaration(el, &property))
    }

    fn is(&self, state: ElementState) -> bool {
        self.nodes.iter().any(|el| {
            let el = *el;
            match state {
                ElementState::Checked => form::is_checked_input(el) || form::is_option_selected(el),
                ElementState::Disabled => form::is_disabled(el),
                ElementState::Empty => form::is_empty(el),
                ElementState::Hidden => self.doc.is_hidden(el),
                ElementState::Selected => form::is_option_selected(el),
                ElementState::Visible => !self.doc.is_hidden(el),
            }
        })
    }

    fn is_focused(&self) -> bool {
        match (self.first(), self.doc.active_element()) {
            (Some(el), Some(active)) => el == active,
            _ => false,
        }
    }

    fn is_in_dom(&self) -> bool {
        self.doc.is_attached()
            && self
                .first()
                .is_some_and(|el| el.parent().and_then(ElementRef::wrap).is_some())
    }

    fn filter_count(&self, selector: &str) -> usize {
        let Some(parsed) = HtmlDocument::lenient_selector(selector) else {
            return 0;
        };
        self.nodes.iter().filter(|el| parsed.matches(el)).count()
    }

    fn find(&self, selector: &str) -> Self {
        let Some(scoped) = HtmlDocument::scoped_selector(selector) else {
            return Self::empty(self.doc);
        };
        let found: HashSet<_> = self
            .nodes
            .iter()
            .flat_map(|context| context.select(&scoped))
            .map(|el| el.id())
            .collect();
        let nodes = self
            .doc
            .elements()
            .filter(|el| found.contains(&el.id()))
            .collect();
        Self::new(self.doc, nodes)
    }
}
