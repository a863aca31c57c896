//! HTML-backed implementation of [`DomQuery`](crate::DomQuery).
//!
//! Parses markup with `scraper` and answers element queries the way a
//! browser would for a static page: attributes, reflected properties,
//! dataset and form values, a small style cascade, visibility and form
//! state. There is no layout engine; pixel-resolved values can be pinned
//! with [`HtmlDocument::set_computed_style`].

mod document;
mod form;
mod selection;
mod style;

pub use document::HtmlDocument;
pub use form::{convert_data_value, data_attribute_name, BOOLEAN_ATTRIBUTES};
pub use selection::Selection;
pub use style::{parse_declarations, StyleSheet, INHERITED};
