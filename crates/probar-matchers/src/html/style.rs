//! Minimal style cascade for static documents.
//!
//! Order, lowest to highest: initial values, user-agent display defaults,
//! `<style>` rules in source order (no specificity), inline `style`
//! attribute, explicit computed-style overrides. Nested at-rules are
//! skipped.

use scraper::{ElementRef, Html, Selector};

/// Properties that inherit from the parent when not declared
pub const INHERITED: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-type",
    "text-align",
    "text-indent",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

/// Elements that never render
const NON_RENDERED: &[&str] = &[
    "area", "base", "datalist", "head", "link", "meta", "noscript", "param", "script", "style",
    "template", "title",
];

const BLOCK: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "legend",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "ul",
];

const INLINE_BLOCK: &[&str] = &["button", "input", "meter", "progress", "select", "textarea"];

/// Parse `a: b; c: d` into lowercase-name / trimmed-value pairs
pub fn parse_declarations(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map_or(value, str::trim_end);
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((name, value.to_string()))
            }
        })
        .collect()
}

/// Inline declaration for `property` on `el`, last one wins
pub fn inline_declaration(el: ElementRef<'_>, property: &str) -> Option<String> {
    let style = el.value().attr("style")?;
    parse_declarations(style)
        .into_iter()
        .rev()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

/// User-agent `display` for an element
pub fn default_display(el: ElementRef<'_>) -> &'static str {
    let element = el.value();
    let tag = element.name();
    if NON_RENDERED.contains(&tag) || element.attr("hidden").is_some() {
        return "none";
    }
    if tag == "input"
        && element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return "none";
    }
    match tag {
        "li" => "list-item",
        "table" => "table",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "thead" => "table-header-group",
        "tbody" => "table-row-group",
        "tfoot" => "table-footer-group",
        "caption" => "table-caption",
        "option" | "optgroup" => "block",
        _ if BLOCK.contains(&tag) => "block",
        _ if INLINE_BLOCK.contains(&tag) => "inline-block",
        _ => "inline",
    }
}

/// Initial value of a property at the root
pub fn initial_value(property: &str) -> Option<&'static str> {
    match property {
        "visibility" => Some("visible"),
        "position" => Some("static"),
        "opacity" => Some("1"),
        "float" => Some("none"),
        "direction" => Some("ltr"),
        "white-space" => Some("normal"),
        _ => None,
    }
}

#[derive(Debug)]
struct StyleRule {
    selector: Selector,
    declarations: Vec<(String, String)>,
}

/// Rules collected from every `<style>` element
#[derive(Debug, Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Collect rules from the document's `<style>` elements
    pub fn from_document(html: &Html) -> Self {
        let mut sheet = Self::default();
        let Ok(style_selector) = Selector::parse("style") else {
            return sheet;
        };
        for style in html.select(&style_selector) {
            let css: String = style.text().collect();
            sheet.add_css(&css);
        }
        sheet
    }

    /// Append rules parsed from stylesheet text
    pub fn add_css(&mut self, css: &str) {
        let css = strip_comments(css);
        for chunk in css.split('}') {
            let Some((selector_text, body)) = chunk.split_once('{') else {
                continue;
            };
            let selector_text = selector_text.trim();
            if selector_text.is_empty() || selector_text.starts_with('@') || body.contains('{') {
                continue;
            }
            match Selector::parse(selector_text) {
                Ok(selector) => self.rules.push(StyleRule {
                    selector,
                    declarations: parse_declarations(body),
                }),
                Err(err) => {
                    tracing::warn!(selector = selector_text, error = ?err, "skipping style rule");
                }
            }
        }
    }

    /// Number of parsed rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules were parsed
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Last declaration of `property` among rules matching `el`
    pub fn lookup(&self, el: &ElementRef<'_>, property: &str) -> Option<String> {
        self.rules
            .iter()
            .filter(|rule| rule.selector.matches(el))
            .flat_map(|rule| rule.declarations.iter())
            .filter(|(name, _)| name == property)
            .last()
            .map(|(_, value)| value.clone())
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(html: &'a Html, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations("Width: auto; color : red !important;;bad");
        assert_eq!(
            decls,
            vec![
                ("width".to_string(), "auto".to_string()),
                ("color".to_string(), "red".to_string()),
            ]
        );
    }

    #[test]
    fn test_inline_last_wins() {
        let html = Html::parse_document("<p style='color: red; color: blue'></p>");
        let p = first(&html, "p");
        assert_eq!(inline_declaration(p, "color").as_deref(), Some("blue"));
        assert_eq!(inline_declaration(p, "width"), None);
    }

    #[test]
    fn test_default_display() {
        let html = Html::parse_document(
            "<div></div><span></span><li></li><input type='HIDDEN'><p hidden></p><button></button>",
        );
        assert_eq!(default_display(first(&html, "div")), "block");
        assert_eq!(default_display(first(&html, "span")), "inline");
        assert_eq!(default_display(first(&html, "li")), "list-item");
        assert_eq!(default_display(first(&html, "input")), "none");
        assert_eq!(default_display(first(&html, "p")), "none");
        assert_eq!(default_display(first(&html, "button")), "inline-block");
        assert_eq!(default_display(first(&html, "head")), "none");
    }

    #[test]
    fn test_stylesheet_source_order() {
        let html = Html::parse_document(
            "<style>/* c */ .a { color: red } p { color: blue } @media print { p { color: green } }</style><p class='a'></p>",
        );
        let sheet = StyleSheet::from_document(&html);
        assert_eq!(sheet.len(), 2);
        let p = first(&html, "p");
        assert_eq!(sheet.lookup(&p, "color").as_deref(), Some("blue"));
    }

    #[test]
    fn test_invalid_rule_skipped() {
        let mut sheet = StyleSheet::default();
        sheet.add_css("p[ { color: red } div { display: none }");
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_strip_comments_unterminated() {
        assert_eq!(strip_comments("a /* b"), "a ");
        assert_eq!(strip_comments("a /* b */ c"), "a  c");
    }

    #[test]
    fn test_initial_values() {
        assert_eq!(initial_value("visibility"), Some("visible"));
        assert_eq!(initial_value("width"), None);
    }
}
