//! DOM properties, dataset values and form values derived from markup.

use scraper::{ElementRef, Selector};
use serde_json::{json, Value};

use crate::expected::camel_to_kebab;

/// Attributes that read back as their own name when present
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "defer",
    "disabled",
    "hidden",
    "ismap",
    "loop",
    "multiple",
    "open",
    "readonly",
    "required",
    "scoped",
    "selected",
];

const FORM_CONTROLS: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

const REFLECTED_ANYWHERE: &[(&str, &str)] = &[
    ("id", "id"),
    ("className", "class"),
    ("title", "title"),
    ("lang", "lang"),
    ("dir", "dir"),
];

const REFLECTED_IF_PRESENT: &[(&str, &str)] = &[
    ("href", "href"),
    ("src", "src"),
    ("name", "name"),
    ("alt", "alt"),
    ("placeholder", "placeholder"),
    ("rel", "rel"),
    ("target", "target"),
    ("action", "action"),
    ("method", "method"),
    ("htmlFor", "for"),
];

fn tag(el: ElementRef<'_>) -> &str {
    el.value().name()
}

fn has_attr(el: ElementRef<'_>, name: &str) -> bool {
    el.value().attr(name).is_some()
}

fn ancestor_elements(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.ancestors().filter_map(ElementRef::wrap)
}

/// Attribute as jQuery reads it: boolean attributes report their name
pub fn attribute(el: ElementRef<'_>, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    let value = el.value().attr(&name)?;
    if BOOLEAN_ATTRIBUTES.contains(&name.as_str()) {
        Some(name)
    } else {
        Some(value.to_string())
    }
}

/// `type` of an input, lowercased, defaulting to `text`
pub fn input_type(el: ElementRef<'_>) -> String {
    el.value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

/// Whether the element is a checked checkbox/radio
pub fn is_checked_input(el: ElementRef<'_>) -> bool {
    tag(el) == "input"
        && matches!(input_type(el).as_str(), "checkbox" | "radio")
        && has_attr(el, "checked")
}

/// `:disabled`: a disabled form control, or one inside a disabled
/// fieldset/optgroup
pub fn is_disabled(el: ElementRef<'_>) -> bool {
    if !FORM_CONTROLS.contains(&tag(el)) {
        return false;
    }
    if has_attr(el, "disabled") {
        return true;
    }
    ancestor_elements(el).any(|a| {
        let ancestor_tag = tag(a);
        (ancestor_tag == "fieldset" || (ancestor_tag == "optgroup" && tag(el) == "option"))
            && has_attr(a, "disabled")
    })
}

/// `:empty`: no element or text children (comments allowed)
pub fn is_empty(el: ElementRef<'_>) -> bool {
    !el.children()
        .any(|child| child.value().is_element() || child.value().is_text())
}

fn owning_select(option: ElementRef<'_>) -> Option<ElementRef<'_>> {
    ancestor_elements(option)
        .take(2)
        .find(|a| tag(*a) == "select")
}

fn options_of(select: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let Ok(selector) = Selector::parse("option") else {
        return Vec::new();
    };
    select.select(&selector).collect()
}

fn is_multi_select(select: ElementRef<'_>) -> bool {
    has_attr(select, "multiple")
        || select
            .value()
            .attr("size")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .is_some_and(|size| size > 1)
}

/// Selectedness of an option, including the single-select default of the
/// first enabled option
pub fn is_option_selected(option: ElementRef<'_>) -> bool {
    if tag(option) != "option" {
        return false;
    }
    if has_attr(option, "selected") {
        return true;
    }
    let Some(select) = owning_select(option) else {
        return false;
    };
    if is_multi_select(select) {
        return false;
    }
    let options = options_of(select);
    if options.iter().any(|o| has_attr(*o, "selected")) {
        return false;
    }
    options.into_iter().find(|o| !is_disabled(*o)) == Some(option)
}

/// Option value: the `value` attribute or the collapsed text
pub fn option_value(option: ElementRef<'_>) -> String {
    match option.value().attr("value") {
        Some(value) => value.to_string(),
        None => collapse_whitespace(&option.text().collect::<String>()),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Form value as `.val()` reports it
pub fn form_value(el: ElementRef<'_>) -> Value {
    match tag(el) {
        "input" => {
            let default = match input_type(el).as_str() {
                "checkbox" | "radio" => "on",
                _ => "",
            };
            json!(el.value().attr("value").unwrap_or(default))
        }
        "textarea" => json!(el.text().collect::<String>()),
        "option" => json!(option_value(el)),
        "select" => {
            let selected: Vec<String> = options_of(el)
                .into_iter()
                .filter(|o| is_option_selected(*o))
                .map(option_value)
                .collect();
            if is_multi_select(el) {
                json!(selected)
            } else {
                selected.into_iter().next().map_or(Value::Null, Value::from)
            }
        }
        _ => json!(el.value().attr("value").unwrap_or_default()),
    }
}

/// Dataset attribute name for a key (`userId` -> `data-user-id`)
pub fn data_attribute_name(key: &str) -> String {
    format!("data-{}", camel_to_kebab(key).to_ascii_lowercase())
}

/// Convert a raw `data-*` string the way `.data()` does
pub fn convert_data_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Some(number) = canonical_number(raw) {
        return number;
    }
    let looks_like_json = (raw.starts_with('{') && raw.ends_with('}'))
        || (raw.starts_with('[') && raw.ends_with(']'));
    if looks_like_json {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

/// A number only when formatting it back yields the same string
fn canonical_number(raw: &str) -> Option<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return (int.to_string() == raw).then(|| json!(int));
    }
    let parsed: f64 = raw.parse().ok()?;
    (parsed.is_finite() && parsed.to_string() == raw).then(|| json!(parsed))
}

/// Dataset value of an element
pub fn data_value(el: ElementRef<'_>, key: &str) -> Option<Value> {
    let attribute = data_attribute_name(key);
    el.value().attr(&attribute).map(convert_data_value)
}

fn default_tab_index(el: ElementRef<'_>) -> i64 {
    match tag(el) {
        "a" | "area" if has_attr(el, "href") => 0,
        "button" | "input" | "select" | "textarea" | "iframe" => 0,
        _ => -1,
    }
}

/// DOM property of an element; `None` when the property does not exist
pub fn property(el: ElementRef<'_>, name: &str) -> Option<Value> {
    let element = el.value();
    let tag_name = tag(el);
    let attr_or_empty = |attr: &str| json!(element.attr(attr).unwrap_or_default());

    if let Some((_, attr)) = REFLECTED_ANYWHERE.iter().find(|(p, _)| *p == name) {
        return Some(attr_or_empty(attr));
    }
    if let Some((_, attr)) = REFLECTED_IF_PRESENT.iter().find(|(p, _)| *p == name) {
        return element.attr(attr).map(|v| json!(v));
    }

    match name {
        "tagName" | "nodeName" => Some(json!(tag_name.to_ascii_uppercase())),
        "localName" => Some(json!(tag_name)),
        "textContent" => Some(json!(el.text().collect::<String>())),
        "innerHTML" => Some(json!(el.inner_html())),
        "outerHTML" => Some(json!(el.html())),
        "childElementCount" => Some(json!(el.children().filter_map(ElementRef::wrap).count())),
        "hidden" => Some(json!(has_attr(el, "hidden"))),
        "autofocus" => Some(json!(has_attr(el, "autofocus"))),
        "tabIndex" => Some(json!(element
            .attr("tabindex")
            .and_then(|t| t.trim().parse::<i64>().ok())
            .unwrap_or_else(|| default_tab_index(el)))),
        "checked" if tag_name == "input" => Some(json!(is_checked_input(el))),
        "selected" if tag_name == "option" => Some(json!(is_option_selected(el))),
        "disabled" if FORM_CONTROLS.contains(&tag_name) => Some(json!(has_attr(el, "disabled"))),
        "required" | "readOnly" if matches!(tag_name, "input" | "select" | "textarea") => {
            Some(json!(has_attr(el, &name.to_ascii_lowercase())))
        }
        "multiple" if matches!(tag_name, "input" | "select") => Some(json!(has_attr(el, "multiple"))),
        "value" if matches!(tag_name, "input" | "textarea" | "select" | "option" | "button") => {
            Some(form_value(el))
        }
        "type" => match tag_name {
            "input" => Some(json!(input_type(el))),
            "button" => Some(json!(element
                .attr("type")
                .map(str::to_ascii_lowercase)
                .unwrap_or_else(|| "submit".to_string()))),
            "select" if has_attr(el, "multiple") => Some(json!("select-multiple")),
            "select" => Some(json!("select-one")),
            _ => element.attr("type").map(|t| json!(t)),
        },
        _ => None,
    }
}
