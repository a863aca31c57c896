//! Name-keyed matcher registry.
//!
//! Host frameworks and suite files refer to matchers by name
//! (`toHaveText`) and pass loosely typed JSON arguments. The registry owns
//! the name to factory mapping and validates arguments once, at build time.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::expected::{CssExpectation, TextExpectation};
use crate::matchers::{self, DomMatcher};
use crate::result::{MatcherError, MatcherResult};

/// Builds a matcher from JSON arguments
pub type MatcherFactory = fn(&[Value]) -> MatcherResult<DomMatcher>;

/// Registry of matcher factories
#[derive(Clone, Default)]
pub struct MatcherRegistry {
    factories: BTreeMap<String, MatcherFactory>,
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl MatcherRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in matcher
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("toExist", |args| {
            arity("toExist", args, 0, 0)?;
            Ok(matchers::to_exist())
        });
        registry.register("toHaveLength", |args| {
            arity("toHaveLength", args, 1, 1)?;
            Ok(matchers::to_have_length(length_arg(&args[0])?))
        });
        registry.register("toHaveId", |args| {
            Ok(matchers::to_have_id(single_string("toHaveId", args)?))
        });
        registry.register("toHaveClass", |args| {
            Ok(matchers::to_have_class(single_string("toHaveClass", args)?))
        });
        registry.register("toHaveTag", |args| {
            Ok(matchers::to_have_tag(single_string("toHaveTag", args)?))
        });
        registry.register("toHaveAttr", |args| {
            arity("toHaveAttr", args, 1, 2)?;
            let name = string_arg("toHaveAttr", &args[0])?;
            let expected = args
                .get(1)
                .map(|v| string_arg("toHaveAttr", v))
                .transpose()?;
            Ok(matchers::to_have_attr(name, expected.as_deref()))
        });
        registry.register("toHaveProp", |args| {
            arity("toHaveProp", args, 1, 2)?;
            let name = string_arg("toHaveProp", &args[0])?;
            Ok(matchers::to_have_prop(name, args.get(1).cloned()))
        });
        registry.register("toHaveText", |args| {
            arity("toHaveText", args, 1, 1)?;
            Ok(matchers::to_have_text(text_arg("toHaveText", &args[0])?))
        });
        registry.register("toHaveData", |args| {
            arity("toHaveData", args, 1, 2)?;
            let key = string_arg("toHaveData", &args[0])?;
            Ok(matchers::to_have_data(key, args.get(1).cloned()))
        });
        registry.register("toHaveValue", |args| {
            arity("toHaveValue", args, 1, 1)?;
            Ok(matchers::to_have_value(args[0].clone()))
        });
        registry.register("toHaveCss", |args| {
            arity("toHaveCss", args, 1, 1)?;
            Ok(matchers::to_have_css(css_arg(&args[0])?))
        });
        registry.register("toBeChecked", |args| {
            arity("toBeChecked", args, 0, 0)?;
            Ok(matchers::to_be_checked())
        });
        registry.register("toBeDisabled", |args| {
            arity("toBeDisabled", args, 0, 0)?;
            Ok(matchers::to_be_disabled())
        });
        registry.register("toBeEmpty", |args| {
            arity("toBeEmpty", args, 0, 0)?;
            Ok(matchers::to_be_empty())
        });
        registry.register("toBeHidden", |args| {
            arity("toBeHidden", args, 0, 0)?;
            Ok(matchers::to_be_hidden())
        });
        registry.register("toBeSelected", |args| {
            arity("toBeSelected", args, 0, 0)?;
            Ok(matchers::to_be_selected())
        });
        registry.register("toBeVisible", |args| {
            arity("toBeVisible", args, 0, 0)?;
            Ok(matchers::to_be_visible())
        });
        registry.register("toBeFocused", |args| {
            arity("toBeFocused", args, 0, 0)?;
            Ok(matchers::to_be_focused())
        });
        registry.register("toBeInDom", |args| {
            arity("toBeInDom", args, 0, 0)?;
            Ok(matchers::to_be_in_dom())
        });
        registry.register("toBeMatchedBy", |args| {
            Ok(matchers::to_be_matched_by(single_string("toBeMatchedBy", args)?))
        });
        registry.register("toHaveDescendant", |args| {
            Ok(matchers::to_have_descendant(single_string(
                "toHaveDescendant",
                args,
            )?))
        });
        registry.register("toHaveDescendantWithText", |args| {
            arity("toHaveDescendantWithText", args, 2, 2)?;
            let selector = string_arg("toHaveDescendantWithText", &args[0])?;
            let expected = text_arg("toHaveDescendantWithText", &args[1])?;
            Ok(matchers::to_have_descendant_with_text(selector, expected))
        });
        registry
    }

    /// Add or replace a factory; returns the one it replaced
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: MatcherFactory,
    ) -> Option<MatcherFactory> {
        self.factories.insert(name.into(), factory)
    }

    /// Whether a matcher is registered under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered matchers
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the matcher registered under `name`
    pub fn build(&self, name: &str, args: &[Value]) -> MatcherResult<DomMatcher> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| MatcherError::UnknownMatcher {
                name: name.to_string(),
            })?;
        factory(args)
    }
}

fn arity(matcher: &str, args: &[Value], min: usize, max: usize) -> MatcherResult<()> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    let expected = if min == max {
        format!("{min}")
    } else {
        format!("{min} to {max}")
    };
    Err(MatcherError::invalid_arguments(
        matcher,
        format!("expected {expected} argument(s), got {}", args.len()),
    ))
}

fn string_arg(matcher: &str, value: &Value) -> MatcherResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MatcherError::invalid_arguments(matcher, format!("expected a string, got {value}")))
}

fn single_string(matcher: &str, args: &[Value]) -> MatcherResult<String> {
    arity(matcher, args, 1, 1)?;
    string_arg(matcher, &args[0])
}

/// Text argument: `{"pattern": "..."}` or `"/.../"` select pattern mode,
/// any other string is a substring
pub fn text_arg(matcher: &str, value: &Value) -> MatcherResult<TextExpectation> {
    if let Some(pattern) = value.get("pattern").and_then(Value::as_str) {
        return Ok(TextExpectation::Pattern(Regex::new(pattern)?));
    }
    let text = string_arg(matcher, value)?;
    match text
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
    {
        Some(pattern) if text.len() >= 2 => Ok(TextExpectation::Pattern(Regex::new(pattern)?)),
        _ => Ok(TextExpectation::Contains(text)),
    }
}

fn length_arg(value: &Value) -> MatcherResult<usize> {
    let n = value.as_u64().ok_or_else(|| {
        MatcherError::invalid_arguments("toHaveLength", "expected a non-negative integer")
    })?;
    usize::try_from(n)
        .map_err(|_| MatcherError::invalid_arguments("toHaveLength", "length out of range"))
}

fn css_arg(value: &Value) -> MatcherResult<CssExpectation> {
    let object = value.as_object().ok_or_else(|| {
        MatcherError::invalid_arguments("toHaveCss", "expected an object of property: value")
    })?;
    object
        .iter()
        .map(|(property, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(MatcherError::invalid_arguments(
                        "toHaveCss",
                        format!("value for '{property}' must be a string, got {other}"),
                    ))
                }
            };
            Ok((property.clone(), v))
        })
        .collect()
}
