//! YAML matcher suites.
//!
//! A suite is a named list of expectations, each a selector, a registry
//! matcher name, JSON arguments and an optional `not` flag:
//!
//! ```yaml
//! name: landing page
//! fail_fast: false
//! expectations:
//!   - selector: "#title"
//!     matcher: toHaveText
//!     args: ["ell"]
//!   - selector: ".banner"
//!     matcher: toBeVisible
//!     not: true
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::compare::{MatchOutcome, Matcher};
use crate::html::HtmlDocument;
use crate::registry::MatcherRegistry;
use crate::result::{MatcherError, MatcherResult};

/// One expectation in a suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSpec {
    /// CSS selector for the subject
    pub selector: String,
    /// Registry name of the matcher
    pub matcher: String,
    /// Matcher arguments
    #[serde(default)]
    pub args: Vec<Value>,
    /// Use the negative form
    #[serde(default)]
    pub not: bool,
    /// Optional label for reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpectationSpec {
    /// Create a positive expectation with no arguments
    #[must_use]
    pub fn new(selector: impl Into<String>, matcher: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            matcher: matcher.into(),
            args: Vec::new(),
            not: false,
            description: None,
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Use the negative form
    #[must_use]
    pub const fn negated(mut self) -> Self {
        self.not = true;
        self
    }

    /// Short label: description, or `selector not matcher(args)`
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        let args = self
            .args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let not = if self.not { " not" } else { "" };
        format!("{}{not} {}({args})", self.selector, self.matcher)
    }
}

/// A named list of expectations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name
    #[serde(default = "default_suite_name")]
    pub name: String,
    /// Stop after the first failure
    #[serde(default)]
    pub fail_fast: bool,
    /// Expectations, evaluated in order
    #[serde(default)]
    pub expectations: Vec<ExpectationSpec>,
}

fn default_suite_name() -> String {
    "unnamed suite".to_string()
}

/// Outcome of one expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// Label of the expectation
    pub label: String,
    /// Whether it passed
    pub pass: bool,
    /// Matcher message, or the build error
    pub message: String,
}

/// Results of a suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite: String,
    /// Per-expectation results, in order
    pub results: Vec<ExpectationResult>,
    /// Expectations that passed
    pub passed: usize,
    /// Expectations that failed
    pub failed: usize,
    /// Expectations not run because of `fail_fast`
    pub skipped: usize,
}

impl SuiteReport {
    /// Whether every expectation ran and passed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> MatcherResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail_fast: false,
            expectations: Vec::new(),
        }
    }

    /// Append an expectation
    #[must_use]
    pub fn expectation(mut self, spec: ExpectationSpec) -> Self {
        self.expectations.push(spec);
        self
    }

    /// Parse a suite from YAML
    pub fn from_yaml(yaml: &str) -> MatcherResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| MatcherError::SuiteParse {
            message: e.to_string(),
        })
    }

    /// Read a suite file
    pub fn from_file(path: impl AsRef<Path>) -> MatcherResult<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> MatcherResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| MatcherError::SuiteParse {
            message: e.to_string(),
        })
    }

    /// Build every matcher up front, failing on the first bad entry
    pub fn validate(&self, registry: &MatcherRegistry) -> MatcherResult<()> {
        for spec in &self.expectations {
            HtmlDocument::parse_selector(&spec.selector)?;
            registry.build(&spec.matcher, &spec.args)?;
        }
        Ok(())
    }

    /// Evaluate every expectation against `doc`.
    ///
    /// Build errors (unknown matcher, bad arguments, bad selector) count as
    /// failures of that expectation rather than aborting the run.
    pub fn run(&self, doc: &HtmlDocument, registry: &MatcherRegistry) -> SuiteReport {
        tracing::info!(
            suite = %self.name,
            expectations = self.expectations.len(),
            "running suite"
        );
        let mut report = SuiteReport {
            suite: self.name.clone(),
            results: Vec::with_capacity(self.expectations.len()),
            passed: 0,
            failed: 0,
            skipped: 0,
        };
        for (i, spec) in self.expectations.iter().enumerate() {
            if self.fail_fast && report.failed > 0 {
                report.skipped = self.expectations.len() - i;
                break;
            }
            let outcome = evaluate(spec, doc, registry);
            if outcome.pass {
                report.passed += 1;
            } else {
                report.failed += 1;
            }
            report.results.push(ExpectationResult {
                label: spec.label(),
                pass: outcome.pass,
                message: outcome.message,
            });
        }
        tracing::info!(
            suite = %self.name,
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            "suite finished"
        );
        report
    }
}

/// Evaluate one expectation; build errors become failed outcomes
pub fn evaluate(
    spec: &ExpectationSpec,
    doc: &HtmlDocument,
    registry: &MatcherRegistry,
) -> MatchOutcome {
    let built = doc
        .try_select(&spec.selector)
        .and_then(|selection| Ok((selection, registry.build(&spec.matcher, &spec.args)?)));
    match built {
        Ok((selection, matcher)) if spec.not => matcher.negative_compare(&selection),
        Ok((selection, matcher)) => matcher.compare(&selection),
        Err(err) => MatchOutcome::new(false, err.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"
        <html><body>
          <h1 id="title">Hello</h1>
          <div class="banner" style="display: none">Sale</div>
          <ul><li>a</li><li>b</li></ul>
        </body></html>
    "#;

    const SUITE: &str = r##"
name: landing page
expectations:
  - selector: "#title"
    matcher: toHaveText
    args: ["ell"]
  - selector: ".banner"
    matcher: toBeVisible
    not: true
  - selector: li
    matcher: toHaveLength
    args: [2]
  - selector: ul
    matcher: toHaveDescendantWithText
    args: ["li", {pattern: "^a"}]
"##;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_from_yaml() {
            let suite = Suite::from_yaml(SUITE).unwrap();
            assert_eq!(suite.name, "landing page");
            assert!(!suite.fail_fast);
            assert_eq!(suite.expectations.len(), 4);
            assert!(suite.expectations[1].not);
            assert_eq!(suite.expectations[2].args, vec![json!(2)]);
        }

        #[test]
        fn test_defaults() {
            let suite = Suite::from_yaml("expectations: []").unwrap();
            assert_eq!(suite.name, "unnamed suite");
        }

        #[test]
        fn test_parse_error() {
            let err = Suite::from_yaml("expectations: 3").unwrap_err();
            assert!(matches!(err, MatcherError::SuiteParse { .. }));
        }

        #[test]
        fn test_yaml_round_trip_of_builder() {
            let suite = Suite::new("built")
                .expectation(ExpectationSpec::new("p", "toHaveClass").arg("lead"));
            let parsed = Suite::from_yaml(&suite.to_yaml().unwrap()).unwrap();
            assert_eq!(parsed, suite);
        }

        #[test]
        fn test_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, SUITE).unwrap();
            assert_eq!(Suite::from_file(&path).unwrap().expectations.len(), 4);
        }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn test_run_all_pass() {
            let doc = HtmlDocument::parse(PAGE);
            let report = Suite::from_yaml(SUITE)
                .unwrap()
                .run(&doc, &MatcherRegistry::with_defaults());
            assert_eq!(report.passed, 4, "{report:?}");
            assert!(report.all_passed());
        }

        #[test]
        fn test_build_errors_fail_the_expectation() {
            let doc = HtmlDocument::parse(PAGE);
            let suite = Suite::new("bad")
                .expectation(ExpectationSpec::new("h1", "toSparkle"))
                .expectation(ExpectationSpec::new("h1[", "toExist"))
                .expectation(ExpectationSpec::new("h1", "toExist"));
            let report = suite.run(&doc, &MatcherRegistry::with_defaults());
            assert_eq!(report.failed, 2);
            assert_eq!(report.passed, 1);
            assert!(report.results[0].message.contains("Unknown matcher"));
            assert!(report.results[1].message.contains("Invalid selector"));
        }

        #[test]
        fn test_fail_fast_skips_rest() {
            let doc = HtmlDocument::parse(PAGE);
            let mut suite = Suite::new("ff")
                .expectation(ExpectationSpec::new("h1", "toBeHidden"))
                .expectation(ExpectationSpec::new("h1", "toExist"))
                .expectation(ExpectationSpec::new("h1", "toExist"));
            suite.fail_fast = true;
            let report = suite.run(&doc, &MatcherRegistry::with_defaults());
            assert_eq!(report.failed, 1);
            assert_eq!(report.skipped, 2);
            assert!(!report.all_passed());
        }

        #[test]
        fn test_validate() {
            let registry = MatcherRegistry::with_defaults();
            assert!(Suite::from_yaml(SUITE).unwrap().validate(&registry).is_ok());
            let bad = Suite::new("bad").expectation(ExpectationSpec::new("p", "toHaveLength"));
            assert!(matches!(
                bad.validate(&registry),
                Err(MatcherError::InvalidArguments { .. })
            ));
        }

        #[test]
        fn test_report_json() {
            let doc = HtmlDocument::parse(PAGE);
            let suite = Suite::new("j").expectation(ExpectationSpec::new("h1", "toExist").negated());
            let report = suite.run(&doc, &MatcherRegistry::with_defaults());
            let json: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
            assert_eq!(json["failed"], 1);
            assert_eq!(json["results"][0]["label"], "h1 not toExist()");
            assert_eq!(json["results"][0]["message"], "Expected element not to exist");
        }
    }
}
