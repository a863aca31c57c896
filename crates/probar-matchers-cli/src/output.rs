//! Output formatting for suite reports and single checks

use console::style;
use probar_matchers::{MatchOutcome, SuiteReport};
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Renders results for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode: passing lines are omitted
    pub quiet: bool,
    /// Report format
    pub format: OutputFormat,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false, false, OutputFormat::Text)
    }
}

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub const fn new(use_color: bool, quiet: bool, format: OutputFormat) -> Self {
        Self {
            use_color,
            quiet,
            format,
        }
    }

    fn status(&self, pass: bool) -> String {
        match (pass, self.use_color) {
            (true, true) => style("✓").green().bold().to_string(),
            (false, true) => style("✗").red().bold().to_string(),
            (true, false) => "PASS".to_string(),
            (false, false) => "FAIL".to_string(),
        }
    }

    /// Render a suite report
    pub fn suite(&self, report: &SuiteReport) -> CliResult<String> {
        if self.format == OutputFormat::Json {
            return Ok(report.to_json()?);
        }
        let mut out = String::new();
        if !self.quiet {
            let title = if self.use_color {
                style(&report.suite).bold().to_string()
            } else {
                report.suite.clone()
            };
            out.push_str(&format!("{title}\n"));
        }
        for result in &report.results {
            if result.pass && self.quiet {
                continue;
            }
            out.push_str(&format!("{} {}\n", self.status(result.pass), result.label));
            if !result.pass {
                out.push_str(&format!("    {}\n", result.message));
            }
        }
        out.push_str(&self.summary(report));
        Ok(out)
    }

    fn summary(&self, report: &SuiteReport) -> String {
        let mut line = format!("{} passed, {} failed", report.passed, report.failed);
        if report.skipped > 0 {
            line.push_str(&format!(", {} skipped", report.skipped));
        }
        if !self.use_color {
            return format!("{line}\n");
        }
        if report.all_passed() {
            format!("{}\n", style(line).green())
        } else {
            format!("{}\n", style(line).red())
        }
    }

    /// Render a single matcher outcome
    pub fn outcome(&self, outcome: &MatchOutcome) -> CliResult<String> {
        if self.format == OutputFormat::Json {
            return to_json(outcome);
        }
        Ok(format!("{} {}\n", self.status(outcome.pass), outcome.message))
    }

    /// Render the registered matcher names
    pub fn matcher_list<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> CliResult<String> {
        let names: Vec<&str> = names.into_iter().collect();
        if self.format == OutputFormat::Json {
            return to_json(&names);
        }
        Ok(names.iter().map(|name| format!("{name}\n")).collect())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| probar_matchers::MatcherError::from(e).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use probar_matchers::ExpectationResult;

    fn report() -> SuiteReport {
        SuiteReport {
            suite: "landing".to_string(),
            results: vec![
                ExpectationResult {
                    label: "h1 toExist()".to_string(),
                    pass: true,
                    message: "Expected element to exist".to_string(),
                },
                ExpectationResult {
                    label: "h1 toHaveText(\"Bye\")".to_string(),
                    pass: false,
                    message: "Expected element to have text 'Bye', but had 'Hello'".to_string(),
                },
            ],
            passed: 1,
            failed: 1,
            skipped: 0,
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_suite_text() {
            let text = Reporter::default().suite(&report()).unwrap();
            assert!(text.starts_with("landing\n"));
            assert!(text.contains("PASS h1 toExist()"));
            assert!(text.contains("FAIL h1 toHaveText(\"Bye\")"));
            assert!(text.contains("    Expected element to have text 'Bye', but had 'Hello'"));
            assert!(text.ends_with("1 passed, 1 failed\n"));
        }

        #[test]
        fn test_quiet_omits_passes() {
            let reporter = Reporter::new(false, true, OutputFormat::Text);
            let text = reporter.suite(&report()).unwrap();
            assert!(!text.contains("PASS"));
            assert!(!text.contains("landing"));
            assert!(text.contains("FAIL"));
        }

        #[test]
        fn test_skipped_in_summary() {
            let mut r = report();
            r.skipped = 3;
            let text = Reporter::default().suite(&r).unwrap();
            assert!(text.ends_with("1 passed, 1 failed, 3 skipped\n"));
        }

        #[test]
        fn test_outcome_text() {
            let outcome = MatchOutcome::new(true, "Expected element to be visible");
            let text = Reporter::default().outcome(&outcome).unwrap();
            assert_eq!(text, "PASS Expected element to be visible\n");
        }

        #[test]
        fn test_matcher_list_text() {
            let text = Reporter::default().matcher_list(["toExist", "toHaveId"]).unwrap();
            assert_eq!(text, "toExist\ntoHaveId\n");
        }
    }

    mod json_tests {
        use super::*;

        fn json_reporter() -> Reporter {
            Reporter::new(false, false, OutputFormat::Json)
        }

        #[test]
        fn test_suite_json() {
            let text = json_reporter().suite(&report()).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(value["passed"], 1);
            assert_eq!(value["results"][1]["pass"], false);
        }

        #[test]
        fn test_outcome_json() {
            let outcome = MatchOutcome::new(false, "Expected element to exist");
            let text = json_reporter().outcome(&outcome).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(value["pass"], false);
            assert_eq!(value["message"], "Expected element to exist");
        }

        #[test]
        fn test_matcher_list_json() {
            let text = json_reporter().matcher_list(["toExist"]).unwrap();
            let value: Vec<String> = serde_json::from_str(&text).unwrap();
            assert_eq!(value, vec!["toExist"]);
        }
    }
}
