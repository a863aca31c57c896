//! Command execution: load inputs, evaluate matchers

use probar_matchers::{
    evaluate, ExpectationSpec, HtmlDocument, MatchOutcome, MatcherRegistry, Suite, SuiteReport,
};
use serde_json::Value;

use crate::commands::{CheckArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Parse a command-line matcher argument.
///
/// Valid JSON (`3`, `true`, `{"width": "auto"}`) is used as is; anything
/// else becomes a JSON string.
#[must_use]
pub fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Load and run a suite; `--fail-fast` on the command line or in the
/// config overrides the suite file
pub fn run_suite(config: &CliConfig, args: &RunArgs) -> CliResult<SuiteReport> {
    let mut suite = Suite::from_file(&args.suite)?;
    suite.fail_fast |= config.fail_fast || args.fail_fast;
    let doc = HtmlDocument::from_file(&args.html)?;
    tracing::debug!(
        suite = %args.suite.display(),
        html = %args.html.display(),
        "loaded inputs"
    );
    Ok(suite.run(&doc, &MatcherRegistry::with_defaults()))
}

/// Evaluate a single matcher.
///
/// Unlike suites, a bad matcher name, arguments or selector is an error
/// here rather than a failed outcome.
pub fn run_check(args: &CheckArgs) -> CliResult<MatchOutcome> {
    let registry = MatcherRegistry::with_defaults();
    if !registry.contains(&args.matcher) {
        return Err(CliError::invalid_argument(format!(
            "unknown matcher '{}' (see `dommatch list`)",
            args.matcher
        )));
    }
    let mut spec = ExpectationSpec::new(&args.selector, &args.matcher);
    spec.args = args.args.iter().map(|raw| parse_arg(raw)).collect();
    spec.not = args.not;
    registry.build(&spec.matcher, &spec.args)?;
    HtmlDocument::parse_selector(&spec.selector)?;

    let doc = HtmlDocument::from_file(&args.html)?;
    Ok(evaluate(&spec, &doc, &registry))
}
