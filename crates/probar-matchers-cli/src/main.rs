//! dommatch: run Probar DOM matchers from the command line
//!
//! ## Usage
//!
//! ```bash
//! dommatch run suite.yaml --html page.html            # Run a suite
//! dommatch run suite.yaml --html page.html --format json
//! dommatch check page.html -s h1 -m toHaveText -a Hello
//! dommatch check page.html -s '#menu' -m toBeVisible --not
//! dommatch list                                       # Registered matchers
//! ```

use clap::Parser;
use dommatch::{
    run_check, run_suite, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands,
    OutputFormat, Reporter, Verbosity,
};
use probar_matchers::MatcherRegistry;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_expectation_failure() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let mut config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => {
            config = config
                .with_fail_fast(args.fail_fast)
                .with_format(args.format.into());
            let report = run_suite(&config, &args)?;
            print!("{}", reporter(&config).suite(&report)?);
            if report.all_passed() {
                Ok(())
            } else {
                Err(CliError::ExpectationsFailed {
                    failed: report.failed,
                })
            }
        }
        Commands::Check(args) => {
            config = config.with_format(args.format.into());
            let outcome = run_check(&args)?;
            print!("{}", reporter(&config).outcome(&outcome)?);
            if outcome.pass {
                Ok(())
            } else {
                Err(CliError::ExpectationsFailed { failed: 1 })
            }
        }
        Commands::List => {
            let registry = MatcherRegistry::with_defaults();
            print!("{}", reporter(&config).matcher_list(registry.names())?);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_format(OutputFormat::Text)
}

fn reporter(config: &CliConfig) -> Reporter {
    Reporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet(),
        config.format,
    )
}

fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| verbosity.log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
