//! Shopcheck: storefront browser suite runner
//!
//! ## Usage
//!
//! ```bash
//! shopcheck list --suite smoke          # Show the smoke scenarios
//! shopcheck run                         # Run all fifteen scenarios
//! shopcheck run --filter cart --junit   # Cart scenarios, plus junit.xml
//! shopcheck config --init shopcheck.yaml
//! ```

use clap::Parser;
use shopcheck_cli::{
    handlers, init_tracing, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands,
    ProgressReporter, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ CliError::ScenariosFailed { .. }) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    let mut output =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    match cli.command {
        Commands::List(args) => {
            handlers::execute_list(&args);
            Ok(())
        }
        Commands::Run(args) => handlers::execute_run(&mut output, &args),
        Commands::Config(args) => handlers::execute_config(&output, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(ColorChoice::from(cli.color))
        .with_json_logs(cli.log_json)
}
