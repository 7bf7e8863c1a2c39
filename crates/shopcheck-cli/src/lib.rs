//! Shopcheck CLI library
//!
//! Command-line runner for the storefront scenario suite.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod logging;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ListArgs, RunArgs, ScreenshotArg, StrategyArg, SuiteArg,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_tracing;
pub use output::ProgressReporter;
