//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use shopcheck::{LocatorStrategy, ScreenshotPolicy, Suite};
use std::path::PathBuf;

/// Shopcheck: page-object browser tests for the MyBook.ba storefront
#[derive(Parser, Debug)]
#[command(name = "shopcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures and summary only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the scenario catalog
    List(ListArgs),

    /// Run scenarios in Chromium
    Run(RunArgs),

    /// Print the resolved configuration as YAML
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only scenarios of this suite
    #[arg(short, long)]
    pub suite: Option<SuiteArg>,

    /// Only scenarios whose id or title contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Only scenarios whose id or title contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only scenarios of this suite
    #[arg(short, long)]
    pub suite: Option<SuiteArg>,

    /// Scenarios run at once
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Extra attempts after a failure
    #[arg(long)]
    pub retries: Option<u32>,

    /// Locator catalog
    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    /// Storefront root URL
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Run Chromium without its sandbox (containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Screenshot capture policy
    #[arg(long)]
    pub screenshots: Option<ScreenshotArg>,

    /// YAML configuration file
    #[arg(short, long, env = "SHOPCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report and screenshot directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write junit.xml
    #[arg(long)]
    pub junit: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML configuration file to resolve
    #[arg(short, long, env = "SHOPCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the default configuration to this file instead
    #[arg(long)]
    pub init: Option<PathBuf>,
}

/// Suite selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteArg {
    /// TC_01 to TC_05
    Smoke,
    /// TC_06 to TC_15
    Functional,
}

impl From<SuiteArg> for Suite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Smoke => Self::Smoke,
            SuiteArg::Functional => Self::Functional,
        }
    }
}

/// Locator catalog selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    /// CSS class and attribute selectors
    Structural,
    /// ARIA roles and visible text
    Semantic,
}

impl From<StrategyArg> for LocatorStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Structural => Self::Structural,
            StrategyArg::Semantic => Self::Semantic,
        }
    }
}

/// Screenshot policy selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenshotArg {
    /// Never
    Off,
    /// After a failed attempt
    OnlyOnFailure,
    /// After every attempt
    Always,
}

impl From<ScreenshotArg> for ScreenshotPolicy {
    fn from(arg: ScreenshotArg) -> Self {
        match arg {
            ScreenshotArg::Off => Self::Off,
            ScreenshotArg::OnlyOnFailure => Self::OnlyOnFailure,
            ScreenshotArg::Always => Self::Always,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
