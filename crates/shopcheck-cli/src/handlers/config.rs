//! Config command handler

use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::ConfigArgs;
use shopcheck::SuiteConfig;
use std::path::Path;

const MASK: &str = "********";

/// Print the resolved configuration, or write a starter file with `--init`
pub fn execute_config(output: &ProgressReporter, args: &ConfigArgs) -> CliResult<()> {
    if let Some(path) = &args.init {
        write_default(path)?;
        output.info(&format!("Wrote default configuration to {}", path.display()));
        return Ok(());
    }

    let config = SuiteConfig::load(args.config.as_deref())?;
    print!("{}", masked_yaml(&config)?);
    Ok(())
}

/// YAML rendering with the password replaced
pub fn masked_yaml(config: &SuiteConfig) -> CliResult<String> {
    let mut shown = config.clone();
    if !shown.credentials.password.is_empty() {
        shown.credentials.password = MASK.to_string();
    }
    Ok(shown.to_yaml()?)
}

fn write_default(path: &Path) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::invalid_argument(format!(
            "{} already exists",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, SuiteConfig::default().to_yaml()?)?;
    Ok(())
}
