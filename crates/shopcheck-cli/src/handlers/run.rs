//! Run command handler

use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use crate::RunArgs;
use shopcheck::{scenarios, DriverFactory, Suite, SuiteConfig, SuiteRunner};
use std::sync::Arc;
use tracing::{info, warn};

/// Run the selected scenarios and write the reports
pub fn execute_run(output: &mut ProgressReporter, args: &RunArgs) -> CliResult<()> {
    let config = resolve_config(args)?;
    let suite = args.suite.map(Suite::from);
    let selected = scenarios::select(suite, args.filter.as_deref());
    if selected.is_empty() {
        return Err(CliError::invalid_argument(
            "no scenario matches the given suite and filter",
        ));
    }

    output.info(&format!(
        "Running {} scenarios against {} ({} workers)",
        selected.len(),
        config.base_url,
        config.workers
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output_dir = config.output_dir.clone();
    let report = runtime.block_on(async {
        let factory = launch(&config).await?;
        output.start_progress(selected.len() as u64, "scenarios");
        let runner = SuiteRunner::new(Arc::clone(&factory), config)
            .with_suite(suite)
            .with_filter(args.filter.clone())
            .with_outcome_hook(output.outcome_hook());
        let report = runner.run(&scenarios::catalog()).await;
        output.finish();
        if let Err(e) = factory.shutdown().await {
            warn!(error = %e, "browser shutdown failed");
        }
        Ok::<_, CliError>(report)
    })?;

    let files = report
        .write_all(&output_dir, args.junit)
        .map_err(|e| CliError::report_generation(e.to_string()))?;
    info!(json = %files.json.display(), "reports written");

    output.summary(&report);
    output.info(&format!("Report: {}", files.html.display()));
    if let Some(junit) = &files.junit {
        output.info(&format!("JUnit: {}", junit.display()));
    }

    let failed = report.failed_count();
    if failed > 0 {
        return Err(CliError::ScenariosFailed {
            failed,
            executed: report.executed_count(),
        });
    }
    Ok(())
}

/// File and environment configuration with command-line overrides applied
pub fn resolve_config(args: &RunArgs) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::load(args.config.as_deref())?;
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(retries) = args.retries {
        config = config.with_retries(retries);
    }
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy.into());
    }
    if let Some(policy) = args.screenshots {
        config = config.with_screenshots(policy.into());
    }
    if let Some(dir) = &args.output {
        config = config.with_output_dir(dir);
    }
    if args.headed {
        config.browser.headless = false;
    }
    if args.no_sandbox {
        config.browser.sandbox = false;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "browser")]
async fn launch(config: &SuiteConfig) -> CliResult<Arc<dyn DriverFactory>> {
    let launcher = shopcheck::ChromiumLauncher::launch(&config.browser).await?;
    Ok(Arc::new(launcher))
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn launch(_config: &SuiteConfig) -> CliResult<Arc<dyn DriverFactory>> {
    Err(CliError::config(
        "browser support not enabled. Rebuild with --features browser",
    ))
}
