//! Suite runner.
//!
//! Each scenario gets its own page from the [`DriverFactory`], cookies are
//! cleared before and after every attempt, and the attempt is bounded by
//! the scenario timeout. Up to `workers` scenarios run at once.

use crate::base_page::BasePage;
use crate::config::{ScreenshotPolicy, SuiteConfig};
use crate::driver::{DriverFactory, SharedDriver};
use crate::reporter::{Reporter, ScenarioOutcome, Status};
use crate::result::{ShopError, ShopResult};
use crate::scenario::{Scenario, ScenarioContext, Suite};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Called as each scenario finishes
pub type OutcomeHook = Arc<dyn Fn(&ScenarioOutcome) + Send + Sync>;

/// Runs scenarios against pages from a driver factory
#[derive(Clone)]
pub struct SuiteRunner {
    factory: Arc<dyn DriverFactory>,
    config: Arc<SuiteConfig>,
    suite: Option<Suite>,
    filter: Option<String>,
    on_outcome: Option<OutcomeHook>,
}

impl fmt::Debug for SuiteRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteRunner")
            .field("workers", &self.config.workers)
            .field("retries", &self.config.retries)
            .field("suite", &self.suite)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl SuiteRunner {
    #[must_use]
    pub fn new(factory: Arc<dyn DriverFactory>, config: SuiteConfig) -> Self {
        Self {
            factory,
            config: Arc::new(config),
            suite: None,
            filter: None,
            on_outcome: None,
        }
    }

    /// Only run scenarios of `suite`
    #[must_use]
    pub const fn with_suite(mut self, suite: Option<Suite>) -> Self {
        self.suite = suite;
        self
    }

    /// Only run scenarios whose id or title contains `filter`
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_outcome_hook(mut self, hook: OutcomeHook) -> Self {
        self.on_outcome = Some(hook);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Whether `scenario` passes the suite and filter selection
    #[must_use]
    pub fn selects(&self, scenario: &Scenario) -> bool {
        self.suite.map_or(true, |s| scenario.suite == s)
            && self.filter.as_deref().map_or(true, |f| scenario.matches(f))
    }

    /// Run the selected scenarios; the others are reported as skipped.
    ///
    /// Outcomes keep the order of `scenarios` regardless of completion order.
    pub async fn run(&self, scenarios: &[Scenario]) -> Reporter {
        let workers = self.config.workers.max(1);
        info!(
            total = scenarios.len(),
            workers,
            retries = self.config.retries,
            "suite started"
        );

        let mut outcomes: Vec<(usize, ScenarioOutcome)> = stream::iter(scenarios.iter().enumerate())
            .map(|(index, scenario)| async move {
                let outcome = if self.selects(scenario) {
                    self.run_scenario(scenario).await
                } else {
                    ScenarioOutcome::skipped(scenario)
                };
                if let Some(hook) = &self.on_outcome {
                    hook(&outcome);
                }
                (index, outcome)
            })
            .buffer_unordered(workers)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let reporter = Reporter::with_outcomes(
            self.config.base_url.clone(),
            outcomes.into_iter().map(|(_, o)| o).collect(),
        );
        info!(summary = %reporter.summary(), "suite finished");
        reporter
    }

    /// Run one scenario with retries
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioOutcome {
        let started = Instant::now();
        let mut outcome = ScenarioOutcome::new(scenario, Status::Failed);
        let max_attempts = self.config.retries.saturating_add(1);

        loop {
            outcome.attempts += 1;
            let attempt = outcome.attempts;
            info!(scenario = scenario.id, attempt, "scenario started");

            let (result, shots) = self.attempt(scenario).await;
            outcome.screenshots.extend(shots);

            match result {
                Ok(()) => {
                    outcome.status = if attempt > 1 {
                        Status::Flaky
                    } else {
                        Status::Passed
                    };
                    break;
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(scenario = scenario.id, attempt, error = %e, "retrying scenario");
                    outcome.error = Some(e.to_string());
                }
                Err(e) => {
                    if matches!(e, ShopError::RateLimited { .. }) {
                        warn!(scenario = scenario.id, error = %e, "rate limited, not retrying");
                    }
                    outcome.status = Status::Failed;
                    outcome.error = Some(e.to_string());
                    break;
                }
            }
        }

        outcome.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            scenario = scenario.id,
            status = outcome.status.as_str(),
            attempts = outcome.attempts,
            duration_ms = outcome.duration_ms,
            "scenario finished"
        );
        outcome
    }

    /// One attempt on a fresh page; returns the result and screenshots taken
    async fn attempt(&self, scenario: &Scenario) -> (ShopResult<()>, Vec<PathBuf>) {
        let driver = match self.factory.open_page().await {
            Ok(driver) => driver,
            Err(e) => return (Err(e), Vec::new()),
        };
        let base = BasePage::new(Arc::clone(&driver), Arc::clone(&self.config));

        let result = match driver.clear_cookies().await {
            Ok(()) => self.bounded(scenario, base.clone()).await,
            Err(e) => Err(e),
        };

        let mut shots = Vec::new();
        let label = match (&result, self.config.screenshots) {
            (Err(_), ScreenshotPolicy::OnlyOnFailure | ScreenshotPolicy::Always) => Some("failure"),
            (Ok(()), ScreenshotPolicy::Always) => Some("final"),
            _ => None,
        };
        if let Some(label) = label {
            match base.take_screenshot(&format!("{}-{label}", scenario.id)).await {
                Ok(path) => shots.push(path),
                Err(e) => warn!(scenario = scenario.id, error = %e, "screenshot failed"),
            }
        }

        release(&driver, scenario).await;
        (result, shots)
    }

    async fn bounded(&self, scenario: &Scenario, base: BasePage) -> ShopResult<()> {
        let timeout = self.config.timeouts.scenario();
        let ctx = ScenarioContext::new(scenario.id, base);
        match tokio::time::timeout(timeout, scenario.run(ctx)).await {
            Ok(result) => result,
            Err(_) => Err(ShopError::ScenarioTimeout {
                scenario: scenario.id.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

async fn release(driver: &SharedDriver, scenario: &Scenario) {
    if let Err(e) = driver.clear_cookies().await {
        warn!(scenario = scenario.id, error = %e, "clear cookies after scenario failed");
    }
    if let Err(e) = driver.close().await {
        warn!(scenario = scenario.id, error = %e, "page close failed");
    }
}
