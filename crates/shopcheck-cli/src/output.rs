//! Terminal output and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use shopcheck::{OutcomeHook, Reporter, ScenarioOutcome, Status};
use std::sync::Arc;

/// Progress and result printing for a suite run
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Hook for the runner: one line per executed scenario
    #[must_use]
    pub fn outcome_hook(&self) -> OutcomeHook {
        let reporter = self.clone();
        Arc::new(move |outcome: &ScenarioOutcome| {
            if outcome.status == Status::Skipped {
                return;
            }
            let line = reporter.outcome_line(outcome);
            match &reporter.progress_bar {
                Some(pb) => {
                    pb.println(line);
                    pb.inc(1);
                }
                None if outcome.status.is_failed() || !reporter.quiet => {
                    let _ = reporter.term.write_line(&line);
                }
                None => {}
            }
        })
    }

    fn outcome_line(&self, outcome: &ScenarioOutcome) -> String {
        let label = format!("{}: {}", outcome.id, outcome.title);
        let timing = format!("({}ms)", outcome.duration_ms);
        let prefix = match (outcome.status, self.use_color) {
            (Status::Passed, true) => style("✓").green().bold().to_string(),
            (Status::Failed, true) => style("✗").red().bold().to_string(),
            (Status::Flaky, true) => style("~").yellow().bold().to_string(),
            (Status::Skipped, true) => style("-").dim().to_string(),
            (status, false) => status.as_str().to_uppercase(),
        };
        let mut line = format!("{prefix} {label} {timing}");
        if let (Status::Failed | Status::Flaky, Some(error)) = (outcome.status, &outcome.error) {
            line.push_str(&format!("\n    {error}"));
        }
        line
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print the run summary; failures are listed even in quiet mode
    pub fn summary(&self, report: &Reporter) {
        let failed = report.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");
        for outcome in report.failures() {
            let _ = self.term.write_line(&self.outcome_line(outcome));
            if let Some(shot) = outcome.failure_screenshot() {
                let _ = self
                    .term
                    .write_line(&format!("    screenshot: {}", shot.display()));
            }
        }

        let secs = report.total_duration().as_secs_f64();
        let executed = report.executed_count();
        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let flaky_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            let _ = self.term.write_line(&format!(
                "{status} {executed} scenarios in {secs:.2}s ({} passed, {} failed, {} flaky, {} skipped)",
                passed_style.apply_to(report.passed_count()),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                flaky_style.apply_to(report.flaky_count()),
                report.skipped_count(),
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {executed} scenarios in {secs:.2}s ({} passed, {failed} failed, {} flaky, {} skipped)",
                report.passed_count(),
                report.flaky_count(),
                report.skipped_count(),
            ));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use shopcheck::catalog;

    fn outcome(status: Status, error: Option<&str>) -> ScenarioOutcome {
        let mut outcome = ScenarioOutcome::new(&catalog()[0], status);
        outcome.duration_ms = 1200;
        outcome.error = error.map(str::to_string);
        outcome
    }

    #[test]
    fn test_plain_outcome_line() {
        let reporter = ProgressReporter::new(false, false);
        let line = reporter.outcome_line(&outcome(Status::Passed, None));
        assert!(line.starts_with("PASSED TC_01: "));
        assert!(line.ends_with("(1200ms)"));
    }

    #[test]
    fn test_failure_line_carries_error() {
        let reporter = ProgressReporter::new(false, true);
        let line = reporter.outcome_line(&outcome(Status::Failed, Some("badge shows 0")));
        assert!(line.starts_with("FAILED"));
        assert!(line.contains("\n    badge shows 0"));
    }

    #[test]
    fn test_quiet_skips_progress_bar() {
        let mut reporter = ProgressReporter::new(false, true);
        reporter.start_progress(15, "running");
        assert!(reporter.progress_bar.is_none());
    }

    #[test]
    fn test_hook_counts_executed_scenarios() {
        let mut reporter = ProgressReporter::new(false, false);
        reporter.start_progress(2, "running");
        let hook = reporter.outcome_hook();
        hook(&outcome(Status::Passed, None));
        hook(&ScenarioOutcome::skipped(&catalog()[1]));
        assert_eq!(reporter.progress_bar.as_ref().unwrap().position(), 1);
    }
}
