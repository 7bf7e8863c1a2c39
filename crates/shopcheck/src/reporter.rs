//! Reporter - scenario outcomes and the files they are published as.
//!
//! ```text
//! SuiteRunner ──ScenarioOutcome──▶ Reporter ──▶ summary / list (terminal)
//!                                           ├─▶ results.json
//!                                           ├─▶ report.html  (failure screenshots inlined)
//!                                           └─▶ junit.xml    (optional)
//! ```

use crate::result::ShopResult;
use crate::scenario::{Scenario, Suite};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Scenario status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Passed on the first attempt
    Passed,
    /// Failed on every attempt
    Failed,
    /// Failed at least once, then passed on a retry
    Flaky,
    /// Not run
    Skipped,
}

impl Status {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Passed or flaky
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Passed | Self::Flaky)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Flaky => "flaky",
            Self::Skipped => "skipped",
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Passed => "✓",
            Self::Failed => "✗",
            Self::Flaky => "~",
            Self::Skipped => "-",
        }
    }
}

/// Final result of one scenario across its attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub id: String,
    pub title: String,
    pub suite: Suite,
    pub status: Status,
    /// Attempts made, 0 when skipped
    pub attempts: u32,
    /// Wall time over all attempts
    pub duration_ms: u64,
    /// Last error, for failed and flaky scenarios
    pub error: Option<String>,
    /// Screenshots written during the scenario
    pub screenshots: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
}

impl ScenarioOutcome {
    /// Outcome with no attempts yet
    #[must_use]
    pub fn new(scenario: &Scenario, status: Status) -> Self {
        Self {
            id: scenario.id.to_string(),
            title: scenario.title.to_string(),
            suite: scenario.suite,
            status,
            attempts: 0,
            duration_ms: 0,
            error: None,
            screenshots: Vec::new(),
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn skipped(scenario: &Scenario) -> Self {
        Self::new(scenario, Status::Skipped)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Screenshot taken when the scenario failed, if any
    #[must_use]
    pub fn failure_screenshot(&self) -> Option<&Path> {
        self.screenshots
            .iter()
            .find(|p| {
                p.file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| s.ends_with("-failure"))
            })
            .map(PathBuf::as_path)
    }
}

/// Files written by [`Reporter::write_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub json: PathBuf,
    pub html: PathBuf,
    pub junit: Option<PathBuf>,
}

/// Collected outcomes of one suite run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reporter {
    /// Identifies one run across its report files
    #[serde(default)]
    run_id: Uuid,
    suite_name: String,
    outcomes: Vec<ScenarioOutcome>,
}

impl Reporter {
    #[must_use]
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self::with_outcomes(suite_name, Vec::new())
    }

    /// Reporter over existing outcomes
    #[must_use]
    pub fn with_outcomes(suite_name: impl Into<String>, outcomes: Vec<ScenarioOutcome>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            suite_name: suite_name.into(),
            outcomes,
        }
    }

    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }

    fn count(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(Status::Passed)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(Status::Failed)
    }

    #[must_use]
    pub fn flaky_count(&self) -> usize {
        self.count(Status::Flaky)
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(Status::Skipped)
    }

    /// Scenarios that ran
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.outcomes.len() - self.skipped_count()
    }

    /// Passed or flaky over executed, 1.0 when nothing ran
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.executed_count();
        if executed == 0 {
            return 1.0;
        }
        (self.passed_count() + self.flaky_count()) as f64 / executed as f64
    }

    /// No scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.outcomes.iter().map(ScenarioOutcome::duration).sum()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed()).collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} flaky, {} skipped ({:.1}% of {} run) in {:.1}s",
            self.suite_name,
            self.passed_count(),
            self.failed_count(),
            self.flaky_count(),
            self.skipped_count(),
            self.pass_rate() * 100.0,
            self.executed_count(),
            self.total_duration().as_secs_f64()
        )
    }

    /// One line per scenario, then failure details
    #[must_use]
    pub fn render_list(&self) -> String {
        let mut out = String::new();
        for o in &self.outcomes {
            let _ = writeln!(
                out,
                "  {} {} {} ({:.1}s{})",
                o.status.symbol(),
                o.id,
                o.title,
                o.duration().as_secs_f64(),
                if o.attempts > 1 {
                    format!(", {} attempts", o.attempts)
                } else {
                    String::new()
                }
            );
        }
        let failures = self.failures();
        if !failures.is_empty() {
            out.push('\n');
            for o in failures {
                let _ = writeln!(out, "  {} {}", o.id, o.error.as_deref().unwrap_or("failed"));
                if let Some(shot) = o.failure_screenshot() {
                    let _ = writeln!(out, "    screenshot: {}", shot.display());
                }
            }
        }
        out.push('\n');
        out.push_str(&self.summary());
        out.push('\n');
        out
    }

    /// Pretty JSON of the whole run
    pub fn to_json(&self) -> ShopResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a `results.json`
    pub fn from_json(json: &str) -> ShopResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Browsable report with failure screenshots inlined as base64 PNG
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        html.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Storefront Test Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .progress-bar { background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }
        .ok { background: #4caf50; height: 100%; }
        .scenario { padding: 10px; margin: 5px 0; border-radius: 4px; }
        .scenario.passed { background: #e8f5e9; border-left: 4px solid #4caf50; }
        .scenario.flaky { background: #fffde7; border-left: 4px solid #fbc02d; }
        .scenario.failed { background: #ffebee; border-left: 4px solid #f44336; }
        .scenario.skipped { background: #fff3e0; border-left: 4px solid #ff9800; }
        .error { color: #d32f2f; font-family: monospace; white-space: pre-wrap; }
        details img { max-width: 640px; border: 1px solid #ddd; margin-top: 8px; }
    </style>
</head>
<body>
"#,
        );

        let _ = write!(
            html,
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>{} passed, {} failed, {} flaky, {} skipped</h2>
    <div class="progress-bar">
        <div class="ok" style="width: {:.1}%"></div>
    </div>
    <p>Duration: {:.2}s</p>
    <p>Run: {}</p>
</div>
"#,
            escape_markup(&self.suite_name),
            self.passed_count(),
            self.failed_count(),
            self.flaky_count(),
            self.skipped_count(),
            self.pass_rate() * 100.0,
            self.total_duration().as_secs_f64(),
            self.run_id
        );

        html.push_str("<h2>Scenarios</h2>\n");
        for o in &self.outcomes {
            let _ = write!(
                html,
                r#"<div class="scenario {}">
    <strong>{}</strong> {} [{}] - {} ({:.2}s, {} attempt(s))
"#,
                o.status.as_str(),
                escape_markup(&o.id),
                escape_markup(&o.title),
                o.suite,
                o.status.as_str(),
                o.duration().as_secs_f64(),
                o.attempts
            );
            if let Some(error) = &o.error {
                let _ = writeln!(html, r#"    <div class="error">{}</div>"#, escape_markup(error));
            }
            if let Some(img) = o.failure_screenshot().and_then(inline_png) {
                let _ = writeln!(
                    html,
                    r#"    <details><summary>Failure screenshot</summary><img alt="{} failure" src="{img}"></details>"#,
                    escape_markup(&o.id)
                );
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// JUnit XML for CI
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = writeln!(
            xml,
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_markup(&self.suite_name),
            self.outcomes.len(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        );

        for o in &self.outcomes {
            let _ = writeln!(
                xml,
                r#"  <testcase classname="{}" name="{}" time="{:.3}">"#,
                o.suite,
                escape_markup(&format!("{} {}", o.id, o.title)),
                o.duration().as_secs_f64()
            );
            match o.status {
                Status::Failed => {
                    let error = escape_markup(o.error.as_deref().unwrap_or("failed"));
                    let _ = writeln!(xml, r#"    <failure message="{error}">{error}</failure>"#);
                }
                Status::Skipped => xml.push_str("    <skipped/>\n"),
                Status::Flaky => {
                    let _ = writeln!(
                        xml,
                        "    <system-out>passed after {} attempts</system-out>",
                        o.attempts
                    );
                }
                Status::Passed => {}
            }
            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Write `results.json`, `report.html` and optionally `junit.xml` into `dir`
    pub fn write_all(&self, dir: &Path, junit: bool) -> ShopResult<ReportFiles> {
        std::fs::create_dir_all(dir)?;

        let json = dir.join("results.json");
        std::fs::write(&json, self.to_json()?)?;

        let html = dir.join("report.html");
        std::fs::write(&html, self.render_html())?;

        let junit = if junit {
            let path = dir.join("junit.xml");
            std::fs::write(&path, self.render_junit())?;
            Some(path)
        } else {
            None
        };

        debug!(dir = %dir.display(), "reports written");
        Ok(ReportFiles { json, html, junit })
    }
}

fn inline_png(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "screenshot not inlined");
            None
        }
    }
}

/// Escape XML/HTML special characters
fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::scenarios::catalog;

    fn outcome(index: usize, status: Status, ms: u64) -> ScenarioOutcome {
        let scenario = catalog()[index];
        let mut o = ScenarioOutcome::new(&scenario, status);
        o.attempts = u32::from(status != Status::Skipped);
        o.duration_ms = ms;
        if status == Status::Failed {
            o.error = Some("Assertion failed: cart count <2>".to_string());
        }
        o
    }

    fn sample() -> Reporter {
        let mut flaky = outcome(2, Status::Flaky, 300);
        flaky.attempts = 2;
        Reporter::with_outcomes(
            "mybook.ba",
            vec![
                outcome(0, Status::Passed, 1_000),
                outcome(1, Status::Failed, 500),
                flaky,
                outcome(3, Status::Skipped, 0),
            ],
        )
    }

    mod status_tests {
        use super::*;

        #[test]
        fn test_flags() {
            assert!(Status::Flaky.is_ok());
            assert!(!Status::Skipped.is_ok());
            assert!(Status::Failed.is_failed());
            assert_eq!(serde_json::to_string(&Status::Flaky).unwrap(), "\"flaky\"");
        }
    }

    mod counting_tests {
        use super::*;

        #[test]
        fn test_counts() {
            let r = sample();
            assert_eq!(r.passed_count(), 1);
            assert_eq!(r.failed_count(), 1);
            assert_eq!(r.flaky_count(), 1);
            assert_eq!(r.skipped_count(), 1);
            assert_eq!(r.executed_count(), 3);
            assert!(!r.all_passed());
            assert_eq!(r.total_duration(), Duration::from_millis(1_800));
            assert_eq!(r.failures()[0].id, "TC_02");
        }

        #[test]
        fn test_empty_pass_rate() {
            let r = Reporter::new("empty");
            assert!((r.pass_rate() - 1.0).abs() < f64::EPSILON);
            assert!(r.all_passed());
        }

        #[test]
        fn test_summary() {
            let summary = sample().summary();
            assert!(summary.contains("1 passed, 1 failed, 1 flaky, 1 skipped"));
            assert!(summary.contains("66.7%"));
        }

        #[test]
        fn test_render_list() {
            let list = sample().render_list();
            assert!(list.contains("✓ TC_01"));
            assert!(list.contains("✗ TC_02"));
            assert!(list.contains("2 attempts"));
            assert!(list.contains("cart count <2>"));
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_html_escapes_errors() {
            let html = sample().render_html();
            assert!(html.contains("TC_03"));
            assert!(html.contains("scenario flaky"));
            assert!(html.contains("cart count &lt;2&gt;"));
            assert!(!html.contains("<2>"));
        }

        #[test]
        fn test_html_inlines_failure_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let shot = dir.path().join("TC_02-failure.png");
            std::fs::write(&shot, crate::mock::MOCK_PNG).unwrap();
            let mut failed = outcome(1, Status::Failed, 10);
            failed.screenshots.push(shot);
            let html = Reporter::with_outcomes("s", vec![failed]).render_html();
            assert!(html.contains("data:image/png;base64,iVBORw0KGgo="));
        }

        #[test]
        fn test_junit() {
            let xml = sample().render_junit();
            assert!(xml.contains(r#"tests="4" failures="1" skipped="1""#));
            assert!(xml.contains("<failure message=\"Assertion failed: cart count &lt;2&gt;\">"));
            assert!(xml.contains("<skipped/>"));
            assert!(xml.contains("passed after 2 attempts"));
        }

        #[test]
        fn test_escape_markup() {
            assert_eq!(escape_markup("a & b"), "a &amp; b");
            assert_eq!(escape_markup("it's \"x\""), "it&apos;s &quot;x&quot;");
        }
    }

    mod file_tests {
        use super::*;

        #[test]
        fn test_write_all_and_read_back() {
            let dir = tempfile::tempdir().unwrap();
            let reporter = sample();
            let files = reporter.write_all(dir.path(), true).unwrap();
            assert!(files.html.exists());
            assert!(files.junit.unwrap().exists());

            let json = std::fs::read_to_string(&files.json).unwrap();
            let back = Reporter::from_json(&json).unwrap();
            assert_eq!(back.outcomes(), reporter.outcomes());
            assert_eq!(back.suite_name(), "mybook.ba");
            assert_eq!(back.run_id(), reporter.run_id());
            assert!(!reporter.run_id().is_nil());
        }

        #[test]
        fn test_write_without_junit() {
            let dir = tempfile::tempdir().unwrap();
            let files = sample().write_all(dir.path(), false).unwrap();
            assert!(files.junit.is_none());
            assert!(!dir.path().join("junit.xml").exists());
        }
    }
}
