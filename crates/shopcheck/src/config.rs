//! Suite configuration.
//!
//! One explicit [`SuiteConfig`] is built at startup and passed to every page
//! object and the runner. Precedence, lowest first: built-in defaults, YAML
//! file, environment (`BASE_URL`, `TEST_EMAIL`, `TEST_PASSWORD`), then
//! whatever the caller overrides through the builder methods.

use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default storefront
pub const DEFAULT_BASE_URL: &str = "https://mybook.ba";

/// Fallback login email when `TEST_EMAIL` is unset
pub const DEFAULT_TEST_EMAIL: &str = "test@example.com";

/// Fallback login password when `TEST_PASSWORD` is unset
pub const DEFAULT_TEST_PASSWORD: &str = "password123";

/// Login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    /// Username or email
    pub email: String,
    /// Password
    pub password: String,
}

impl UserCredentials {
    /// Create credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Default for UserCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_EMAIL, DEFAULT_TEST_PASSWORD)
    }
}

/// Which locator catalog page objects use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    /// CSS class and id selectors
    Structural,
    /// ARIA roles and visible text
    #[default]
    Semantic,
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Semantic => write!(f, "semantic"),
        }
    }
}

impl FromStr for LocatorStrategy {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" | "css" => Ok(Self::Structural),
            "semantic" | "role" => Ok(Self::Semantic),
            other => Err(ShopError::config(format!(
                "unknown locator strategy '{other}' (expected structural or semantic)"
            ))),
        }
    }
}

/// When the runner captures screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenshotPolicy {
    /// Never
    Off,
    /// After a failed attempt
    #[default]
    OnlyOnFailure,
    /// After every attempt
    Always,
}

/// Time bounds, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Page navigation
    pub navigation_ms: u64,
    /// Single UI action
    pub action_ms: u64,
    /// Explicit element waits
    pub element_wait_ms: u64,
    /// Visibility probe used by checked reads
    pub visibility_probe_ms: u64,
    /// Whole scenario
    pub scenario_ms: u64,
    /// Condition polling interval
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 30_000,
            action_ms: 20_000,
            element_wait_ms: 10_000,
            visibility_probe_ms: 5_000,
            scenario_ms: 60_000,
            poll_interval_ms: 100,
        }
    }
}

impl Timeouts {
    /// Short bounds for in-memory storefronts
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            navigation_ms: 500,
            action_ms: 500,
            element_wait_ms: 300,
            visibility_probe_ms: 100,
            scenario_ms: 5_000,
            poll_interval_ms: 5,
        }
    }

    /// Navigation bound
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Action bound
    #[must_use]
    pub const fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    /// Element wait bound
    #[must_use]
    pub const fn element_wait(&self) -> Duration {
        Duration::from_millis(self.element_wait_ms)
    }

    /// Visibility probe bound
    #[must_use]
    pub const fn visibility_probe(&self) -> Duration {
        Duration::from_millis(self.visibility_probe_ms)
    }

    /// Scenario bound
    #[must_use]
    pub const fn scenario(&self) -> Duration {
        Duration::from_millis(self.scenario_ms)
    }

    /// Polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Keep the Chromium sandbox (disable inside containers)
    pub sandbox: bool,
    /// Chromium executable; auto-detected when unset
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            sandbox: true,
            chrome_path: None,
        }
    }
}

/// Suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront root URL, without trailing slash
    pub base_url: String,
    /// Registered account used by the login scenarios
    pub credentials: UserCredentials,
    /// Locator catalog
    pub strategy: LocatorStrategy,
    /// Time bounds
    pub timeouts: Timeouts,
    /// Concurrent scenarios
    pub workers: usize,
    /// Extra attempts after a failure
    pub retries: u32,
    /// Report and screenshot directory
    pub output_dir: PathBuf,
    /// Screenshot capture policy
    pub screenshots: ScreenshotPolicy,
    /// Browser settings
    pub browser: BrowserSettings,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: UserCredentials::default(),
            strategy: LocatorStrategy::default(),
            timeouts: Timeouts::default(),
            workers: 5,
            retries: 1,
            output_dir: PathBuf::from("test-results"),
            screenshots: ScreenshotPolicy::default(),
            browser: BrowserSettings::default(),
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> ShopResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_yaml_file(path: &Path) -> ShopResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ShopError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Optional YAML file, then the process environment
    pub fn load(path: Option<&Path>) -> ShopResult<Self> {
        let base = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `BASE_URL`, `TEST_EMAIL` and `TEST_PASSWORD` from `lookup`.
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get("BASE_URL") {
            self.base_url = normalize_base_url(&url);
        }
        if let Some(email) = get("TEST_EMAIL") {
            self.credentials.email = email;
        }
        if let Some(password) = get("TEST_PASSWORD") {
            self.credentials.password = password;
        }
        self
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> ShopResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check invariants
    pub fn validate(&self) -> ShopResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ShopError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.workers == 0 {
            return Err(ShopError::config("workers must be at least 1"));
        }
        if self.timeouts.scenario_ms == 0 || self.timeouts.navigation_ms == 0 {
            return Err(ShopError::config("timeouts must be positive"));
        }
        Ok(())
    }

    /// Absolute URL for a site path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Directory for screenshots
    #[must_use]
    pub fn screenshot_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(url.as_ref());
        self
    }

    /// Set credentials
    #[must_use]
    pub fn with_credentials(mut self, credentials: UserCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set locator strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: LocatorStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set time bounds
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set worker count
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set retry count
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set screenshot policy
    #[must_use]
    pub const fn with_screenshots(mut self, policy: ScreenshotPolicy) -> Self {
        self.screenshots = policy;
        self
    }

    /// Set browser settings
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserSettings) -> Self {
        self.browser = browser;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = SuiteConfig::default();
            assert_eq!(config.base_url, "https://mybook.ba");
            assert_eq!(config.credentials.email, "test@example.com");
            assert_eq!(config.credentials.password, "password123");
            assert_eq!(config.workers, 5);
            assert_eq!(config.retries, 1);
            assert_eq!(config.strategy, LocatorStrategy::Semantic);
            assert_eq!(config.screenshots, ScreenshotPolicy::OnlyOnFailure);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_default_timeouts() {
            let t = Timeouts::default();
            assert_eq!(t.navigation(), Duration::from_secs(30));
            assert_eq!(t.element_wait(), Duration::from_secs(10));
            assert_eq!(t.visibility_probe(), Duration::from_secs(5));
            assert_eq!(t.scenario(), Duration::from_secs(60));
        }
    }

    mod env_tests {
        use super::*;

        fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = vars
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();
            move |key| map.get(key).cloned()
        }

        #[test]
        fn test_env_overrides() {
            let config = SuiteConfig::default().with_env(lookup(&[
                ("BASE_URL", "https://staging.mybook.ba/"),
                ("TEST_EMAIL", "qa@mybook.ba"),
                ("TEST_PASSWORD", "s3cret"),
            ]));
            assert_eq!(config.base_url, "https://staging.mybook.ba");
            assert_eq!(config.credentials, UserCredentials::new("qa@mybook.ba", "s3cret"));
        }

        #[test]
        fn test_empty_env_falls_back() {
            let config = SuiteConfig::default().with_env(lookup(&[("BASE_URL", "  ")]));
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = SuiteConfig::from_yaml_str(
                "base_url: http://localhost:8080\nworkers: 2\nstrategy: structural\ntimeouts:\n  scenario_ms: 90000\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "http://localhost:8080");
            assert_eq!(config.workers, 2);
            assert_eq!(config.strategy, LocatorStrategy::Structural);
            assert_eq!(config.timeouts.scenario_ms, 90_000);
            assert_eq!(config.timeouts.navigation_ms, 30_000);
        }

        #[test]
        fn test_screenshot_policy_kebab_case() {
            let config = SuiteConfig::from_yaml_str("screenshots: always\n").unwrap();
            assert_eq!(config.screenshots, ScreenshotPolicy::Always);
            let yaml = SuiteConfig::default().to_yaml().unwrap();
            assert!(yaml.contains("only-on-failure"));
        }

        #[test]
        fn test_invalid_yaml_config_rejected() {
            assert!(SuiteConfig::from_yaml_str("workers: 0\n").is_err());
            assert!(SuiteConfig::from_yaml_str("base_url: mybook.ba\n").is_err());
        }

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, "retries: 3\n").unwrap();
            let config = SuiteConfig::from_yaml_file(&path).unwrap();
            assert_eq!(config.retries, 3);
        }

        #[test]
        fn test_missing_file_is_config_error() {
            let err = SuiteConfig::from_yaml_file(Path::new("/nonexistent/suite.yaml")).unwrap_err();
            assert!(matches!(err, ShopError::Config { .. }));
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_url_joins_paths() {
            let config = SuiteConfig::default();
            assert_eq!(config.url("/"), "https://mybook.ba/");
            assert_eq!(config.url(""), "https://mybook.ba/");
            assert_eq!(config.url("/my-account/"), "https://mybook.ba/my-account/");
            assert_eq!(config.url("cart/"), "https://mybook.ba/cart/");
            assert_eq!(config.url("https://other.ba/x"), "https://other.ba/x");
        }

        #[test]
        fn test_strategy_from_str() {
            assert_eq!("Semantic".parse::<LocatorStrategy>().unwrap(), LocatorStrategy::Semantic);
            assert_eq!("css".parse::<LocatorStrategy>().unwrap(), LocatorStrategy::Structural);
            assert!("xpath".parse::<LocatorStrategy>().is_err());
        }
    }
}
