//! Base page interaction layer.
//!
//! Every page object owns a [`BasePage`] and goes through it for all browser
//! work. Reads are *checked*: they never fail, and fall back to a neutral
//! value (`false`, `""`, `0`, `None`) when the element is absent or the
//! driver errors. Mutations propagate their errors.

use crate::config::SuiteConfig;
use crate::driver::SharedDriver;
use crate::locator::Locator;
use crate::result::{ShopError, ShopResult};
use crate::wait::{self, LoadState, WaitOptions};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Driver plus configuration, shared by the page objects of one scenario
#[derive(Clone)]
pub struct BasePage {
    driver: SharedDriver,
    config: Arc<SuiteConfig>,
}

impl fmt::Debug for BasePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasePage")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl BasePage {
    /// Bind a driver and configuration
    #[must_use]
    pub fn new(driver: SharedDriver, config: Arc<SuiteConfig>) -> Self {
        Self { driver, config }
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    fn options(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(timeout)
            .with_poll_interval(self.config.timeouts.poll_interval())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Load `base_url + path` and wait for DOMContentLoaded
    pub async fn goto(&self, path: &str) -> ShopResult<()> {
        let url = self.config.url(path);
        debug!(%url, "goto");
        self.driver
            .navigate(&url, self.config.timeouts.navigation())
            .await
    }

    /// Wait for DOMContentLoaded of the current document
    pub async fn wait_for_navigation(&self) -> ShopResult<()> {
        self.driver
            .wait_for_load_state(LoadState::DomContentLoaded, self.config.timeouts.navigation())
            .await
    }

    /// Reload the current page
    pub async fn reload(&self) -> ShopResult<()> {
        self.driver.reload(self.config.timeouts.navigation()).await
    }

    /// Go back in history
    pub async fn go_back(&self) -> ShopResult<()> {
        self.driver.go_back(self.config.timeouts.navigation()).await
    }

    /// Current URL, empty when unknown
    pub async fn current_url(&self) -> String {
        self.driver.current_url().await.unwrap_or_else(|e| {
            debug!(error = %e, "current_url failed");
            String::new()
        })
    }

    // =========================================================================
    // Waiting
    // =========================================================================

    /// Wait until `locator` is visible, bounded by `element_wait`
    pub async fn wait_visible(&self, locator: &Locator) -> ShopResult<()> {
        self.wait_visible_for(locator, self.config.timeouts.element_wait())
            .await
    }

    /// Wait until `locator` is visible
    pub async fn wait_visible_for(&self, locator: &Locator, timeout: Duration) -> ShopResult<()> {
        let driver = &self.driver;
        let description = format!("{locator} visible");
        wait::wait_for(&self.options(timeout), &description, move || async move {
            driver.is_visible(locator).await
        })
        .await
        .map(|_| ())
        .map_err(|_| ShopError::ElementNotFound {
            locator: locator.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    /// Poll `condition` until it holds; `WaitTimeout` otherwise
    pub async fn wait_until<F, Fut>(
        &self,
        description: &str,
        timeout: Duration,
        mut condition: F,
    ) -> ShopResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        debug!(condition = description, "wait_until");
        wait::wait_for(&self.options(timeout), description, || {
            let fut = condition();
            async move { Ok(fut.await) }
        })
        .await
        .map(|_| ())
    }

    /// Poll `condition` until it holds; `false` on timeout
    pub async fn poll<F, Fut>(&self, description: &str, timeout: Duration, condition: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        wait::poll_until(&self.options(timeout), description, condition).await
    }

    /// Poll `check` until it yields a value; `None` on timeout
    pub async fn poll_for<T, F, Fut>(&self, description: &str, timeout: Duration, check: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        wait::poll_for(&self.options(timeout), description, check).await
    }

    /// Unconditional pause
    pub async fn wait(&self, duration: Duration) {
        wait::wait_timeout(duration).await;
    }

    // =========================================================================
    // Checked reads
    // =========================================================================

    /// Whether `locator` becomes visible within `visibility_probe`
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        self.is_visible_within(locator, self.config.timeouts.visibility_probe())
            .await
    }

    /// Whether `locator` becomes visible within `timeout`
    pub async fn is_visible_within(&self, locator: &Locator, timeout: Duration) -> bool {
        let driver = &self.driver;
        let description = format!("{locator} visible");
        wait::poll_until(&self.options(timeout), &description, move || async move {
            driver.is_visible(locator).await.unwrap_or(false)
        })
        .await
    }

    /// Single visibility probe, no waiting
    pub async fn is_visible_now(&self, locator: &Locator) -> bool {
        self.driver.is_visible(locator).await.unwrap_or(false)
    }

    /// Trimmed text of the target element, empty when absent
    pub async fn get_text(&self, locator: &Locator) -> String {
        match self.driver.text_content(locator).await {
            Ok(text) => text.map(|t| t.trim().to_string()).unwrap_or_default(),
            Err(e) => {
                debug!(%locator, error = %e, "get_text fell back to empty");
                String::new()
            }
        }
    }

    /// Number of matches, 0 on error
    pub async fn count(&self, locator: &Locator) -> usize {
        self.driver.count(locator).await.unwrap_or_else(|e| {
            debug!(%locator, error = %e, "count fell back to 0");
            0
        })
    }

    /// Input value, empty when absent
    pub async fn input_value(&self, locator: &Locator) -> String {
        match self.driver.input_value(locator).await {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                debug!(%locator, error = %e, "input_value fell back to empty");
                String::new()
            }
        }
    }

    /// Attribute value, `None` when absent
    pub async fn attribute(&self, locator: &Locator, name: &str) -> Option<String> {
        self.driver
            .attribute(locator, name)
            .await
            .unwrap_or_else(|e| {
                debug!(%locator, attribute = name, error = %e, "attribute fell back to none");
                None
            })
    }

    /// Checked state, `false` when absent
    pub async fn is_checked(&self, locator: &Locator) -> bool {
        self.driver.is_checked(locator).await.unwrap_or(false)
    }

    /// Whether the target text contains `text`
    pub async fn contains_text(&self, locator: &Locator, text: &str) -> bool {
        self.get_text(locator).await.contains(text)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Click the target element
    pub async fn click(&self, locator: &Locator) -> ShopResult<()> {
        debug!(%locator, "click");
        self.driver.click(locator).await
    }

    /// Replace the target input value
    pub async fn fill(&self, locator: &Locator, value: &str) -> ShopResult<()> {
        debug!(%locator, "fill");
        self.driver.fill(locator, value).await
    }

    /// Empty the target input
    pub async fn clear_input(&self, locator: &Locator) -> ShopResult<()> {
        self.fill(locator, "").await
    }

    /// Check the target checkbox
    pub async fn check(&self, locator: &Locator) -> ShopResult<()> {
        self.driver.set_checked(locator, true).await
    }

    /// Uncheck the target checkbox
    pub async fn uncheck(&self, locator: &Locator) -> ShopResult<()> {
        self.driver.set_checked(locator, false).await
    }

    /// Choose an option by value or label
    pub async fn select_option(&self, locator: &Locator, value: &str) -> ShopResult<()> {
        debug!(%locator, value, "select_option");
        self.driver.select_option(locator, value).await
    }

    /// Press a key on the focused element
    pub async fn press_key(&self, key: &str) -> ShopResult<()> {
        self.driver.press_key(key).await
    }

    /// Scroll the target element into view
    pub async fn scroll_into_view(&self, locator: &Locator) -> ShopResult<()> {
        self.driver.scroll_into_view(locator).await
    }

    /// Write a full-page PNG to `<output>/screenshots/<name>.png`
    pub async fn take_screenshot(&self, name: &str) -> ShopResult<PathBuf> {
        let shot = self.driver.screenshot().await?;
        let dir = self.config.screenshot_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.png", sanitize_file_name(name)));
        tokio::fs::write(&path, &shot.data).await?;
        debug!(path = %path.display(), bytes = shot.size_bytes(), "screenshot saved");
        Ok(path)
    }
}

/// Keep `[A-Za-z0-9_-]`, replace the rest with `_`
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "screenshot".to_string()
    } else {
        cleaned
    }
}
