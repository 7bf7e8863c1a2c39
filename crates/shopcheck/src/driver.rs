//! ShopDriver - abstract browser capability trait
//!
//! Everything above this trait (base page, page objects, scenarios, runner)
//! talks to the browser only through it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ShopDriver (async trait, Send + Sync, &self everywhere)     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────┐  ┌──────────────────────────┐ │
//! │  │  ChromiumDriver           │  │  MockDriver              │ │
//! │  │  (feature "browser")      │  │  (always available)      │ │
//! │  │  CDP via chromiumoxide,   │  │  in-memory DOM keyed by  │ │
//! │  │  locators compiled to JS  │  │  locator key, hooks      │ │
//! │  └───────────────────────────┘  └──────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Contract shared by implementations:
//!
//! - reads act on the current DOM and never wait
//! - mutations act on the first match (or the `nth` one) and fail with
//!   [`ShopError::ElementNotInteractable`](crate::ShopError) when it is
//!   missing, hidden, disabled or detached
//! - navigation fails with `NavigationTimeout` past its bound

use crate::locator::Locator;
use crate::result::ShopResult;
use crate::wait::LoadState;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Timestamp when screenshot was taken
    pub timestamp: SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            timestamp: SystemTime::now(),
        }
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if screenshot is valid (has data)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Browser capabilities used by the suite
#[async_trait]
pub trait ShopDriver: Send + Sync {
    /// Load `url` and wait for DOMContentLoaded
    async fn navigate(&self, url: &str, timeout: Duration) -> ShopResult<()>;

    /// Wait until the document reaches `state`
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> ShopResult<()>;

    /// Number of matches
    async fn count(&self, locator: &Locator) -> ShopResult<usize>;

    /// Whether the target element is rendered
    async fn is_visible(&self, locator: &Locator) -> ShopResult<bool>;

    /// Raw text content of the target element, `None` when nothing matches
    async fn text_content(&self, locator: &Locator) -> ShopResult<Option<String>>;

    /// Current value of the target input, `None` when nothing matches
    async fn input_value(&self, locator: &Locator) -> ShopResult<Option<String>>;

    /// Attribute of the target element
    async fn attribute(&self, locator: &Locator, name: &str) -> ShopResult<Option<String>>;

    /// Checked state of the target checkbox
    async fn is_checked(&self, locator: &Locator) -> ShopResult<bool>;

    /// Click the target element
    async fn click(&self, locator: &Locator) -> ShopResult<()>;

    /// Replace the value of the target input
    async fn fill(&self, locator: &Locator, value: &str) -> ShopResult<()>;

    /// Set the checked state of the target checkbox
    async fn set_checked(&self, locator: &Locator, checked: bool) -> ShopResult<()>;

    /// Choose an option of the target `<select>` by value or label
    async fn select_option(&self, locator: &Locator, value: &str) -> ShopResult<()>;

    /// Scroll the target element into view
    async fn scroll_into_view(&self, locator: &Locator) -> ShopResult<()>;

    /// Press a key on the focused element ("Enter", "Tab", ...)
    async fn press_key(&self, key: &str) -> ShopResult<()>;

    /// Full-page PNG
    async fn screenshot(&self) -> ShopResult<Screenshot>;

    /// Current page URL
    async fn current_url(&self) -> ShopResult<String>;

    /// Reload the page
    async fn reload(&self, timeout: Duration) -> ShopResult<()>;

    /// Go back in history
    async fn go_back(&self, timeout: Duration) -> ShopResult<()>;

    /// Delete every cookie of the browser context
    async fn clear_cookies(&self) -> ShopResult<()>;

    /// Close the page
    async fn close(&self) -> ShopResult<()>;
}

/// Shared handle used by page objects
pub type SharedDriver = Arc<dyn ShopDriver>;

/// Opens one fresh page per scenario attempt
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Open a page
    async fn open_page(&self) -> ShopResult<SharedDriver>;

    /// Release the browser
    async fn shutdown(&self) -> ShopResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_validity() {
        assert!(!Screenshot::new(Vec::new()).is_valid());
        let shot = Screenshot::new(vec![0x89, b'P', b'N', b'G']);
        assert!(shot.is_valid());
        assert_eq!(shot.size_bytes(), 4);
    }
}
