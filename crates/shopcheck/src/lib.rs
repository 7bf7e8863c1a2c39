//! Shopcheck: page-object browser tests for the MyBook.ba storefront
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      SHOPCHECK Architecture                      │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────┐   ┌──────────┐   ┌────────────┐  │
//! │  │ Scenarios │──►│ Page       │──►│ BasePage │──►│ ShopDriver │  │
//! │  │ TC_01..15 │   │ Objects    │   │ (checked │   │ (chromium  │  │
//! │  │           │   │ + Locators │   │  reads)  │   │  or mock)  │  │
//! │  └─────▲─────┘   └────────────┘   └──────────┘   └────────────┘  │
//! │        │                                                          │
//! │  ┌─────┴───────┐   ┌──────────┐                                   │
//! │  │ SuiteRunner │──►│ Reporter │──► results.json, report.html      │
//! │  └─────────────┘   └──────────┘                                   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads through [`BasePage`] never fail: absent elements give `false`,
//! `""` or `0`. Mutations propagate [`ShopError`].

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod base_page;
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
mod config;
mod driver;
mod fixtures;
mod locator;
#[allow(clippy::missing_errors_doc)]
mod page_object;
mod result;
mod wait;

/// Real browser control over the Chrome DevTools Protocol.
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
pub mod chromium;

/// In-memory driver used by unit and integration tests.
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
pub mod mock;

/// Storefront page objects.
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod pages;

/// Scenario outcomes and report files.
#[allow(
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]
pub mod reporter;

/// Bounded-parallel scenario execution with retries.
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
pub mod runner;

/// Scenario type and context.
#[allow(clippy::missing_errors_doc)]
pub mod scenario;

/// The TC_01 to TC_15 catalog.
pub mod scenarios;

pub use base_page::{sanitize_file_name, BasePage};
pub use config::{
    BrowserSettings, LocatorStrategy, ScreenshotPolicy, SuiteConfig, Timeouts, UserCredentials,
    DEFAULT_BASE_URL, DEFAULT_TEST_EMAIL, DEFAULT_TEST_PASSWORD,
};
pub use driver::{DriverFactory, Screenshot, SharedDriver, ShopDriver};
pub use fixtures::{
    CategoryData, ContactFormData, InvalidCredentials, NewUser, SearchData, TestData,
};
pub use locator::{js_string, AriaRole, Locator, Selector, TextMatch, JS_PRELUDE};
pub use page_object::{query_param, url_path, PageObject, UrlMatcher};
pub use reporter::{ReportFiles, Reporter, ScenarioOutcome, Status};
pub use result::{ShopError, ShopResult};
pub use runner::{OutcomeHook, SuiteRunner};
pub use scenario::{ensure, ensure_eq, Scenario, ScenarioContext, Suite};
pub use scenarios::catalog;
pub use wait::{
    poll_for, poll_until, wait_for, wait_timeout, LoadState, WaitOptions, WaitResult,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

#[cfg(feature = "browser")]
pub use chromium::{ChromiumDriver, ChromiumLauncher};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        catalog, ensure, BasePage, CartPage, HomePage, LocatorStrategy, LoginOutcome, LoginPage,
        PageObject, ProductPage, Reporter, Scenario, SearchPage, ShopError, ShopResult,
        SuiteConfig, SuiteRunner, TestData,
    };
}

pub use pages::{
    CartLocators, CartPage, HomeLocators, HomePage, LoginLocators, LoginOutcome, LoginPage,
    ProductLocators, ProductPage, SearchLocators, SearchPage, CART_PATH,
};
