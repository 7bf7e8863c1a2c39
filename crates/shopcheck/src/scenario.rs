//! Scenario definitions.
//!
//! A [`Scenario`] is a named async script over one browser page. Scripts
//! receive a [`ScenarioContext`] that builds page objects on that page and
//! carries the fixtures; they report failed checks through [`ensure`].

use crate::base_page::BasePage;
use crate::config::ScreenshotPolicy;
use crate::fixtures::TestData;
use crate::pages::{CartPage, HomePage, LoginPage, ProductPage, SearchPage};
use crate::result::{ShopError, ShopResult};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Scenario group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// Critical paths, run first
    Smoke,
    /// Edge cases and secondary flows
    Functional,
}

impl Suite {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Functional => "functional",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smoke" => Ok(Self::Smoke),
            "functional" => Ok(Self::Functional),
            other => Err(ShopError::config(format!(
                "unknown suite '{other}' (expected smoke or functional)"
            ))),
        }
    }
}

/// Future returned by a scenario script
pub type ScenarioFuture = BoxFuture<'static, ShopResult<()>>;

/// Scenario script entry point
pub type ScenarioFn = fn(ScenarioContext) -> ScenarioFuture;

/// One end-to-end user story
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Stable identifier, e.g. `TC_04`
    pub id: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Group
    pub suite: Suite,
    run: ScenarioFn,
}

impl Scenario {
    #[must_use]
    pub const fn new(id: &'static str, title: &'static str, suite: Suite, run: ScenarioFn) -> Self {
        Self {
            id,
            title,
            suite,
            run,
        }
    }

    /// Start the script on `ctx`
    #[must_use]
    pub fn run(&self, ctx: ScenarioContext) -> ScenarioFuture {
        (self.run)(ctx)
    }

    /// Case-insensitive substring match on id or title
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.id.to_lowercase().contains(&needle) || self.title.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.title)
    }
}

/// Everything a scenario script needs for one attempt
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    id: &'static str,
    base: BasePage,
    data: TestData,
}

impl ScenarioContext {
    #[must_use]
    pub fn new(id: &'static str, base: BasePage) -> Self {
        let data = TestData::new(base.config());
        Self { id, base, data }
    }

    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    #[must_use]
    pub const fn base(&self) -> &BasePage {
        &self.base
    }

    #[must_use]
    pub const fn data(&self) -> &TestData {
        &self.data
    }

    #[must_use]
    pub fn home(&self) -> HomePage {
        HomePage::new(self.base.clone())
    }

    #[must_use]
    pub fn login(&self) -> LoginPage {
        LoginPage::new(self.base.clone())
    }

    #[must_use]
    pub fn product(&self) -> ProductPage {
        ProductPage::new(self.base.clone())
    }

    #[must_use]
    pub fn search(&self) -> SearchPage {
        SearchPage::new(self.base.clone())
    }

    #[must_use]
    pub fn cart(&self) -> CartPage {
        CartPage::new(self.base.clone())
    }

    /// Save `<id>-<label>.png` unless screenshots are turned off
    pub async fn checkpoint(&self, label: &str) -> ShopResult<Option<PathBuf>> {
        if self.base.config().screenshots == ScreenshotPolicy::Off {
            debug!(scenario = self.id, label, "screenshot skipped");
            return Ok(None);
        }
        let path = self
            .base
            .take_screenshot(&format!("{}-{label}", self.id))
            .await?;
        Ok(Some(path))
    }
}

/// `Ok(())` when `condition` holds, `AssertionFailed` otherwise
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> ShopResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ShopError::assertion(message()))
    }
}

/// Equality check with both values in the failure message
pub fn ensure_eq<T: PartialEq + fmt::Debug>(actual: T, expected: T, what: &str) -> ShopResult<()> {
    ensure(actual == expected, || {
        format!("{what}: expected {expected:?}, got {actual:?}")
    })
}
