//! The storefront scenario catalog.

mod functional;
mod smoke;

use crate::scenario::{Scenario, Suite};

/// All scenarios in id order
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    let mut all = smoke::scenarios();
    all.extend(functional::scenarios());
    all
}

/// Scenarios of one suite, or all of them
#[must_use]
pub fn select(suite: Option<Suite>, filter: Option<&str>) -> Vec<Scenario> {
    catalog()
        .into_iter()
        .filter(|s| suite.map_or(true, |suite| s.suite == suite))
        .filter(|s| filter.map_or(true, |f| s.matches(f)))
        .collect()
}
