//! List command handler

use crate::ListArgs;
use shopcheck::{scenarios, Scenario, Suite};

/// Print the selected scenarios, one per line
pub fn execute_list(args: &ListArgs) {
    let selected = scenarios::select(args.suite.map(Suite::from), args.filter.as_deref());
    for line in listing(&selected) {
        println!("{line}");
    }
}

/// `TC_01 [smoke] Title` lines
#[must_use]
pub fn listing(selected: &[Scenario]) -> Vec<String> {
    selected
        .iter()
        .map(|s| format!("{} [{}] {}", s.id, s.suite, s.title))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use shopcheck::catalog;

    #[test]
    fn test_listing_format() {
        let lines = listing(&catalog());
        assert_eq!(lines.len(), 15);
        assert!(lines[0].starts_with("TC_01 [smoke] "));
        assert!(lines[14].starts_with("TC_15 [functional] "));
    }

    #[test]
    fn test_listing_empty() {
        assert!(listing(&[]).is_empty());
    }
}
