//! Storefront page objects.
//!
//! One type per screen. Each holds a [`BasePage`](crate::BasePage) and a
//! locator catalog; `XxxLocators::for_strategy` picks between the
//! structural (CSS) and semantic (role/text) catalogs.

mod cart;
mod home;
mod login;
mod product;
mod search;

pub use cart::{CartLocators, CartPage, CART_PATH};
pub use home::{HomeLocators, HomePage};
pub use login::{LoginLocators, LoginOutcome, LoginPage};
pub use product::{ProductLocators, ProductPage};
pub use search::{SearchLocators, SearchPage};

use regex::Regex;
use std::sync::OnceLock;

/// First run of digits in `text`
pub(crate) fn first_number(text: &str) -> Option<u32> {
    static DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
    DIGITS
        .get_or_init(|| Regex::new(r"\d+").ok())
        .as_ref()?
        .find(text)?
        .as_str()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("3"), Some(3));
        assert_eq!(first_number("Korpa (12 artikala)"), Some(12));
        assert_eq!(first_number(""), None);
        assert_eq!(first_number("none"), None);
    }
}
