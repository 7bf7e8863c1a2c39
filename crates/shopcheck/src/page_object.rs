//! Page Object Model support.
//!
//! Each storefront screen is one type holding a [`BasePage`](crate::BasePage)
//! and a locator catalog chosen by [`LocatorStrategy`](crate::LocatorStrategy).
//! This module carries what the screens share: the [`PageObject`] trait and
//! URL pattern matching.

use std::collections::HashMap;

/// Trait for page objects representing a screen of the storefront.
///
/// # Example
///
/// ```ignore
/// impl PageObject for CartPage {
///     fn url_pattern(&self) -> &str {
///         "/shop/"
///     }
/// }
///
/// assert!(cart.is_current("https://mybook.ba/shop/"));
/// ```
pub trait PageObject {
    /// URL path pattern that matches this page (e.g., "/my-account/", "/product/:slug")
    fn url_pattern(&self) -> &str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether `url` belongs to this page
    fn is_current(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches_url(url)
    }
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
    Rest,
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/my-account`
    /// - Wildcards: `/product-category/*`
    /// - Named parameters: `/product/:slug`
    /// - Trailing catch-all: `/product-category/**`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "**" {
                    UrlSegment::Rest
                } else if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL path matches the pattern
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let rest = matches!(self.segments.last(), Some(UrlSegment::Rest));
        let fixed = if rest {
            self.segments.len() - 1
        } else {
            self.segments.len()
        };

        if path_segments.len() < fixed || (!rest && path_segments.len() != fixed) {
            return false;
        }

        self.segments
            .iter()
            .take(fixed)
            .zip(&path_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit.eq_ignore_ascii_case(actual),
                UrlSegment::Wildcard | UrlSegment::Parameter(_) | UrlSegment::Rest => true,
            })
    }

    /// Check a full URL: scheme, host, query and fragment are ignored
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        self.matches(url_path(url))
    }

    /// Extract parameters from a URL path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let path_segments: Vec<&str> = url_path(path)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        for (i, segment) in self.segments.iter().enumerate() {
            if let UrlSegment::Parameter(name) = segment {
                if let Some(value) = path_segments.get(i) {
                    let _ = params.insert(name.clone(), (*value).to_string());
                }
            }
        }

        params
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Path component of a URL (`/` when empty)
#[must_use]
pub fn url_path(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path_start = if url.contains("://") {
        without_scheme.find('/').unwrap_or(without_scheme.len())
    } else {
        0
    };
    let path = &without_scheme[path_start..];
    let end = path.find(|c| c == '?' || c == '#').unwrap_or(path.len());
    let path = &path[..end];
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// Value of a query parameter, undecoded
#[must_use]
pub fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then_some(value)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/my-account/");
            assert!(matcher.matches("/my-account/"));
            assert!(matcher.matches("/my-account"));
            assert!(!matcher.matches("/shop/"));
            assert!(!matcher.matches("/my-account/orders"));
        }

        #[test]
        fn test_root_pattern() {
            let matcher = UrlMatcher::new("/");
            assert!(matcher.matches("/"));
            assert!(matcher.matches_url("https://mybook.ba"));
            assert!(matcher.matches_url("https://mybook.ba/?s=roman"));
            assert!(!matcher.matches_url("https://mybook.ba/shop/"));
        }

        #[test]
        fn test_wildcard_match() {
            let matcher = UrlMatcher::new("/product-category/*");
            assert!(matcher.matches("/product-category/knjige-za-odrasle"));
            assert!(!matcher.matches("/product-category"));
        }

        #[test]
        fn test_rest_match() {
            let matcher = UrlMatcher::new("/product-category/**");
            assert!(matcher.matches("/product-category/knjige-za-odrasle/page/2"));
            assert!(matcher.matches("/product-category"));
            assert!(!matcher.matches("/product/x"));
        }

        #[test]
        fn test_extract_params() {
            let matcher = UrlMatcher::new("/product/:slug");
            let params = matcher.extract_params("https://mybook.ba/product/zlocin-i-kazna/?v=1");
            assert_eq!(params.get("slug"), Some(&"zlocin-i-kazna".to_string()));
        }

        #[test]
        fn test_pattern_getter() {
            let matcher = UrlMatcher::new("/shop/");
            assert_eq!(matcher.pattern(), "/shop/");
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_url_path() {
            assert_eq!(url_path("https://mybook.ba"), "/");
            assert_eq!(url_path("https://mybook.ba/shop/?x=1"), "/shop/");
            assert_eq!(url_path("/cart/#top"), "/cart/");
        }

        #[test]
        fn test_query_param() {
            let url = "https://mybook.ba/?s=filozofija&post_type=product";
            assert_eq!(query_param(url, "s"), Some("filozofija"));
            assert_eq!(query_param(url, "post_type"), Some("product"));
            assert_eq!(query_param(url, "page"), None);
            assert_eq!(query_param("https://mybook.ba/", "s"), None);
        }
    }

    mod page_object_trait_tests {
        use super::*;

        #[derive(Debug)]
        struct AccountPage;

        impl PageObject for AccountPage {
            fn url_pattern(&self) -> &str {
                "/my-account/"
            }
        }

        #[test]
        fn test_is_current() {
            assert!(AccountPage.is_current("https://mybook.ba/my-account/"));
            assert!(!AccountPage.is_current("https://mybook.ba/"));
            assert!(AccountPage.page_name().ends_with("AccountPage"));
        }
    }
}
