//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a rule, not a handle: it is resolved against the live
//! page every time a driver uses it, may match zero, one or many elements,
//! and carries no identity beyond its resolution rule.
//!
//! # Design
//!
//! - **Lazy**: nothing is resolved until a driver call
//! - **Scoped**: `row.nth(2).locator(Selector::css("input.qty"))`
//! - **Two vocabularies**: structural CSS rules and semantic role/text rules,
//!   so page objects can swap between them without changing their operations

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How element text is compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMatch {
    /// Trimmed text equals the value
    Exact(String),
    /// Case-insensitive substring
    Contains(String),
    /// Regular expression (common subset of Rust and JavaScript syntax)
    Pattern {
        /// Pattern source
        source: String,
        /// Match ignoring case
        case_insensitive: bool,
    },
}

impl TextMatch {
    /// Case-insensitive regex pattern
    #[must_use]
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern {
            source: source.into(),
            case_insensitive: true,
        }
    }

    /// Case-sensitive regex pattern
    #[must_use]
    pub fn pattern_case_sensitive(source: impl Into<String>) -> Self {
        Self::Pattern {
            source: source.into(),
            case_insensitive: false,
        }
    }

    /// Check a text value against this rule.
    ///
    /// An invalid pattern matches nothing.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => text.trim() == expected,
            Self::Contains(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
            Self::Pattern {
                source,
                case_insensitive,
            } => RegexBuilder::new(source)
                .case_insensitive(*case_insensitive)
                .build()
                .is_ok_and(|re| re.is_match(text)),
        }
    }

    /// JavaScript predicate over a string variable `t`
    #[must_use]
    pub fn to_js_predicate(&self) -> String {
        match self {
            Self::Exact(expected) => format!("(t.trim() === {})", js_string(expected)),
            Self::Contains(needle) => format!(
                "(t.toLowerCase().includes({}))",
                js_string(&needle.to_lowercase())
            ),
            Self::Pattern {
                source,
                case_insensitive,
            } => {
                let flags = if *case_insensitive { "i" } else { "" };
                format!("(new RegExp({}, {:?}).test(t))", js_string(source), flags)
            }
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "\"{s}\""),
            Self::Contains(s) => write!(f, "{s}"),
            Self::Pattern {
                source,
                case_insensitive,
            } => {
                write!(f, "/{source}/")?;
                if *case_insensitive {
                    write!(f, "i")?;
                }
                Ok(())
            }
        }
    }
}

/// ARIA roles used by the storefront locators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AriaRole {
    /// `<button>`, submit inputs, `[role=button]`
    Button,
    /// `<a href>`, `[role=link]`
    Link,
    /// Text-like inputs and textareas
    Textbox,
    /// Checkbox inputs
    Checkbox,
    /// `<select>`
    Combobox,
    /// `<h1>`..`<h6>`
    Heading,
    /// `<nav>`
    Navigation,
    /// `[role=alert]`, `[role=status]`
    Alert,
}

impl AriaRole {
    /// Role name as used in `[role=...]`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Textbox => "textbox",
            Self::Checkbox => "checkbox",
            Self::Combobox => "combobox",
            Self::Heading => "heading",
            Self::Navigation => "navigation",
            Self::Alert => "alert",
        }
    }

    /// CSS that matches elements carrying this role implicitly or explicitly
    #[must_use]
    pub const fn implicit_css(&self) -> &'static str {
        match self {
            Self::Button => {
                "button, input[type=button], input[type=submit], input[type=reset], [role=button]"
            }
            Self::Link => "a[href], [role=link]",
            Self::Textbox => {
                "input:not([type]), input[type=text], input[type=email], input[type=password], \
                 input[type=search], input[type=tel], input[type=url], textarea, [role=textbox]"
            }
            Self::Checkbox => "input[type=checkbox], [role=checkbox]",
            Self::Combobox => "select, [role=combobox]",
            Self::Heading => "h1, h2, h3, h4, h5, h6, [role=heading]",
            Self::Navigation => "nav, [role=navigation]",
            Self::Alert => "[role=alert], [role=status]",
        }
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// CSS selector filtered by element text
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text rule applied to `textContent`
        text: TextMatch,
    },
    /// Innermost elements whose text matches
    Text(TextMatch),
    /// Elements with an ARIA role and optional accessible name
    Role {
        /// Role
        role: AriaRole,
        /// Accessible name rule
        name: Option<TextMatch>,
    },
    /// Union of rules, in document order, without duplicates
    AnyOf(Vec<Selector>),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// CSS selector whose text contains `text` (case-insensitive)
    #[must_use]
    pub fn has_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: TextMatch::Contains(text.into()),
        }
    }

    /// Create a text selector (case-insensitive substring)
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextMatch::Contains(text.into()))
    }

    /// Text selector from a case-insensitive pattern
    #[must_use]
    pub fn text_pattern(source: impl Into<String>) -> Self {
        Self::Text(TextMatch::pattern(source))
    }

    /// Role selector without a name filter
    #[must_use]
    pub const fn role(role: AriaRole) -> Self {
        Self::Role { role, name: None }
    }

    /// Role selector with an accessible-name rule
    #[must_use]
    pub const fn role_named(role: AriaRole, name: TextMatch) -> Self {
        Self::Role {
            role,
            name: Some(name),
        }
    }

    /// Union of selectors
    #[must_use]
    pub fn any(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self::AnyOf(selectors.into_iter().collect())
    }

    /// JavaScript expression yielding the matching elements under `root`.
    ///
    /// Relies on the helpers defined by [`JS_PRELUDE`].
    #[must_use]
    pub fn to_js_collect(&self, root: &str) -> String {
        match self {
            Self::Css(css) => format!("Array.from({root}.querySelectorAll({}))", js_string(css)),
            Self::CssWithText { css, text } => format!(
                "Array.from({root}.querySelectorAll({})).filter(el => {{ const t = el.textContent || ''; return {}; }})",
                js_string(css),
                text.to_js_predicate()
            ),
            Self::Text(text) => {
                let pred = text.to_js_predicate();
                format!(
                    "Array.from({root}.querySelectorAll('body *')).filter(el => {{ const t = el.textContent || ''; \
                     if (!{pred}) return false; \
                     return !Array.from(el.children).some(c => {{ const t = c.textContent || ''; return {pred}; }}); }})"
                )
            }
            Self::Role { role, name } => {
                let base = format!(
                    "Array.from({root}.querySelectorAll({}))",
                    js_string(role.implicit_css())
                );
                match name {
                    Some(name) => format!(
                        "{base}.filter(el => {{ const t = __name(el); return {}; }})",
                        name.to_js_predicate()
                    ),
                    None => base,
                }
            }
            Self::AnyOf(selectors) => {
                let parts: Vec<String> =
                    selectors.iter().map(|s| s.to_js_collect(root)).collect();
                format!("__uniq([].concat({}))", parts.join(", "))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={css}"),
            Self::CssWithText { css, text } => write!(f, "css={css}:has-text({text})"),
            Self::Text(text) => write!(f, "text={text}"),
            Self::Role { role, name } => match name {
                Some(name) => write!(f, "role={}[name={name}]", role.as_str()),
                None => write!(f, "role={}", role.as_str()),
            },
            Self::AnyOf(selectors) => {
                write!(f, "any(")?;
                for (i, s) in selectors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Helpers shared by every generated script
pub const JS_PRELUDE: &str = r"
const __vis = el => {
  if (!el || !el.isConnected) return false;
  const style = window.getComputedStyle(el);
  if (style.visibility === 'hidden' || style.display === 'none') return false;
  return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
};
const __name = el => {
  const labelled = el.getAttribute('aria-label');
  if (labelled) return labelled.trim();
  if (el.labels && el.labels.length) {
    return Array.from(el.labels).map(l => l.textContent || '').join(' ').trim();
  }
  return (el.getAttribute('placeholder') || el.getAttribute('title') || el.textContent || el.value || '').trim();
};
const __uniq = arr => Array.from(new Set(arr)).sort((a, b) =>
  a === b ? 0 : (a.compareDocumentPosition(b) & Node.DOCUMENT_POSITION_FOLLOWING ? -1 : 1));
";

/// A locator for finding elements.
///
/// Resolution: the parent (if any) is resolved first, the selector is applied
/// under every parent match, then `nth` picks one element of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    parent: Option<Box<Locator>>,
    index: Option<usize>,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            parent: None,
            index: None,
        }
    }

    /// Pick the element at `index` among the matches
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        Self {
            selector: self.selector.clone(),
            parent: self.parent.clone(),
            index: Some(index),
        }
    }

    /// Pick the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Scope a selector under this locator's matches
    #[must_use]
    pub fn locator(&self, selector: Selector) -> Self {
        Self {
            selector,
            parent: Some(Box::new(self.clone())),
            index: None,
        }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the parent locator
    #[must_use]
    pub fn parent(&self) -> Option<&Locator> {
        self.parent.as_deref()
    }

    /// Get the index filter
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Resolution chain without any index filter.
    ///
    /// Two locators with the same key match the same collection.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} >> {}", parent.key(), self.selector),
            None => self.selector.to_string(),
        }
    }

    /// JavaScript expression yielding the matched elements (after `nth`)
    #[must_use]
    pub fn to_js_resolve(&self) -> String {
        let collected = match &self.parent {
            Some(parent) => format!(
                "__uniq(({}).flatMap(r => {}))",
                parent.to_js_resolve(),
                self.selector.to_js_collect("r")
            ),
            None => self.selector.to_js_collect("document"),
        };
        match self.index {
            Some(i) => format!("(({collected}).slice({i}, {}))", i + 1),
            None => collected,
        }
    }

    /// Script returning the number of matches
    #[must_use]
    pub fn count_script(&self) -> String {
        format!(
            "(() => {{ {JS_PRELUDE} return ({}).length; }})()",
            self.to_js_resolve()
        )
    }

    /// Script returning a JSON snapshot of the target element.
    ///
    /// `{ exists, visible, enabled, checked, text, value }`; `exists` is false
    /// when nothing matches.
    #[must_use]
    pub fn state_script(&self) -> String {
        format!(
            "(() => {{ {JS_PRELUDE} const el = ({})[0]; \
             if (!el) return {{ exists: false, visible: false, enabled: false, checked: false, text: null, value: null }}; \
             return {{ exists: true, visible: __vis(el), enabled: !el.disabled, checked: !!el.checked, \
             text: el.textContent, value: ('value' in el) ? String(el.value) : null }}; }})()",
            self.to_js_resolve()
        )
    }

    /// Script returning an attribute of the target element or `null`
    #[must_use]
    pub fn attribute_script(&self, name: &str) -> String {
        format!(
            "(() => {{ {JS_PRELUDE} const el = ({})[0]; return el ? el.getAttribute({}) : null; }})()",
            self.to_js_resolve(),
            js_string(name)
        )
    }

    /// Script that performs `action` on the target element after an
    /// actionability check.
    ///
    /// `action` is a JavaScript statement with `el` in scope. The script
    /// returns `"ok"`, `"missing"`, `"hidden"` or `"disabled"`.
    #[must_use]
    pub fn action_script(&self, action: &str) -> String {
        format!(
            "(() => {{ {JS_PRELUDE} const el = ({})[0]; \
             if (!el || !el.isConnected) return 'missing'; \
             el.scrollIntoView({{ block: 'center', inline: 'center' }}); \
             if (!__vis(el)) return 'hidden'; \
             if (el.disabled) return 'disabled'; \
             {action} return 'ok'; }})()",
            self.to_js_resolve()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent} >> ")?;
        }
        write!(f, "{}", self.selector)?;
        if let Some(i) = self.index {
            write!(f, " >> nth={i}")?;
        }
        Ok(())
    }
}

/// Encode a string as a JavaScript string literal
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod text_match_tests {
        use super::*;

        #[test]
        fn test_exact_trims() {
            let m = TextMatch::Exact("Password".to_string());
            assert!(m.matches("  Password \n"));
            assert!(!m.matches("Password reset"));
        }

        #[test]
        fn test_contains_ignores_case() {
            let m = TextMatch::Contains("Add to cart".to_string());
            assert!(m.matches("ADD TO CART"));
            assert!(!m.matches("Dodaj u korpu"));
        }

        #[test]
        fn test_pattern_alternation() {
            let m = TextMatch::pattern("VERIFICATION REQUIRED|verification is required");
            assert!(m.matches("Email verification is required before login"));
            assert!(m.matches("verification required"));
            assert!(!m.matches("Welcome back"));
        }

        #[test]
        fn test_invalid_pattern_matches_nothing() {
            let m = TextMatch::pattern("(unclosed");
            assert!(!m.matches("(unclosed"));
        }

        #[test]
        fn test_js_predicate_escapes() {
            let m = TextMatch::Exact("it's \"quoted\"".to_string());
            let js = m.to_js_predicate();
            assert!(js.contains(r#""it's \"quoted\"""#));
        }

        #[test]
        fn test_pattern_display() {
            assert_eq!(TextMatch::pattern("Add to cart").to_string(), "/Add to cart/i");
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_display() {
            assert_eq!(Selector::css(".cart-count").to_string(), "css=.cart-count");
        }

        #[test]
        fn test_role_display() {
            let s = Selector::role_named(AriaRole::Button, TextMatch::pattern("Add to cart"));
            assert_eq!(s.to_string(), "role=button[name=/Add to cart/i]");
        }

        #[test]
        fn test_any_display() {
            let s = Selector::any([Selector::css("a.remove"), Selector::css(".remove")]);
            assert_eq!(s.to_string(), "any(css=a.remove | css=.remove)");
        }

        #[test]
        fn test_css_collect() {
            let js = Selector::css("input.qty").to_js_collect("document");
            assert_eq!(js, r#"Array.from(document.querySelectorAll("input.qty"))"#);
        }

        #[test]
        fn test_role_collect_filters_by_name() {
            let js = Selector::role_named(AriaRole::Textbox, TextMatch::Exact("Password".into()))
                .to_js_collect("document");
            assert!(js.contains("input[type=password]"));
            assert!(js.contains("__name(el)"));
        }

        #[test]
        fn test_any_collect_dedupes() {
            let js = Selector::any([Selector::css("a"), Selector::css("button")])
                .to_js_collect("document");
            assert!(js.starts_with("__uniq("));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_nth_keeps_key() {
            let rows = Locator::new(".cart_item");
            assert_eq!(rows.key(), rows.nth(3).key());
            assert_eq!(rows.nth(3).index(), Some(3));
            assert_eq!(rows.first().index(), Some(0));
        }

        #[test]
        fn test_scoped_key() {
            let qty = Locator::new(".cart_item")
                .nth(1)
                .locator(Selector::css("input.qty"));
            assert_eq!(qty.key(), "css=.cart_item >> css=input.qty");
            assert_eq!(qty.to_string(), "css=.cart_item >> nth=1 >> css=input.qty");
            assert_eq!(qty.parent().and_then(Locator::index), Some(1));
        }

        #[test]
        fn test_resolve_applies_index() {
            let js = Locator::new(".product").nth(2).to_js_resolve();
            assert!(js.ends_with(".slice(2, 3))"));
        }

        #[test]
        fn test_scoped_resolve_flat_maps() {
            let js = Locator::new(".cart_item")
                .nth(0)
                .locator(Selector::css("input.qty"))
                .to_js_resolve();
            assert!(js.contains("flatMap(r =>"));
            assert!(js.contains("r.querySelectorAll"));
        }

        #[test]
        fn test_scripts_include_prelude() {
            let loc = Locator::new("#search");
            for script in [
                loc.count_script(),
                loc.state_script(),
                loc.attribute_script("required"),
                loc.action_script("el.click();"),
            ] {
                assert!(script.contains("const __vis"));
                assert!(script.starts_with("(() =>"));
            }
        }

        #[test]
        fn test_action_script_reports_status() {
            let script = Locator::new("button").action_script("el.click();");
            assert!(script.contains("'missing'"));
            assert!(script.contains("'hidden'"));
            assert!(script.contains("'disabled'"));
            assert!(script.contains("el.click();"));
        }
    }
}
