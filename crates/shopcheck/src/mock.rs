//! In-memory driver for tests.
//!
//! [`MockDriver`] keeps a tiny DOM: a map from locator key (see
//! [`Locator::key`]) to the ordered list of elements matching it. Scoped
//! locators use the full chain as key, and element `i` of a scoped list
//! belongs to element `i` of its parent list, which is enough to model
//! "the quantity input of cart row 2".
//!
//! Behaviour is scripted with hooks (click, change, key press, navigation,
//! cookie reset) that mutate the DOM the way the real storefront would.

use crate::driver::{DriverFactory, Screenshot, SharedDriver, ShopDriver};
use crate::locator::{Locator, Selector};
use crate::result::{ShopError, ShopResult};
use crate::wait::LoadState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// PNG signature returned as screenshot data
pub const MOCK_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Anything that names a DOM collection
pub trait DomKey {
    /// Collection key
    fn dom_key(&self) -> String;
}

impl DomKey for str {
    fn dom_key(&self) -> String {
        self.to_string()
    }
}

impl DomKey for String {
    fn dom_key(&self) -> String {
        self.clone()
    }
}

impl DomKey for Locator {
    fn dom_key(&self) -> String {
        self.key()
    }
}

impl DomKey for Selector {
    fn dom_key(&self) -> String {
        self.to_string()
    }
}

/// One simulated element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Text content
    pub text: String,
    /// Input value
    pub value: String,
    /// Rendered
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Checkbox state
    pub checked: bool,
    /// Attributes
    pub attributes: HashMap<String, String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            value: String::new(),
            visible: true,
            enabled: true,
            checked: false,
            attributes: HashMap::new(),
        }
    }
}

impl MockElement {
    /// Visible, enabled element with text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Visible input with a value
    #[must_use]
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Simulated document
#[derive(Debug, Clone, Default)]
pub struct MockDom {
    url: String,
    elements: HashMap<String, Vec<MockElement>>,
}

impl MockDom {
    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replace the current URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Replace a collection
    pub fn set<K: DomKey + ?Sized>(&mut self, key: &K, elements: Vec<MockElement>) {
        self.elements.insert(key.dom_key(), elements);
    }

    /// Append to a collection
    pub fn push<K: DomKey + ?Sized>(&mut self, key: &K, element: MockElement) {
        self.elements.entry(key.dom_key()).or_default().push(element);
    }

    /// Remove element `index`, returning it
    pub fn remove<K: DomKey + ?Sized>(&mut self, key: &K, index: usize) -> Option<MockElement> {
        let list = self.elements.get_mut(&key.dom_key())?;
        (index < list.len()).then(|| list.remove(index))
    }

    /// Empty a collection
    pub fn clear<K: DomKey + ?Sized>(&mut self, key: &K) {
        self.elements.remove(&key.dom_key());
    }

    /// Elements of a collection
    #[must_use]
    pub fn get<K: DomKey + ?Sized>(&self, key: &K) -> &[MockElement] {
        self.elements
            .get(&key.dom_key())
            .map_or(&[][..], Vec::as_slice)
    }

    /// Mutable element
    pub fn get_mut<K: DomKey + ?Sized>(&mut self, key: &K, index: usize) -> Option<&mut MockElement> {
        self.elements.get_mut(&key.dom_key())?.get_mut(index)
    }

    /// Collection size
    #[must_use]
    pub fn count<K: DomKey + ?Sized>(&self, key: &K) -> usize {
        self.get(key).len()
    }

    /// Text of element 0, or empty
    #[must_use]
    pub fn text<K: DomKey + ?Sized>(&self, key: &K) -> String {
        self.get(key).first().map(|e| e.text.clone()).unwrap_or_default()
    }

    /// Value of element `index`, or empty
    #[must_use]
    pub fn value<K: DomKey + ?Sized>(&self, key: &K, index: usize) -> String {
        self.get(key)
            .get(index)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    /// Set the text of element 0, creating it when missing
    pub fn set_text<K: DomKey + ?Sized>(&mut self, key: &K, text: impl Into<String>) {
        let list = self.elements.entry(key.dom_key()).or_default();
        match list.first_mut() {
            Some(el) => el.text = text.into(),
            None => list.push(MockElement::new(text)),
        }
    }

    /// Show or hide every element of a collection
    pub fn set_visible<K: DomKey + ?Sized>(&mut self, key: &K, visible: bool) {
        if let Some(list) = self.elements.get_mut(&key.dom_key()) {
            for el in list {
                el.visible = visible;
            }
        }
    }

    /// Indices matched by `locator`, after scoping and `nth`
    fn resolve(&self, locator: &Locator) -> Vec<usize> {
        let len = self.count(&locator.key());
        let base: Vec<usize> = match locator.parent() {
            Some(parent) => self
                .resolve(parent)
                .into_iter()
                .filter(|&i| i < len)
                .collect(),
            None => (0..len).collect(),
        };
        match locator.index() {
            Some(n) => base.get(n).copied().into_iter().collect(),
            None => base,
        }
    }

    fn target(&self, locator: &Locator) -> Option<(String, usize)> {
        self.resolve(locator)
            .first()
            .map(|&i| (locator.key(), i))
    }

    fn element(&self, locator: &Locator) -> Option<&MockElement> {
        let (key, index) = self.target(locator)?;
        self.get(&key).get(index)
    }
}

/// Click or change hook: DOM plus index of the acted-on element
pub type ElementHook = Arc<dyn Fn(&mut MockDom, usize) + Send + Sync>;

/// Key hook: DOM plus key of the focused collection
pub type KeyHook = Arc<dyn Fn(&mut MockDom, Option<&str>) + Send + Sync>;

/// Navigation hook: DOM plus requested URL
pub type NavigateHook = Arc<dyn Fn(&mut MockDom, &str) + Send + Sync>;

/// Cookie-reset hook
pub type DomHook = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

#[derive(Default)]
struct Hooks {
    click: HashMap<String, ElementHook>,
    change: HashMap<String, ElementHook>,
    key: HashMap<String, KeyHook>,
    navigate: Vec<NavigateHook>,
    clear_cookies: Vec<DomHook>,
}

#[derive(Debug, Default)]
struct Session {
    focused: Option<String>,
    back_stack: Vec<String>,
    navigation_delay: Duration,
    fail_reads: bool,
    closed: bool,
}

/// Mock driver for unit testing
#[derive(Default)]
pub struct MockDriver {
    dom: Mutex<MockDom>,
    hooks: Mutex<Hooks>,
    session: Mutex<Session>,
    call_history: Mutex<Vec<String>>,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("dom", &self.dom)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> ShopResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| ShopError::driver("mock driver state poisoned"))
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock driver around a prepared DOM
    #[must_use]
    pub fn with_dom(dom: MockDom) -> Self {
        Self {
            dom: Mutex::new(dom),
            ..Self::default()
        }
    }

    /// Inspect or edit the DOM
    pub fn dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> ShopResult<R> {
        let mut dom = lock(&self.dom)?;
        Ok(f(&mut dom))
    }

    /// Run `hook` when an element of `key` is clicked
    pub fn on_click<K: DomKey + ?Sized>(
        &self,
        key: &K,
        hook: impl Fn(&mut MockDom, usize) + Send + Sync + 'static,
    ) {
        if let Ok(mut hooks) = lock(&self.hooks) {
            hooks.click.insert(key.dom_key(), Arc::new(hook));
        }
    }

    /// Run `hook` after an element of `key` is filled, selected or toggled
    pub fn on_change<K: DomKey + ?Sized>(
        &self,
        key: &K,
        hook: impl Fn(&mut MockDom, usize) + Send + Sync + 'static,
    ) {
        if let Ok(mut hooks) = lock(&self.hooks) {
            hooks.change.insert(key.dom_key(), Arc::new(hook));
        }
    }

    /// Run `hook` when `key_name` is pressed
    pub fn on_key(
        &self,
        key_name: &str,
        hook: impl Fn(&mut MockDom, Option<&str>) + Send + Sync + 'static,
    ) {
        if let Ok(mut hooks) = lock(&self.hooks) {
            hooks.key.insert(key_name.to_string(), Arc::new(hook));
        }
    }

    /// Run `hook` after every navigation, reload and back
    pub fn on_navigate(&self, hook: impl Fn(&mut MockDom, &str) + Send + Sync + 'static) {
        if let Ok(mut hooks) = lock(&self.hooks) {
            hooks.navigate.push(Arc::new(hook));
        }
    }

    /// Run `hook` when cookies are cleared
    pub fn on_clear_cookies(&self, hook: impl Fn(&mut MockDom) + Send + Sync + 'static) {
        if let Ok(mut hooks) = lock(&self.hooks) {
            hooks.clear_cookies.push(Arc::new(hook));
        }
    }

    /// Delay every navigation by `delay`
    pub fn set_navigation_delay(&self, delay: Duration) {
        if let Ok(mut session) = lock(&self.session) {
            session.navigation_delay = delay;
        }
    }

    /// Make every read fail with a driver error
    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut session) = lock(&self.session) {
            session.fail_reads = fail;
        }
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        lock(&self.call_history)
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Number of calls starting with `prefix`
    #[must_use]
    pub fn call_count(&self, prefix: &str) -> usize {
        lock(&self.call_history)
            .map(|h| h.iter().filter(|c| c.starts_with(prefix)).count())
            .unwrap_or(0)
    }

    /// Whether `close` was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock(&self.session).map(|s| s.closed).unwrap_or(false)
    }

    fn record(&self, call: String) {
        if let Ok(mut history) = lock(&self.call_history) {
            history.push(call);
        }
    }

    fn check_reads(&self) -> ShopResult<()> {
        if lock(&self.session)?.fail_reads {
            return Err(ShopError::driver("page unavailable"));
        }
        Ok(())
    }

    /// Resolve the mutation target, refusing hidden and disabled elements
    fn actionable(&self, locator: &Locator) -> ShopResult<(String, usize)> {
        let dom = lock(&self.dom)?;
        let (key, index) = dom
            .target(locator)
            .ok_or_else(|| ShopError::not_interactable(locator, "no element matches"))?;
        let el = &dom.get(&key)[index];
        if !el.visible {
            return Err(ShopError::not_interactable(locator, "element is hidden"));
        }
        if !el.enabled {
            return Err(ShopError::not_interactable(locator, "element is disabled"));
        }
        Ok((key, index))
    }

    fn fire_change(&self, key: &str, index: usize) -> ShopResult<()> {
        let hook = lock(&self.hooks)?.change.get(key).cloned();
        if let Some(hook) = hook {
            hook(&mut *lock(&self.dom)?, index);
        }
        Ok(())
    }

    async fn load(&self, url: &str, timeout: Duration) -> ShopResult<()> {
        let delay = lock(&self.session)?.navigation_delay;
        if delay > timeout {
            tokio::time::sleep(timeout).await;
            return Err(ShopError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let hooks = lock(&self.hooks)?.navigate.clone();
        let mut dom = lock(&self.dom)?;
        dom.set_url(url);
        for hook in hooks {
            hook(&mut dom, url);
        }
        Ok(())
    }
}

#[async_trait]
impl ShopDriver for MockDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> ShopResult<()> {
        self.record(format!("navigate:{url}"));
        let previous = lock(&self.dom)?.url().to_string();
        self.load(url, timeout).await?;
        let mut session = lock(&self.session)?;
        if !previous.is_empty() {
            session.back_stack.push(previous);
        }
        session.focused = None;
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, _timeout: Duration) -> ShopResult<()> {
        self.record(format!("wait_for_load_state:{state}"));
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> ShopResult<usize> {
        self.check_reads()?;
        Ok(lock(&self.dom)?.resolve(locator).len())
    }

    async fn is_visible(&self, locator: &Locator) -> ShopResult<bool> {
        self.check_reads()?;
        Ok(lock(&self.dom)?.element(locator).is_some_and(|e| e.visible))
    }

    async fn text_content(&self, locator: &Locator) -> ShopResult<Option<String>> {
        self.check_reads()?;
        Ok(lock(&self.dom)?.element(locator).map(|e| e.text.clone()))
    }

    async fn input_value(&self, locator: &Locator) -> ShopResult<Option<String>> {
        self.check_reads()?;
        Ok(lock(&self.dom)?.element(locator).map(|e| e.value.clone()))
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> ShopResult<Option<String>> {
        self.check_reads()?;
        Ok(lock(&self.dom)?
            .element(locator)
            .and_then(|e| e.attributes.get(name).cloned()))
    }

    async fn is_checked(&self, locator: &Locator) -> ShopResult<bool> {
        self.check_reads()?;
        Ok(lock(&self.dom)?.element(locator).is_some_and(|e| e.checked))
    }

    async fn click(&self, locator: &Locator) -> ShopResult<()> {
        self.record(format!("click:{locator}"));
        let (key, index) = self.actionable(locator)?;
        lock(&self.session)?.focused = Some(key.clone());
        let hook = lock(&self.hooks)?.click.get(&key).cloned();
        if let Some(hook) = hook {
            hook(&mut *lock(&self.dom)?, index);
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> ShopResult<()> {
        self.record(format!("fill:{locator}={value}"));
        let (key, index) = self.actionable(locator)?;
        if let Some(el) = lock(&self.dom)?.get_mut(&key, index) {
            el.value = value.to_string();
        }
        lock(&self.session)?.focused = Some(key.clone());
        self.fire_change(&key, index)
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> ShopResult<()> {
        self.record(format!("set_checked:{locator}={checked}"));
        let (key, index) = self.actionable(locator)?;
        if let Some(el) = lock(&self.dom)?.get_mut(&key, index) {
            el.checked = checked;
        }
        self.fire_change(&key, index)
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> ShopResult<()> {
        self.record(format!("select_option:{locator}={value}"));
        let (key, index) = self.actionable(locator)?;
        if let Some(el) = lock(&self.dom)?.get_mut(&key, index) {
            el.value = value.to_string();
        }
        self.fire_change(&key, index)
    }

    async fn scroll_into_view(&self, locator: &Locator) -> ShopResult<()> {
        self.record(format!("scroll_into_view:{locator}"));
        if lock(&self.dom)?.target(locator).is_none() {
            return Err(ShopError::not_interactable(locator, "no element matches"));
        }
        Ok(())
    }

    async fn press_key(&self, key: &str) -> ShopResult<()> {
        self.record(format!("press_key:{key}"));
        let focused = lock(&self.session)?.focused.clone();
        let hook = lock(&self.hooks)?.key.get(key).cloned();
        if let Some(hook) = hook {
            hook(&mut *lock(&self.dom)?, focused.as_deref());
        }
        Ok(())
    }

    async fn screenshot(&self) -> ShopResult<Screenshot> {
        self.record("screenshot".to_string());
        Ok(Screenshot::new(MOCK_PNG.to_vec()))
    }

    async fn current_url(&self) -> ShopResult<String> {
        Ok(lock(&self.dom)?.url().to_string())
    }

    async fn reload(&self, timeout: Duration) -> ShopResult<()> {
        self.record("reload".to_string());
        let url = lock(&self.dom)?.url().to_string();
        self.load(&url, timeout).await
    }

    async fn go_back(&self, timeout: Duration) -> ShopResult<()> {
        self.record("go_back".to_string());
        let previous = lock(&self.session)?.back_stack.pop();
        match previous {
            Some(url) => self.load(&url, timeout).await,
            None => Ok(()),
        }
    }

    async fn clear_cookies(&self) -> ShopResult<()> {
        self.record("clear_cookies".to_string());
        let hooks = lock(&self.hooks)?.clear_cookies.clone();
        let mut dom = lock(&self.dom)?;
        for hook in hooks {
            hook(&mut dom);
        }
        Ok(())
    }

    async fn close(&self) -> ShopResult<()> {
        self.record("close".to_string());
        lock(&self.session)?.closed = true;
        Ok(())
    }
}

/// Builds a fresh [`MockDriver`] per page
pub struct MockDriverFactory {
    build: Box<dyn Fn() -> MockDriver + Send + Sync>,
    opened: AtomicUsize,
}

impl fmt::Debug for MockDriverFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriverFactory")
            .field("opened", &self.opened)
            .finish_non_exhaustive()
    }
}

impl MockDriverFactory {
    /// Create a factory from a builder
    pub fn new(build: impl Fn() -> MockDriver + Send + Sync + 'static) -> Self {
        Self {
            build: Box::new(build),
            opened: AtomicUsize::new(0),
        }
    }

    /// Pages opened so far
    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DriverFactory for MockDriverFactory {
    async fn open_page(&self) -> ShopResult<SharedDriver> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new((self.build)()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const NAV: Duration = Duration::from_millis(200);

    mod dom_tests {
        use super::*;

        #[test]
        fn test_set_and_get() {
            let mut dom = MockDom::default();
            let rows = Locator::new(".cart_item");
            dom.set(&rows, vec![MockElement::new("A"), MockElement::new("B")]);
            assert_eq!(dom.count(&rows), 2);
            assert_eq!(dom.get("css=.cart_item")[1].text, "B");
            assert_eq!(dom.remove(&rows, 0).map(|e| e.text), Some("A".to_string()));
            assert!(dom.remove(&rows, 5).is_none());
        }

        #[test]
        fn test_resolve_nth() {
            let mut dom = MockDom::default();
            let rows = Locator::new(".product");
            dom.set(&rows, vec![MockElement::new("a"), MockElement::new("b")]);
            assert_eq!(dom.resolve(&rows), vec![0, 1]);
            assert_eq!(dom.resolve(&rows.nth(1)), vec![1]);
            assert!(dom.resolve(&rows.nth(2)).is_empty());
        }

        #[test]
        fn test_scoped_resolution_aligns_with_parent() {
            let mut dom = MockDom::default();
            let rows = Locator::new(".cart_item");
            let qty = rows.locator(Selector::css("input.qty"));
            dom.set(&rows, vec![MockElement::new("a"), MockElement::new("b")]);
            dom.set(&qty, vec![MockElement::input("1"), MockElement::input("4")]);
            let second = rows.nth(1).locator(Selector::css("input.qty"));
            assert_eq!(dom.element(&second).map(|e| e.value.as_str()), Some("4"));
        }

        #[test]
        fn test_set_text_creates_element() {
            let mut dom = MockDom::default();
            dom.set_text("css=.cart-count", "3");
            assert_eq!(dom.text("css=.cart-count"), "3");
            dom.set_text("css=.cart-count", "4");
            assert_eq!(dom.count("css=.cart-count"), 1);
        }
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_driver_navigate() {
            let driver = MockDriver::new();
            driver.navigate("https://mybook.ba/", NAV).await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), "https://mybook.ba/");
            assert!(driver.was_called("navigate:https://mybook.ba/"));
        }

        #[tokio::test]
        async fn test_navigation_delay_times_out() {
            let driver = MockDriver::new();
            driver.set_navigation_delay(Duration::from_millis(50));
            let err = driver
                .navigate("https://mybook.ba/", Duration::from_millis(10))
                .await
                .unwrap_err();
            assert!(matches!(err, ShopError::NavigationTimeout { timeout_ms: 10, .. }));
        }

        #[tokio::test]
        async fn test_click_runs_hook() {
            let driver = MockDriver::new();
            let button = Locator::new("button.add");
            driver
                .dom(|dom| dom.set(&button, vec![MockElement::new("Add")]))
                .unwrap();
            driver.on_click(&button, |dom, _| dom.set_text("css=.cart-count", "1"));
            driver.click(&button).await.unwrap();
            let count = driver
                .text_content(&Locator::new(".cart-count"))
                .await
                .unwrap();
            assert_eq!(count.as_deref(), Some("1"));
        }

        #[tokio::test]
        async fn test_click_hidden_is_not_interactable() {
            let driver = MockDriver::new();
            let button = Locator::new("button.add");
            driver
                .dom(|dom| dom.set(&button, vec![MockElement::new("Add").hidden()]))
                .unwrap();
            let err = driver.click(&button).await.unwrap_err();
            assert!(matches!(err, ShopError::ElementNotInteractable { .. }));
            assert!(err.to_string().contains("hidden"));
        }

        #[tokio::test]
        async fn test_click_missing_is_not_interactable() {
            let driver = MockDriver::new();
            let err = driver.click(&Locator::new("#nope")).await.unwrap_err();
            assert!(err.to_string().contains("no element matches"));
        }

        #[tokio::test]
        async fn test_fill_disabled_is_refused() {
            let driver = MockDriver::new();
            let input = Locator::new("#username");
            driver
                .dom(|dom| dom.set(&input, vec![MockElement::input("").disabled()]))
                .unwrap();
            assert!(driver.fill(&input, "x").await.is_err());
        }

        #[tokio::test]
        async fn test_press_key_sees_focus() {
            let driver = MockDriver::new();
            let search = Locator::new("input[name='s']");
            driver
                .dom(|dom| dom.set(&search, vec![MockElement::input("")]))
                .unwrap();
            driver.on_key("Enter", |dom, focused| {
                let query = focused.map(|k| dom.value(k, 0)).unwrap_or_default();
                dom.set_url(format!("https://mybook.ba/?s={query}"));
            });
            driver.fill(&search, "roman").await.unwrap();
            driver.press_key("Enter").await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), "https://mybook.ba/?s=roman");
        }

        #[tokio::test]
        async fn test_go_back_returns_to_previous_url() {
            let driver = MockDriver::new();
            driver.navigate("https://mybook.ba/", NAV).await.unwrap();
            driver.navigate("https://mybook.ba/cart/", NAV).await.unwrap();
            driver.go_back(NAV).await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), "https://mybook.ba/");
        }

        #[tokio::test]
        async fn test_fail_reads() {
            let driver = MockDriver::new();
            driver.set_fail_reads(true);
            assert!(driver.count(&Locator::new("a")).await.is_err());
        }

        #[tokio::test]
        async fn test_factory_counts_pages() {
            let factory = MockDriverFactory::new(MockDriver::new);
            let page = factory.open_page().await.unwrap();
            page.close().await.unwrap();
            let _ = factory.open_page().await.unwrap();
            assert_eq!(factory.opened(), 2);
        }
    }
}
