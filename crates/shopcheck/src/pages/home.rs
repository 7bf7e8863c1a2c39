//! Home page: header search, cart badge, product listing, category menu.

use super::first_number;
use super::login::ACCOUNT_LINK_PATTERN;
use crate::base_page::BasePage;
use crate::config::LocatorStrategy;
use crate::locator::{AriaRole, Locator, Selector, TextMatch};
use crate::page_object::PageObject;
use crate::result::ShopResult;
use tracing::{debug, warn};

/// Home page locators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLocators {
    pub search_input: Locator,
    pub search_button: Locator,
    pub login_link: Locator,
    pub cart_icon: Locator,
    pub cart_count: Locator,
    pub main_menu: Locator,
    pub product_cards: Locator,
    /// Title, scoped under a product card
    pub product_title: Selector,
    /// Price, scoped under a product card
    pub product_price: Selector,
    pub add_to_cart_buttons: Locator,
    pub user_menu: Locator,
    pub logout_link: Locator,
}

impl HomeLocators {
    /// CSS class and attribute selectors
    #[must_use]
    pub fn structural() -> Self {
        Self {
            search_input: Locator::new(r#"input[type="search"], input[name="s"], .search-field"#),
            search_button: Locator::new(r#"button[type="submit"].search-submit, .search-submit"#),
            login_link: Locator::from_selector(Selector::Text(TextMatch::Exact("Login".into()))),
            cart_icon: Locator::new(
                r#"a[href*="shop"], a[href*="cart"], .cart-icon, [class*="cart"]"#,
            ),
            cart_count: Locator::new(r#".cart-count, .cart-items-count, [class*="cart-count"]"#),
            main_menu: Locator::new("nav, .main-navigation, .menu"),
            product_cards: Locator::new(r#".product, [class*="product-item"]"#),
            product_title: Selector::css(".product-title, h2, h3"),
            product_price: Selector::css(r#".price, [class*="price"]"#),
            add_to_cart_buttons: Locator::from_selector(Selector::any([
                Selector::has_text("a, button", "Dodaj u korpu"),
                Selector::css(".add-to-cart"),
            ])),
            user_menu: Locator::from_selector(Selector::CssWithText {
                css: ".user-menu a, a".to_string(),
                text: TextMatch::pattern(ACCOUNT_LINK_PATTERN),
            }),
            logout_link: Locator::from_selector(Selector::Text(TextMatch::Exact("Logout".into()))),
        }
    }

    /// ARIA roles and visible text
    #[must_use]
    pub fn semantic() -> Self {
        Self {
            search_input: Locator::from_selector(Selector::role_named(
                AriaRole::Textbox,
                TextMatch::pattern("search|pretra"),
            )),
            search_button: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::pattern("search|pretra"),
            )),
            login_link: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern(r"^\s*(login|prijava)\s*$"),
            )),
            cart_icon: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("cart|korpa"),
            )),
            cart_count: Locator::new(r#".cart-count, .cart-items-count, [class*="cart-count"]"#),
            main_menu: Locator::from_selector(Selector::role(AriaRole::Navigation)),
            product_cards: Locator::new(r#".product, [class*="product-item"]"#),
            product_title: Selector::role(AriaRole::Heading),
            product_price: Selector::css(".price"),
            add_to_cart_buttons: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::pattern("Add to cart"),
            )),
            user_menu: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("my account|moj račun|odjava|logout"),
            )),
            logout_link: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("logout|odjava"),
            )),
        }
    }

    /// Catalog for `strategy`
    #[must_use]
    pub fn for_strategy(strategy: LocatorStrategy) -> Self {
        match strategy {
            LocatorStrategy::Structural => Self::structural(),
            LocatorStrategy::Semantic => Self::semantic(),
        }
    }

    /// Menu link for a category
    #[must_use]
    pub fn category_link(strategy: LocatorStrategy, name: &str) -> Locator {
        match strategy {
            LocatorStrategy::Structural => Locator::from_selector(Selector::has_text("a", name)),
            LocatorStrategy::Semantic => Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::Contains(name.to_string()),
            )),
        }
    }
}

/// Home page
#[derive(Debug, Clone)]
pub struct HomePage {
    base: BasePage,
    locators: HomeLocators,
}

impl PageObject for HomePage {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "home"
    }
}

impl HomePage {
    /// Home page using the configured locator strategy
    #[must_use]
    pub fn new(base: BasePage) -> Self {
        let locators = HomeLocators::for_strategy(base.config().strategy);
        Self { base, locators }
    }

    /// Home page with an explicit catalog
    #[must_use]
    pub const fn with_locators(base: BasePage, locators: HomeLocators) -> Self {
        Self { base, locators }
    }

    /// Locator catalog in use
    #[must_use]
    pub const fn locators(&self) -> &HomeLocators {
        &self.locators
    }

    /// Underlying interaction layer
    #[must_use]
    pub const fn base(&self) -> &BasePage {
        &self.base
    }

    /// Open the storefront root
    pub async fn navigate_to_home(&self) -> ShopResult<()> {
        self.base.goto("/").await?;
        self.base.wait_for_navigation().await
    }

    /// Type a keyword in the header search and press Enter
    pub async fn search(&self, keyword: &str) -> ShopResult<()> {
        self.base.wait_visible(&self.locators.search_input).await?;
        self.base.fill(&self.locators.search_input, keyword).await?;
        self.base.press_key("Enter").await?;
        self.base.wait_for_navigation().await
    }

    /// Type a keyword and click the search button
    pub async fn search_with_button(&self, keyword: &str) -> ShopResult<()> {
        self.base.wait_visible(&self.locators.search_input).await?;
        self.base.fill(&self.locators.search_input, keyword).await?;
        self.base.click(&self.locators.search_button).await?;
        self.base.wait_for_navigation().await
    }

    /// Follow the menu link for `category`
    pub async fn navigate_to_category(&self, category: &str) -> ShopResult<()> {
        let link = HomeLocators::category_link(self.base.config().strategy, category);
        self.base.wait_visible(&link).await?;
        self.base.click(&link).await?;
        self.base.wait_for_navigation().await
    }

    /// Number shown on the cart badge, 0 when absent or unreadable
    pub async fn get_cart_count(&self) -> u32 {
        let text = self.base.get_text(&self.locators.cart_count).await;
        first_number(&text).unwrap_or(0)
    }

    /// Click the header cart icon
    pub async fn go_to_cart(&self) -> ShopResult<()> {
        self.base.click(&self.locators.cart_icon.first()).await?;
        self.base.wait_for_navigation().await
    }

    /// Open the first listed product
    pub async fn click_first_product(&self) -> ShopResult<()> {
        self.click_product_by_index(0).await
    }

    /// Open listed product `index`
    pub async fn click_product_by_index(&self, index: usize) -> ShopResult<()> {
        self.base.wait_visible(&self.locators.product_cards).await?;
        self.base
            .click(&self.locators.product_cards.nth(index))
            .await?;
        self.base.wait_for_navigation().await
    }

    /// Number of product cards on the page
    pub async fn get_product_count(&self) -> usize {
        self.base.count(&self.locators.product_cards).await
    }

    /// Whether an account or logout link is shown
    pub async fn is_logged_in(&self) -> bool {
        self.base.is_visible(&self.locators.user_menu).await
    }

    /// Whether the header search input is shown
    pub async fn is_search_visible(&self) -> bool {
        self.base.is_visible(&self.locators.search_input).await
    }

    /// Trimmed, non-empty titles of the listed products, in order
    pub async fn get_product_titles(&self) -> Vec<String> {
        let count = self.get_product_count().await;
        let mut titles = Vec::with_capacity(count);
        for i in 0..count {
            let title = self
                .base
                .get_text(
                    &self
                        .locators
                        .product_cards
                        .nth(i)
                        .locator(self.locators.product_title.clone()),
                )
                .await;
            if !title.is_empty() {
                titles.push(title);
            }
        }
        titles
    }

    /// Follow the header login link
    pub async fn click_login(&self) -> ShopResult<()> {
        self.base.click(&self.locators.login_link.first()).await?;
        self.base.wait_for_navigation().await
    }

    /// Wait until at least one product card is shown
    pub async fn wait_for_products(&self) -> ShopResult<()> {
        self.base.wait_visible(&self.locators.product_cards).await
    }

    /// Scroll the first product card into view
    pub async fn scroll_to_products(&self) -> ShopResult<()> {
        self.base
            .scroll_into_view(&self.locators.product_cards.first())
            .await
    }

    /// Click the `index`-th listing "Add to cart" button.
    ///
    /// Waits for the badge to move past its previous value; after the action
    /// timeout it logs a warning and returns, leaving the caller's assertion
    /// to report the observed count.
    pub async fn add_to_cart_by_index(&self, index: usize) -> ShopResult<()> {
        let before = self.get_cart_count().await;
        let button = self.locators.add_to_cart_buttons.nth(index);
        self.base.wait_visible(&button).await?;
        self.base.scroll_into_view(&button).await?;
        self.base.click(&button).await?;

        let timeout = self.base.config().timeouts.action();
        let settled = self
            .base
            .poll("cart count increments", timeout, move || async move {
                self.get_cart_count().await > before
            })
            .await;
        if settled {
            debug!(index, before, "add to cart from listing");
        } else {
            warn!(index, before, "cart badge did not move after the timeout");
        }
        Ok(())
    }

    /// Click the first listing "Add to cart" button
    pub async fn add_first_to_cart(&self) -> ShopResult<()> {
        self.add_to_cart_by_index(0).await
    }
}
