//! Search results listing.

use crate::base_page::BasePage;
use crate::config::LocatorStrategy;
use crate::locator::{AriaRole, Locator, Selector, TextMatch};
use crate::page_object::{query_param, PageObject};
use crate::result::ShopResult;
use tracing::{debug, warn};

/// Search results locators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLocators {
    pub product_cards: Locator,
    pub result_count: Locator,
    pub no_results_message: Locator,
    /// Title, scoped under a product card
    pub product_title: Selector,
    /// Price, scoped under a product card
    pub product_price: Selector,
    pub add_to_cart_buttons: Locator,
    /// "View cart" link inserted after an AJAX add
    pub added_to_cart_link: Locator,
    pub order_by: Locator,
    pub pagination: Locator,
    pub next_page: Locator,
    pub previous_page: Locator,
}

impl SearchLocators {
    /// CSS class and attribute selectors
    #[must_use]
    pub fn structural() -> Self {
        Self {
            product_cards: Locator::new(r#".product, [class*="product-item"]"#),
            result_count: Locator::new(".woocommerce-result-count, .result-count"),
            no_results_message: Locator::from_selector(Selector::any([
                Selector::css(".woocommerce-info, .no-results"),
                Selector::has_text("p", "No products found"),
            ])),
            product_title: Selector::css(".woocommerce-loop-product__title, h2, h3"),
            product_price: Selector::css(".price, .amount"),
            add_to_cart_buttons: Locator::from_selector(Selector::any([
                Selector::has_text("a", "Dodaj u korpu"),
                Selector::css(".add_to_cart_button"),
            ])),
            added_to_cart_link: Locator::new("a.added_to_cart"),
            order_by: Locator::new(r#".orderby, select[name="orderby"]"#),
            pagination: Locator::new(".woocommerce-pagination, .pagination"),
            next_page: Locator::new(".next.page-numbers"),
            previous_page: Locator::new(".prev.page-numbers"),
        }
    }

    /// ARIA roles and visible text
    #[must_use]
    pub fn semantic() -> Self {
        Self {
            no_results_message: Locator::from_selector(Selector::any([
                Selector::css(".woocommerce-info"),
                Selector::text_pattern("no products (were )?found|nema proizvoda"),
            ])),
            product_title: Selector::role(AriaRole::Heading),
            add_to_cart_buttons: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::pattern("add to cart|dodaj u korpu"),
            )),
            order_by: Locator::from_selector(Selector::role(AriaRole::Combobox)),
            pagination: Locator::from_selector(Selector::any([
                Selector::role(AriaRole::Navigation),
                Selector::css(".woocommerce-pagination"),
            ])),
            next_page: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("^(next|→|sljede)"),
            )),
            previous_page: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("^(previous|prev|←|prethod)"),
            )),
            ..Self::structural()
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
}

/// Search results page
#[derive(Debug, Clone)]
pub struct SearchPage {
    base: BasePage,
    locators: SearchLocators,
}

impl PageObject for SearchPage {
    fn url_pattern(&self) -> &str {
        "/**"
    }

    fn page_name(&self) -> &str {
        "search"
    }

    /// Any storefront URL carrying the `s` query parameter
    fn is_current(&self, url: &str) -> bool {
        query_param(url, "s").is_some()
    }
}

impl SearchPage {
    /// Page using the configured locator strategy
    #[must_use]
    pub fn new(base: BasePage) -> Self {
        let locators = SearchLocators::for_strategy(base.config().strategy);
        Self { base, locators }
    }

    /// Page with an explicit catalog
    #[must_use]
    pub const fn with_locators(base: BasePage, locators: SearchLocators) -> Self {
        Self { base, locators }
    }

    /// Locator catalog in use
    #[must_use]
    pub const fn locators(&self) -> &SearchLocators {
        &self.locators
    }

    /// Underlying interaction layer
    #[must_use]
    pub const fn base(&self) -> &BasePage {
        &self.base
    }

    /// Number of product cards, 0 when none or unreadable
    pub async fn get_result_count(&self) -> usize {
        self.base.count(&self.locators.product_cards).await
    }

    /// Whether any product card is listed
    pub async fn has_results(&self) -> bool {
        self.get_result_count().await > 0
    }

    /// Whether the no-products notice is shown
    pub async fn has_no_results(&self) -> bool {
        self.base
            .is_visible(&self.locators.no_results_message)
            .await
    }

    /// Text of the no-products notice, empty when absent
    pub async fn get_no_results_message(&self) -> String {
        if self.has_no_results().await {
            self.base.get_text(&self.locators.no_results_message).await
        } else {
            String::new()
        }
    }

    /// Text such as "Prikazano 1–16 od 40 rezultata"
    pub async fn get_result_count_text(&self) -> String {
        if self.base.is_visible(&self.locators.result_count).await {
            self.base.get_text(&self.locators.result_count).await
        } else {
            String::new()
        }
    }

    fn card_part(&self, index: usize, part: &Selector) -> Locator {
        self.locators
            .product_cards
            .nth(index)
            .locator(part.clone())
    }

    /// Trimmed, non-empty titles of the result cards, in order
    pub async fn get_product_titles(&self) -> Vec<String> {
        let count = self.get_result_count().await;
        let mut titles = Vec::with_capacity(count);
        for i in 0..count {
            let title = self
                .base
                .get_text(&self.card_part(i, &self.locators.product_title))
                .await;
            if !title.is_empty() {
                titles.push(title);
            }
        }
        titles
    }

    /// Price of result `index`, empty when absent
    pub async fn get_product_price(&self, index: usize) -> String {
        self.base
            .get_text(&self.card_part(index, &self.locators.product_price))
            .await
    }

    /// Open result `index`
    pub async fn click_product(&self, index: usize) -> ShopResult<()> {
        self.base
            .click(&self.locators.product_cards.nth(index))
            .await?;
        self.base.wait_for_navigation().await
    }

    /// Open the first result
    pub async fn click_first_product(&self) -> ShopResult<()> {
        self.click_product(0).await
    }

    /// Click "Add to cart" on result `index`; waits briefly for the AJAX confirmation
    pub async fn add_to_cart_from_results(&self, index: usize) -> ShopResult<()> {
        let button = self.locators.add_to_cart_buttons.nth(index);
        self.base.scroll_into_view(&button).await?;
        self.base.click(&button).await?;
        let confirmed = self
            .base
            .is_visible_within(
                &self.locators.added_to_cart_link,
                self.base.config().timeouts.action(),
            )
            .await;
        if confirmed {
            debug!(index, "add to cart from results");
        } else {
            warn!(index, "no view-cart link after the timeout");
        }
        Ok(())
    }

    /// Case-insensitive substring match against any result title
    pub async fn has_product_with_text(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.get_product_titles()
            .await
            .iter()
            .any(|title| title.to_lowercase().contains(&needle))
    }

    /// Like [`Self::has_product_with_text`]
    pub async fn has_product(&self, name: &str) -> bool {
        self.has_product_with_text(name).await
    }

    /// `false` when there are no titles at all
    pub async fn results_contain_keyword(&self, keyword: &str) -> bool {
        self.has_product_with_text(keyword).await
    }

    /// Pick an ordering (`price`, `date`, `popularity`, ...); no-op without the dropdown
    pub async fn sort_by(&self, option: &str) -> ShopResult<()> {
        if self.base.is_visible(&self.locators.order_by).await {
            self.base
                .select_option(&self.locators.order_by.first(), option)
                .await?;
            self.base.wait_for_navigation().await?;
        }
        Ok(())
    }

    /// Whether pagination links are shown
    pub async fn has_pagination(&self) -> bool {
        self.base.is_visible(&self.locators.pagination).await
    }

    /// Follow the next-page link when shown
    pub async fn go_to_next_page(&self) -> ShopResult<()> {
        self.follow_if_visible(&self.locators.next_page).await
    }

    /// Follow the previous-page link when shown
    pub async fn go_to_previous_page(&self) -> ShopResult<()> {
        self.follow_if_visible(&self.locators.previous_page).await
    }

    async fn follow_if_visible(&self, link: &Locator) -> ShopResult<()> {
        let link = link.first();
        if self.base.is_visible(&link).await {
            self.base.click(&link).await?;
            self.base.wait_for_navigation().await?;
        }
        Ok(())
    }

    /// Wait until either result cards or the no-results notice is shown
    pub async fn wait_for_results(&self) -> ShopResult<()> {
        let timeout = self.base.config().timeouts.element_wait();
        self.base
            .wait_until("search results or empty notice", timeout, move || async move {
                self.base.is_visible_now(&self.locators.product_cards).await
                    || self
                        .base
                        .is_visible_now(&self.locators.no_results_message)
                        .await
            })
            .await
    }
}
