//! Cart page.
//!
//! Row accessors take a zero-based index into the rows as currently
//! rendered. Row parts (name, price, quantity, remove link) are scoped
//! under their row, so index `i` always addresses the same line item.

use crate::base_page::BasePage;
use crate::config::LocatorStrategy;
use crate::locator::{AriaRole, Locator, Selector, TextMatch};
use crate::page_object::PageObject;
use crate::result::ShopResult;
use tracing::{debug, warn};

/// Path of the cart listing on this storefront
pub const CART_PATH: &str = "/shop/";

/// Cart locators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLocators {
    pub cart_table: Locator,
    pub cart_rows: Locator,
    /// Scoped under a row
    pub item_name: Selector,
    /// Scoped under a row
    pub item_price: Selector,
    /// Scoped under a row
    pub item_quantity: Selector,
    /// Scoped under a row
    pub remove_button: Selector,
    pub update_cart_button: Locator,
    pub subtotal: Locator,
    pub shipping_cost: Locator,
    pub total: Locator,
    pub checkout_button: Locator,
    pub empty_cart_message: Locator,
    pub update_message: Locator,
    pub error_message: Locator,
}

impl CartLocators {
    /// CSS class and attribute selectors
    #[must_use]
    pub fn structural() -> Self {
        Self {
            cart_table: Locator::new(".shop_table, .cart-table, table"),
            cart_rows: Locator::new(r#".cart_item, tr.cart-item, [class*="cart-item"]"#),
            item_name: Selector::css(".product-name a, td.product-name"),
            item_price: Selector::css(r#".product-price, td[data-title*="Price"], .amount"#),
            item_quantity: Selector::css(r#"input.qty, input[type="number"]"#),
            remove_button: Selector::css(r#".remove, a.remove, [class*="remove"]"#),
            update_cart_button: Locator::from_selector(Selector::any([
                Selector::css(r#"button[name="update_cart"], input[name="update_cart"]"#),
                Selector::has_text("button", "Update cart"),
            ])),
            subtotal: Locator::new(r#".cart-subtotal .amount, [class*="subtotal"] .amount"#),
            shipping_cost: Locator::new(r#".shipping .amount, [class*="shipping"] .amount"#),
            total: Locator::new(".order-total .amount, .cart-total .amount"),
            checkout_button: Locator::from_selector(Selector::any([
                Selector::css("a.checkout-button, .wc-proceed-to-checkout a"),
                Selector::has_text("a", "Proceed to checkout"),
            ])),
            empty_cart_message: Locator::new(".cart-empty, .woocommerce-info"),
            update_message: Locator::new(".woocommerce-message"),
            error_message: Locator::new(".woocommerce-error"),
        }
    }

    /// ARIA roles and visible text
    #[must_use]
    pub fn semantic() -> Self {
        Self {
            remove_button: Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("remove|ukloni|×"),
            ),
            update_cart_button: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::pattern("update cart|ažuriraj"),
            )),
            checkout_button: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("proceed to checkout|plaćanje|naplata"),
            )),
            error_message: Locator::from_selector(Selector::any([
                Selector::role(AriaRole::Alert),
                Selector::css(".woocommerce-error"),
            ])),
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

/// Cart page
#[derive(Debug, Clone)]
pub struct CartPage {
    base: BasePage,
    locators: CartLocators,
}

impl PageObject for CartPage {
    fn url_pattern(&self) -> &str {
        CART_PATH
    }

    fn page_name(&self) -> &str {
        "cart"
    }
}

impl CartPage {
    /// Page using the configured locator strategy
    #[must_use]
    pub fn new(base: BasePage) -> Self {
        let locators = CartLocators::for_strategy(base.config().strategy);
        Self { base, locators }
    }

    /// Page with an explicit catalog
    #[must_use]
    pub const fn with_locators(base: BasePage, locators: CartLocators) -> Self {
        Self { base, locators }
    }

    /// Locator catalog in use
    #[must_use]
    pub const fn locators(&self) -> &CartLocators {
        &self.locators
    }

    /// Underlying interaction layer
    #[must_use]
    pub const fn base(&self) -> &BasePage {
        &self.base
    }

    fn row_part(&self, index: usize, part: &Selector) -> Locator {
        self.locators.cart_rows.nth(index).locator(part.clone())
    }

    /// Open the cart page directly
    pub async fn navigate_to_cart(&self) -> ShopResult<()> {
        self.base.goto(CART_PATH).await?;
        self.base.wait_for_navigation().await
    }

    /// Number of line items, 0 when none or unreadable
    pub async fn get_cart_item_count(&self) -> usize {
        self.base.count(&self.locators.cart_rows).await
    }

    /// Name of row `index`, empty when absent
    pub async fn get_item_name(&self, index: usize) -> String {
        self.base
            .get_text(&self.row_part(index, &self.locators.item_name))
            .await
    }

    /// Unit price of row `index`, empty when absent
    pub async fn get_item_price(&self, index: usize) -> String {
        self.base
            .get_text(&self.row_part(index, &self.locators.item_price))
            .await
    }

    /// Quantity of row `index`, 1 when unreadable
    pub async fn get_item_quantity(&self, index: usize) -> u32 {
        self.base
            .input_value(&self.row_part(index, &self.locators.item_quantity))
            .await
            .trim()
            .parse()
            .unwrap_or(1)
    }

    /// Set row `index` to `quantity`, submit, and wait for the new value
    pub async fn update_item_quantity(&self, index: usize, quantity: u32) -> ShopResult<()> {
        let input = self.row_part(index, &self.locators.item_quantity);
        self.base.clear_input(&input).await?;
        self.base.fill(&input, &quantity.to_string()).await?;
        self.click_update_cart().await?;

        let timeout = self.base.config().timeouts.action();
        let settled = self
            .base
            .poll("cart quantity updated", timeout, move || async move {
                self.get_item_quantity(index).await == quantity
            })
            .await;
        if settled {
            debug!(index, quantity, "update cart quantity");
        } else {
            warn!(index, quantity, "cart quantity did not settle before the timeout");
        }
        Ok(())
    }

    /// Remove row `index` and wait for the row count to drop
    pub async fn remove_item(&self, index: usize) -> ShopResult<()> {
        let before = self.get_cart_item_count().await;
        self.base
            .click(&self.row_part(index, &self.locators.remove_button))
            .await?;

        let timeout = self.base.config().timeouts.action();
        let settled = self
            .base
            .poll("cart row removed", timeout, move || async move {
                self.get_cart_item_count().await < before
            })
            .await;
        if settled {
            debug!(index, before, "remove cart item");
        } else {
            warn!(index, before, "cart row still present after the timeout");
        }
        Ok(())
    }

    /// Submit the cart form when the button is shown
    pub async fn click_update_cart(&self) -> ShopResult<()> {
        let button = self.locators.update_cart_button.first();
        if self.base.is_visible(&button).await {
            self.base.click(&button).await?;
            self.base.wait_for_navigation().await?;
        }
        Ok(())
    }

    async fn money(&self, locator: &Locator) -> String {
        if self.base.is_visible(locator).await {
            self.base.get_text(locator).await
        } else {
            "0".to_string()
        }
    }

    /// Subtotal text, `"0"` when not shown
    pub async fn get_subtotal(&self) -> String {
        self.money(&self.locators.subtotal).await
    }

    /// Total text, `"0"` when not shown
    pub async fn get_total(&self) -> String {
        self.money(&self.locators.total).await
    }

    /// Shipping text, `"0"` when not shown
    pub async fn get_shipping_cost(&self) -> String {
        self.money(&self.locators.shipping_cost).await
    }

    /// Click the checkout button and wait for the next page
    pub async fn proceed_to_checkout(&self) -> ShopResult<()> {
        let button = self.locators.checkout_button.first();
        self.base.wait_visible(&button).await?;
        self.base.click(&button).await?;
        self.base.wait_for_navigation().await
    }

    /// Whether the empty-cart notice is shown
    pub async fn is_cart_empty(&self) -> bool {
        self.base
            .is_visible(&self.locators.empty_cart_message)
            .await
    }

    /// Whether the "cart updated" notice is shown
    pub async fn is_update_message_visible(&self) -> bool {
        self.base.is_visible(&self.locators.update_message).await
    }

    /// Whether the checkout button is shown
    pub async fn is_checkout_button_visible(&self) -> bool {
        self.base.is_visible(&self.locators.checkout_button).await
    }

    /// Names of all rows in order
    pub async fn get_all_item_names(&self) -> Vec<String> {
        let count = self.get_cart_item_count().await;
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            names.push(self.get_item_name(i).await);
        }
        names
    }

    /// Wait for the cart table or the empty notice; logs and returns on timeout
    pub async fn wait_for_cart_page(&self) {
        let timeout = self.base.config().timeouts.element_wait();
        let shown = self
            .base
            .poll("cart table or empty notice", timeout, move || async move {
                self.base.is_visible_now(&self.locators.cart_table).await
                    || self
                        .base
                        .is_visible_now(&self.locators.empty_cart_message)
                        .await
            })
            .await;
        if !shown {
            warn!("cart page elements not found");
        }
    }

    /// Remove every row, highest index first
    pub async fn clear_cart(&self) -> ShopResult<()> {
        let count = self.get_cart_item_count().await;
        for index in (0..count).rev() {
            self.remove_item(index).await?;
        }
        Ok(())
    }
}
