//! Product detail page.

use crate::base_page::BasePage;
use crate::config::LocatorStrategy;
use crate::locator::{AriaRole, Locator, Selector, TextMatch};
use crate::page_object::PageObject;
use crate::result::ShopResult;
use tracing::{debug, warn};

/// Product detail locators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLocators {
    pub title: Locator,
    pub price: Locator,
    pub description: Locator,
    pub image: Locator,
    pub add_to_cart_button: Locator,
    pub quantity_input: Locator,
    pub quantity_increase: Locator,
    pub quantity_decrease: Locator,
    pub added_to_cart_message: Locator,
    pub view_cart_link: Locator,
    pub in_stock: Locator,
    pub out_of_stock: Locator,
}

impl ProductLocators {
    /// CSS class and attribute selectors
    #[must_use]
    pub fn structural() -> Self {
        Self {
            title: Locator::new("h1.product-title, h1, .product_title"),
            price: Locator::new(r#".price, .amount, [class*="price"]"#),
            description: Locator::new(
                r#".product-description, .description, [class*="description"]"#,
            ),
            image: Locator::new(".product-image img, .wp-post-image"),
            add_to_cart_button: Locator::from_selector(Selector::any([
                Selector::has_text("button, a", "Dodaj u korpu"),
                Selector::css(".single_add_to_cart_button"),
            ])),
            quantity_input: Locator::new(r#"input[type="number"], input.qty, [name="quantity"]"#),
            quantity_increase: Locator::new(".quantity-up, .plus"),
            quantity_decrease: Locator::new(".quantity-down, .minus"),
            added_to_cart_message: Locator::new(
                r#".woocommerce-message, .added-to-cart-message, [class*="success"]"#,
            ),
            view_cart_link: Locator::from_selector(Selector::any([
                Selector::has_text("a", "View cart"),
                Selector::css(r#"a[href*="cart"]"#),
            ])),
            in_stock: Locator::new(".in-stock"),
            out_of_stock: Locator::new(".out-of-stock"),
        }
    }

    /// ARIA roles and visible text
    #[must_use]
    pub fn semantic() -> Self {
        Self {
            title: Locator::from_selector(Selector::role(AriaRole::Heading)),
            add_to_cart_button: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::pattern("add to cart|dodaj u korpu"),
            )),
            added_to_cart_message: Locator::from_selector(Selector::any([
                Selector::role(AriaRole::Alert),
                Selector::css(".woocommerce-message"),
            ])),
            view_cart_link: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("view cart|pogledaj korpu"),
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

/// Product detail page
#[derive(Debug, Clone)]
pub struct ProductPage {
    base: BasePage,
    locators: ProductLocators,
}

impl PageObject for ProductPage {
    fn url_pattern(&self) -> &str {
        "/product/:slug"
    }

    fn page_name(&self) -> &str {
        "product"
    }
}

impl ProductPage {
    /// Page using the configured locator strategy
    #[must_use]
    pub fn new(base: BasePage) -> Self {
        let locators = ProductLocators::for_strategy(base.config().strategy);
        Self { base, locators }
    }

    /// Page with an explicit catalog
    #[must_use]
    pub const fn with_locators(base: BasePage, locators: ProductLocators) -> Self {
        Self { base, locators }
    }

    /// Locator catalog in use
    #[must_use]
    pub const fn locators(&self) -> &ProductLocators {
        &self.locators
    }

    /// Underlying interaction layer
    #[must_use]
    pub const fn base(&self) -> &BasePage {
        &self.base
    }

    /// Heading of the product page
    pub async fn get_product_title(&self) -> ShopResult<String> {
        let title = self.locators.title.first();
        self.base.wait_visible(&title).await?;
        Ok(self.base.get_text(&title).await)
    }

    /// Displayed price, e.g. `24,90KM`
    pub async fn get_product_price(&self) -> ShopResult<String> {
        let price = self.locators.price.first();
        self.base.wait_visible(&price).await?;
        Ok(self.base.get_text(&price).await)
    }

    /// Click "Add to cart" and wait for the confirmation banner.
    ///
    /// A missing banner is not an error here; callers assert on the cart.
    pub async fn add_to_cart(&self) -> ShopResult<()> {
        let button = self.locators.add_to_cart_button.first();
        self.base.wait_visible(&button).await?;
        self.base.click(&button).await?;
        let confirmed = self
            .base
            .is_visible_within(
                &self.locators.added_to_cart_message,
                self.base.config().timeouts.action(),
            )
            .await;
        if confirmed {
            debug!("add to cart from product page");
        } else {
            warn!("no added-to-cart message after the timeout");
        }
        Ok(())
    }

    /// Overwrite the quantity input; no-op when the page has none
    pub async fn set_quantity(&self, quantity: u32) -> ShopResult<()> {
        if self.base.is_visible(&self.locators.quantity_input).await {
            self.base.clear_input(&self.locators.quantity_input).await?;
            self.base
                .fill(&self.locators.quantity_input, &quantity.to_string())
                .await?;
        }
        Ok(())
    }

    /// Click the quantity plus control when shown
    pub async fn increase_quantity(&self) -> ShopResult<()> {
        self.step_quantity(&self.locators.quantity_increase).await
    }

    /// Click the quantity minus control when shown
    pub async fn decrease_quantity(&self) -> ShopResult<()> {
        self.step_quantity(&self.locators.quantity_decrease).await
    }

    async fn step_quantity(&self, control: &Locator) -> ShopResult<()> {
        let control = control.first();
        if self.base.is_visible(&control).await {
            self.base.click(&control).await?;
        }
        Ok(())
    }

    /// Quantity input value, 1 when absent or unreadable
    pub async fn get_quantity(&self) -> u32 {
        if !self.base.is_visible(&self.locators.quantity_input).await {
            return 1;
        }
        self.base
            .input_value(&self.locators.quantity_input)
            .await
            .trim()
            .parse()
            .unwrap_or(1)
    }

    /// Whether the added-to-cart notice is shown
    pub async fn is_added_to_cart_message_visible(&self) -> bool {
        self.base
            .is_visible(&self.locators.added_to_cart_message)
            .await
    }

    /// Follow the notice's view-cart link
    pub async fn click_view_cart(&self) -> ShopResult<()> {
        let link = self.locators.view_cart_link.first();
        self.base.wait_visible(&link).await?;
        self.base.click(&link).await?;
        self.base.wait_for_navigation().await
    }

    /// In stock unless an out-of-stock marker is shown
    pub async fn is_in_stock(&self) -> bool {
        if self.base.is_visible(&self.locators.in_stock).await {
            return true;
        }
        !self.base.is_visible(&self.locators.out_of_stock).await
    }

    /// Whether the add-to-cart button is shown
    pub async fn is_add_to_cart_button_visible(&self) -> bool {
        self.base
            .is_visible(&self.locators.add_to_cart_button)
            .await
    }

    /// Wait for the product heading and add-to-cart button
    pub async fn wait_for_product_page(&self) -> ShopResult<()> {
        self.base.wait_visible(&self.locators.title.first()).await?;
        self.base
            .wait_visible(&self.locators.add_to_cart_button.first())
            .await
    }
}
