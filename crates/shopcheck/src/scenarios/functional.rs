//! Functional scenarios TC_06 to TC_15.

use crate::fixtures::TestData;
use crate::pages::LoginOutcome;
use crate::page_object::url_path;
use crate::result::ShopResult;
use crate::scenario::{ensure, ensure_eq, Scenario, ScenarioContext, Suite};
use futures::FutureExt;
use regex::Regex;
use tracing::info;

/// Price format on product pages, e.g. `24,90KM`
pub(crate) const PRICE_PATTERN: &str = r"\d+,\d+KM";

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "TC_06",
            "Login with invalid credentials is refused",
            Suite::Functional,
            |ctx| login_invalid_credentials(ctx).boxed(),
        ),
        Scenario::new(
            "TC_07",
            "Password field is required",
            Suite::Functional,
            |ctx| login_empty_password(ctx).boxed(),
        ),
        Scenario::new(
            "TC_08",
            "Adding the same product twice counts two",
            Suite::Functional,
            |ctx| add_same_product_twice(ctx).boxed(),
        ),
        Scenario::new(
            "TC_09",
            "Search with no results",
            Suite::Functional,
            |ctx| search_no_results(ctx).boxed(),
        ),
        Scenario::new(
            "TC_10",
            "Add several different products",
            Suite::Functional,
            |ctx| add_multiple_products(ctx).boxed(),
        ),
        Scenario::new(
            "TC_11",
            "Update quantity in the cart",
            Suite::Functional,
            |ctx| update_quantity(ctx).boxed(),
        ),
        Scenario::new(
            "TC_12",
            "Remove a product from the cart",
            Suite::Functional,
            |ctx| remove_from_cart(ctx).boxed(),
        ),
        Scenario::new(
            "TC_13",
            "Browse a product category",
            Suite::Functional,
            |ctx| browse_category(ctx).boxed(),
        ),
        Scenario::new(
            "TC_14",
            "View product details",
            Suite::Functional,
            |ctx| view_product_details(ctx).boxed(),
        ),
        Scenario::new(
            "TC_15",
            "Search with an alternative keyword",
            Suite::Functional,
            |ctx| search_alternative(ctx).boxed(),
        ),
    ]
}

async fn login_invalid_credentials(ctx: ScenarioContext) -> ShopResult<()> {
    let login = ctx.login();

    login.navigate_to_login().await?;
    let outcome = login
        .submit_credentials("wrongemail@test.com", "wrongpassword")
        .await?;
    info!(scenario = ctx.id(), ?outcome, "invalid login submitted");

    let refused = match &outcome {
        LoginOutcome::VerificationPending => true,
        LoginOutcome::Error(_) => login.has_error().await,
        LoginOutcome::Authenticated => false,
    };
    ensure(refused, || {
        format!("expected a verification notice or an error banner, got {outcome:?}")
    })?;

    ctx.checkpoint("invalid-credentials").await?;
    Ok(())
}

async fn login_empty_password(ctx: ScenarioContext) -> ShopResult<()> {
    let login = ctx.login();

    login.navigate_to_login().await?;
    login.fill_email(&ctx.data().existing_user().email).await?;
    ensure(login.is_password_required().await, || {
        "password input lacks the required attribute".to_string()
    })?;

    ctx.checkpoint("empty-password").await?;
    Ok(())
}

async fn add_same_product_twice(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();

    home.navigate_to_home().await?;
    home.add_to_cart_by_index(0).await?;
    let after_first = home.get_cart_count().await;
    home.add_to_cart_by_index(0).await?;
    let after_second = home.get_cart_count().await;
    info!(scenario = ctx.id(), after_first, after_second, "cart counts");

    ensure_eq(after_second, 2, "cart count after adding twice")?;

    ctx.checkpoint("same-product-twice").await?;
    Ok(())
}

async fn search_no_results(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let search = ctx.search();
    let keyword = TestData::search_data().invalid_search;

    home.navigate_to_home().await?;
    home.search(&keyword).await?;
    search.wait_for_results().await?;

    ensure(search.has_no_results().await, || {
        format!("no empty-results notice for '{keyword}'")
    })?;
    ensure(!search.has_results().await, || {
        format!("products listed for '{keyword}'")
    })?;
    ensure_eq(search.get_result_count().await, 0, "result count")?;

    ctx.checkpoint("no-results").await?;
    Ok(())
}

async fn add_multiple_products(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();

    home.navigate_to_home().await?;
    home.add_to_cart_by_index(0).await?;
    home.add_to_cart_by_index(1).await?;

    let count = home.get_cart_count().await;
    ensure(count >= 2, || format!("cart badge shows {count}, expected at least 2"))?;

    ctx.checkpoint("multiple-products").await?;
    Ok(())
}

async fn update_quantity(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let cart = ctx.cart();

    home.navigate_to_home().await?;
    home.add_first_to_cart().await?;
    home.go_to_cart().await?;
    cart.wait_for_cart_page().await;

    let initial = cart.get_item_quantity(0).await;
    cart.update_item_quantity(0, 3).await?;
    let updated = cart.get_item_quantity(0).await;
    info!(scenario = ctx.id(), initial, updated, "quantity updated");

    ensure_eq(updated, 3, "quantity of the first cart row")?;

    ctx.checkpoint("update-quantity").await?;
    Ok(())
}

async fn remove_from_cart(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let cart = ctx.cart();

    home.navigate_to_home().await?;
    home.add_first_to_cart().await?;
    home.go_to_cart().await?;
    cart.wait_for_cart_page().await;

    let before = cart.get_cart_item_count().await;
    info!(scenario = ctx.id(), before, "items before removal");
    cart.remove_item(0).await?;

    ensure(cart.is_cart_empty().await, || {
        "cart is not empty after removing its only item".to_string()
    })?;

    ctx.checkpoint("remove-from-cart").await?;
    Ok(())
}

async fn browse_category(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let category = TestData::category();

    home.navigate_to_home().await?;
    home.navigate_to_category(&category.name).await?;

    let url = ctx.base().current_url().await;
    let products = home.get_product_count().await;
    info!(scenario = ctx.id(), %url, products, "category opened");

    ensure(url_path(&url).contains(&category.slug), || {
        format!("'{url}' is not the {} category", category.name)
    })?;
    ensure(products > 0, || format!("no products listed in {}", category.name))?;

    ctx.checkpoint("browse-category").await?;
    Ok(())
}

async fn view_product_details(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let product = ctx.product();

    home.navigate_to_home().await?;
    home.wait_for_products().await?;
    home.click_first_product().await?;

    let title = product.get_product_title().await?;
    let price = product.get_product_price().await?;
    info!(scenario = ctx.id(), %title, %price, "product details");

    ensure(!title.is_empty(), || "product title is empty".to_string())?;
    let well_formed = Regex::new(PRICE_PATTERN).is_ok_and(|re| re.is_match(&price));
    ensure(well_formed, || {
        format!("price '{price}' does not look like 24,90KM")
    })?;

    ctx.checkpoint("product-details").await?;
    Ok(())
}

async fn search_alternative(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let search = ctx.search();
    let keyword = TestData::search_data().valid_search_alternative;

    home.navigate_to_home().await?;
    home.search(&keyword).await?;
    search.wait_for_results().await?;

    let count = search.get_result_count().await;
    ensure(count > 0, || format!("no results for '{keyword}'"))?;
    ensure(search.results_contain_keyword(&keyword).await, || {
        format!("no result title mentions '{keyword}'")
    })?;

    ctx.checkpoint("alternative-search").await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_pattern() {
        let re = Regex::new(PRICE_PATTERN).unwrap();
        assert!(re.is_match("24,90KM"));
        assert!(re.is_match("Cijena: 1.024,00KM"));
        assert!(!re.is_match("24.90 KM"));
    }
}
