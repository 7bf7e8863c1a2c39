//! Smoke scenarios: login, registration, search, add to cart, view cart.

use crate::fixtures::TestData;
use crate::pages::LoginOutcome;
use crate::scenario::{ensure, ensure_eq, Scenario, ScenarioContext, Suite};
use crate::result::ShopResult;
use futures::FutureExt;
use tracing::info;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "TC_01",
            "Login shows email verification",
            Suite::Smoke,
            |ctx| verify_login(ctx).boxed(),
        ),
        Scenario::new(
            "TC_02",
            "Register a new user",
            Suite::Smoke,
            |ctx| verify_registration(ctx).boxed(),
        ),
        Scenario::new(
            "TC_03",
            "Search with a valid keyword",
            Suite::Smoke,
            |ctx| verify_search(ctx).boxed(),
        ),
        Scenario::new(
            "TC_04",
            "Add a product to the cart from the home page",
            Suite::Smoke,
            |ctx| verify_add_to_cart(ctx).boxed(),
        ),
        Scenario::new(
            "TC_05",
            "View the cart after adding a product",
            Suite::Smoke,
            |ctx| verify_view_cart(ctx).boxed(),
        ),
    ]
}

async fn verify_login(ctx: ScenarioContext) -> ShopResult<()> {
    let login = ctx.login();
    let user = ctx.data().existing_user();

    let outcome = login.login(&user.email, &user.password).await?;
    info!(scenario = ctx.id(), ?outcome, "login submitted");
    ensure(outcome == LoginOutcome::VerificationPending, || {
        format!("expected the email verification notice, got {outcome:?}")
    })?;

    ctx.checkpoint("email-verification").await?;
    Ok(())
}

async fn verify_registration(ctx: ScenarioContext) -> ShopResult<()> {
    let login = ctx.login();
    let user = TestData::new_user();

    login.register(&user).await?;
    ensure(login.is_logged_in().await, || {
        format!("{} is not signed in after registering", user.email)
    })?;

    ctx.checkpoint("after-registration").await?;
    Ok(())
}

async fn verify_search(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let search = ctx.search();
    let keyword = TestData::search_data().valid_search;

    home.navigate_to_home().await?;
    home.search(&keyword).await?;
    search.wait_for_results().await?;

    let count = search.get_result_count().await;
    info!(scenario = ctx.id(), %keyword, count, "search results");
    ensure(search.has_results().await && count > 0, || {
        format!("no results for '{keyword}'")
    })?;
    ensure(search.results_contain_keyword(&keyword).await, || {
        format!("no result title mentions '{keyword}'")
    })?;

    ctx.checkpoint("search-results").await?;
    Ok(())
}

async fn verify_add_to_cart(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();

    home.navigate_to_home().await?;
    let before = home.get_cart_count().await;
    home.add_first_to_cart().await?;

    let after = home.get_cart_count().await;
    info!(scenario = ctx.id(), before, after, "cart badge");
    ensure_eq(after, before + 1, "cart badge after adding one product")?;

    ctx.checkpoint("add-to-cart").await?;
    Ok(())
}

async fn verify_view_cart(ctx: ScenarioContext) -> ShopResult<()> {
    let home = ctx.home();
    let cart = ctx.cart();

    home.navigate_to_home().await?;
    home.add_first_to_cart().await?;
    home.go_to_cart().await?;
    cart.wait_for_cart_page().await;

    let items = cart.get_cart_item_count().await;
    ensure(items > 0, || "cart has no line items".to_string())?;

    ctx.checkpoint("view-cart").await?;
    Ok(())
}
