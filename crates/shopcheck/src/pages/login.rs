//! Login and registration.
//!
//! After the credentials are submitted the page settles into one of:
//!
//! ```text
//! AnonymousOnLogin ──submit──▶ RateLimited          (Err(ShopError::RateLimited))
//!                          ├─▶ VerificationPending  (Ok(LoginOutcome::VerificationPending))
//!                          └─▶ AuthenticatedOrError (Ok(Authenticated) | Ok(Error(msg)))
//! ```
//!
//! Rate limiting is the one state raised as an error: the scenario cannot
//! continue against a form that refuses input.

use crate::base_page::BasePage;
use crate::config::LocatorStrategy;
use crate::fixtures::NewUser;
use crate::locator::{AriaRole, Locator, Selector, TextMatch};
use crate::page_object::PageObject;
use crate::result::{ShopError, ShopResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Banner text shown when the storefront throttles login attempts
pub const RATE_LIMIT_PATTERN: &str =
    r"too many (failed )?(login )?attempts|try again in \d+|previše (neuspješnih )?pokušaja";

/// Banner text shown to accounts awaiting email verification
pub const VERIFICATION_PATTERN: &str = "VERIFICATION REQUIRED|verification is required";

/// Link text only a signed-in visitor sees
pub const ACCOUNT_LINK_PATTERN: &str = r"^\s*(my account|moj račun|logout|odjava)\s*$";

/// Where a submitted login ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The account must confirm its email first
    VerificationPending,
    /// Account menu is shown
    Authenticated,
    /// Form rejected the credentials
    Error(String),
}

impl LoginOutcome {
    /// Whether the user ended up signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Login and registration locators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginLocators {
    pub login_link: Locator,
    pub email_input: Locator,
    pub password_input: Locator,
    pub submit_button: Locator,
    pub register_link: Locator,
    pub first_name: Locator,
    pub last_name: Locator,
    pub register_email: Locator,
    pub register_password: Locator,
    pub date_of_birth: Locator,
    pub address: Locator,
    pub postcode: Locator,
    pub city: Locator,
    pub state: Locator,
    pub country: Locator,
    pub phone: Locator,
    pub terms_checkbox: Locator,
    pub register_submit: Locator,
    pub error_message: Locator,
    pub verification_message: Locator,
    pub rate_limit_message: Locator,
    pub account_menu: Locator,
    pub logout_link: Locator,
}

const ERROR_CSS: &str = r#".error, .alert, [class*="error"], [class*="alert"]"#;

impl LoginLocators {
    /// CSS class and attribute selectors
    #[must_use]
    pub fn structural() -> Self {
        Self {
            login_link: Locator::from_selector(Selector::Text(TextMatch::Exact("Login".into()))),
            email_input: Locator::new(r#"input[type="email"], input[name="email"]"#),
            password_input: Locator::new(r#"input[type="password"], input[name="password"]"#),
            submit_button: Locator::from_selector(Selector::any([
                Selector::has_text(r#"button[type="submit"]"#, "Login"),
                Selector::css(r#"input[type="submit"]"#),
            ])),
            register_link: Locator::from_selector(Selector::any([
                Selector::Text(TextMatch::Exact("Sign Up".into())),
                Selector::css(r#"a[href*="register"]"#),
            ])),
            first_name: Locator::new(r#"input[name="first_name"], input[name="firstName"]"#),
            last_name: Locator::new(r#"input[name="last_name"], input[name="lastName"]"#),
            register_email: Locator::new(r#"input[name="email"][type="email"]"#),
            register_password: Locator::new(r#"input[name="password"][type="password"]"#),
            date_of_birth: Locator::new(r#"input[name="dob"], input[name="date_of_birth"]"#),
            address: Locator::new(r#"input[name="address"]"#),
            postcode: Locator::new(r#"input[name="postcode"], input[name="zip"]"#),
            city: Locator::new(r#"input[name="city"]"#),
            state: Locator::new(r#"input[name="state"]"#),
            country: Locator::new(r#"input[name="country"]"#),
            phone: Locator::new(r#"input[name="phone"], input[type="tel"]"#),
            terms_checkbox: Locator::new(r#"input[type="checkbox"]"#),
            register_submit: Locator::from_selector(Selector::has_text(
                r#"button[type="submit"]"#,
                "Sign Up",
            )),
            error_message: Locator::new(ERROR_CSS),
            verification_message: Locator::from_selector(Selector::CssWithText {
                css: ERROR_CSS.to_string(),
                text: TextMatch::pattern(VERIFICATION_PATTERN),
            }),
            rate_limit_message: Locator::from_selector(Selector::CssWithText {
                css: ERROR_CSS.to_string(),
                text: TextMatch::pattern(RATE_LIMIT_PATTERN),
            }),
            account_menu: Locator::from_selector(Selector::CssWithText {
                css: ".user-menu a, a".to_string(),
                text: TextMatch::pattern(ACCOUNT_LINK_PATTERN),
            }),
            logout_link: Locator::from_selector(Selector::Text(TextMatch::Exact("Logout".into()))),
        }
    }

    /// Role and text locators; registration fields keep their `name` CSS
    #[must_use]
    pub fn semantic() -> Self {
        Self {
            login_link: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern(r"^\s*(login|prijava)\s*$"),
            )),
            email_input: Locator::from_selector(Selector::role_named(
                AriaRole::Textbox,
                TextMatch::Contains("Username / Email".into()),
            )),
            password_input: Locator::from_selector(Selector::role_named(
                AriaRole::Textbox,
                TextMatch::Contains("Password".into()),
            )),
            submit_button: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::Contains("Sign in".into()),
            )),
            register_link: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("sign up|register|registracija"),
            )),
            register_submit: Locator::from_selector(Selector::role_named(
                AriaRole::Button,
                TextMatch::pattern("sign up|register|registracija"),
            )),
            error_message: Locator::from_selector(Selector::any([
                Selector::role(AriaRole::Alert),
                Selector::css(ERROR_CSS),
            ])),
            verification_message: Locator::from_selector(Selector::text_pattern(
                VERIFICATION_PATTERN,
            )),
            rate_limit_message: Locator::from_selector(Selector::text_pattern(RATE_LIMIT_PATTERN)),
            account_menu: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("my account|moj račun|odjava|logout"),
            )),
            logout_link: Locator::from_selector(Selector::role_named(
                AriaRole::Link,
                TextMatch::pattern("logout|odjava"),
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

/// Login page
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
    locators: LoginLocators,
}

impl PageObject for LoginPage {
    fn url_pattern(&self) -> &str {
        "/my-account/**"
    }

    fn page_name(&self) -> &str {
        "login"
    }
}

impl LoginPage {
    /// Page using the configured locator strategy
    #[must_use]
    pub fn new(base: BasePage) -> Self {
        let locators = LoginLocators::for_strategy(base.config().strategy);
        Self { base, locators }
    }

    /// Page with an explicit catalog
    #[must_use]
    pub const fn with_locators(base: BasePage, locators: LoginLocators) -> Self {
        Self { base, locators }
    }

    /// Locator catalog in use
    #[must_use]
    pub const fn locators(&self) -> &LoginLocators {
        &self.locators
    }

    /// Underlying interaction layer
    #[must_use]
    pub const fn base(&self) -> &BasePage {
        &self.base
    }

    /// Home page, then the header login link
    pub async fn navigate_to_login(&self) -> ShopResult<()> {
        self.base.goto("/").await?;
        let link = self.locators.login_link.first();
        self.base.wait_visible(&link).await?;
        self.base.click(&link).await?;
        self.base.wait_for_navigation().await
    }

    /// Full login flow from the home page
    pub async fn login(&self, email: &str, password: &str) -> ShopResult<LoginOutcome> {
        self.navigate_to_login().await?;
        self.submit_credentials(email, password).await
    }

    /// Fill the open login form, submit it and classify the result
    pub async fn submit_credentials(&self, email: &str, password: &str) -> ShopResult<LoginOutcome> {
        self.base.wait_visible(&self.locators.email_input).await?;
        self.fill_email(email).await?;
        self.fill_password(password).await?;
        self.click_login_submit().await?;
        self.base.wait_for_navigation().await?;
        self.await_outcome().await
    }

    /// Poll the page until it shows a login result.
    ///
    /// The rate-limit banner wins over every other signal. When nothing
    /// appears within the action timeout the result is an
    /// [`LoginOutcome::Error`] describing the silence, never a success.
    pub async fn await_outcome(&self) -> ShopResult<LoginOutcome> {
        let timeout = self.base.config().timeouts.action();
        let probe = self
            .base
            .poll_for("login outcome", timeout, move || async move {
                self.outcome_now().await.transpose()
            })
            .await;
        match probe {
            Some(Ok(outcome)) => {
                debug!(?outcome, "login settled");
                Ok(outcome)
            }
            Some(Err(e)) => Err(e),
            None => Ok(LoginOutcome::Error(format!(
                "no login feedback within {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// One look at the page: `Ok(None)` while nothing decisive is shown
    async fn outcome_now(&self) -> ShopResult<Option<LoginOutcome>> {
        self.check_rate_limit().await?;
        if self.base.is_visible_now(&self.locators.verification_message).await {
            return Ok(Some(LoginOutcome::VerificationPending));
        }
        if self.base.is_visible_now(&self.locators.error_message).await {
            let message = self.base.get_text(&self.locators.error_message).await;
            return Ok(Some(LoginOutcome::Error(message)));
        }
        if self.signed_in_now().await {
            return Ok(Some(LoginOutcome::Authenticated));
        }
        Ok(None)
    }

    /// A logout link or a named account link is on screen
    async fn signed_in_now(&self) -> bool {
        self.base.is_visible_now(&self.locators.logout_link).await
            || self.base.is_visible_now(&self.locators.account_menu).await
    }

    /// Fail with `RateLimited` when the throttling banner is shown
    pub async fn check_rate_limit(&self) -> ShopResult<()> {
        if self
            .base
            .is_visible_now(&self.locators.rate_limit_message)
            .await
        {
            let message = self.base.get_text(&self.locators.rate_limit_message).await;
            warn!(%message, "login rate limited");
            return Err(ShopError::RateLimited { message });
        }
        Ok(())
    }

    /// Whether the verification banner is shown
    pub async fn has_email_verification_message(&self) -> bool {
        self.base
            .is_visible(&self.locators.verification_message)
            .await
    }

    /// Login page, then the sign-up link
    pub async fn navigate_to_register(&self) -> ShopResult<()> {
        self.navigate_to_login().await?;
        self.base.click(&self.locators.register_link.first()).await?;
        self.base.wait_for_navigation().await
    }

    /// Fill and submit the registration form; optional fields are skipped
    pub async fn register(&self, user: &NewUser) -> ShopResult<()> {
        self.navigate_to_register().await?;
        let l = &self.locators;
        self.base.wait_visible(&l.first_name).await?;
        self.base.fill(&l.first_name, &user.first_name).await?;
        self.base.fill(&l.last_name, &user.last_name).await?;
        self.base.fill(&l.register_email, &user.email).await?;
        self.base.fill(&l.register_password, &user.password).await?;

        let optional = [
            (&l.date_of_birth, &user.date_of_birth),
            (&l.address, &user.address),
            (&l.postcode, &user.postcode),
            (&l.city, &user.city),
            (&l.state, &user.state),
            (&l.country, &user.country),
            (&l.phone, &user.phone),
        ];
        for (locator, value) in optional {
            if let Some(value) = value {
                self.base.fill(locator, value).await?;
            }
        }

        self.base.check(&l.terms_checkbox.first()).await?;
        self.base.click(&l.register_submit.first()).await?;
        self.base.wait_for_navigation().await
    }

    /// Type into the email field
    pub async fn fill_email(&self, email: &str) -> ShopResult<()> {
        self.base.fill(&self.locators.email_input, email).await
    }

    /// Type into the password field
    pub async fn fill_password(&self, password: &str) -> ShopResult<()> {
        self.base.fill(&self.locators.password_input, password).await
    }

    /// Submit the login form
    pub async fn click_login_submit(&self) -> ShopResult<()> {
        self.base.click(&self.locators.submit_button.first()).await
    }

    /// Whether an account or logout link is shown
    pub async fn is_logged_in(&self) -> bool {
        self.base.is_visible(&self.locators.account_menu).await
    }

    /// Error banner text, empty when none appears within 5 seconds
    pub async fn get_error_message(&self) -> String {
        let shown = self
            .base
            .is_visible_within(&self.locators.error_message, Duration::from_secs(5))
            .await;
        if shown {
            self.base.get_text(&self.locators.error_message).await
        } else {
            String::new()
        }
    }

    /// Whether an error banner is shown
    pub async fn has_error(&self) -> bool {
        self.base.is_visible(&self.locators.error_message).await
    }

    /// Whether the password input carries the `required` attribute
    pub async fn is_password_required(&self) -> bool {
        self.base
            .attribute(&self.locators.password_input, "required")
            .await
            .is_some()
    }

    /// Follow the logout link; no-op when signed out
    pub async fn logout(&self) -> ShopResult<()> {
        if self.is_logged_in().await {
            self.base.click(&self.locators.logout_link.first()).await?;
            self.base.wait_for_navigation().await?;
        }
        Ok(())
    }

    /// Empty the email and password fields
    pub async fn clear_login_form(&self) -> ShopResult<()> {
        self.base.clear_input(&self.locators.email_input).await?;
        self.base.clear_input(&self.locators.password_input).await
    }
}
