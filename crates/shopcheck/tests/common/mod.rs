//! In-memory MyBook.ba storefront for integration tests.
//!
//! Every navigation re-renders the page from a small shop model (cart
//! lines, signed-in flag) using the same locator catalogs the page objects
//! use, so the scenarios run unchanged against it.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use shopcheck::mock::{MockDom, MockDriver, MockDriverFactory, MockElement};
use shopcheck::{
    query_param, url_path, CartLocators, HomeLocators, LocatorStrategy, Locator, LoginLocators,
    ProductLocators, SearchLocators, SuiteConfig, TestData, Timeouts, UserCredentials, CART_PATH,
    DEFAULT_BASE_URL,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE: &str = DEFAULT_BASE_URL;

/// Card shown for every query by a storefront with a broken search index
pub const UNRELATED_TITLE: &str = "Kuharica za početnike";

pub const RATE_LIMIT_BANNER: &str = "Too many failed login attempts. Try again in 15 minutes.";

#[derive(Debug)]
pub struct Book {
    pub title: &'static str,
    pub slug: &'static str,
    pub price_fenings: u32,
    pub tags: &'static str,
}

impl Book {
    fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query) || self.tags.contains(query)
    }
}

pub static BOOKS: [Book; 3] = [
    Book {
        title: "Filozofija za početnike",
        slug: "filozofija-za-pocetnike",
        price_fenings: 3990,
        tags: "filozofija",
    },
    Book {
        title: "Sofijin svijet",
        slug: "sofijin-svijet",
        price_fenings: 2990,
        tags: "filozofija roman",
    },
    Book {
        title: "Na Drini ćuprija: roman",
        slug: "na-drini-cuprija",
        price_fenings: 2490,
        tags: "roman",
    },
];

/// `24,90KM`
pub fn km(fenings: u32) -> String {
    format!("{},{:02}KM", fenings / 100, fenings % 100)
}

/// Suite config with short bounds writing into `dir`
pub fn config(dir: &Path) -> SuiteConfig {
    SuiteConfig::default()
        .with_timeouts(Timeouts::fast())
        .with_output_dir(dir)
        .with_retries(0)
        .with_workers(4)
}

#[derive(Debug, Clone, Default)]
struct Shop {
    /// (index into BOOKS, quantity)
    cart: Vec<(usize, u32)>,
    signed_in: bool,
}

impl Shop {
    fn add(&mut self, book: usize, quantity: u32) {
        match self.cart.iter_mut().find(|(b, _)| *b == book) {
            Some(line) => line.1 += quantity,
            None => self.cart.push((book, quantity)),
        }
    }

    fn items(&self) -> u32 {
        self.cart.iter().map(|(_, q)| q).sum()
    }

    fn total(&self) -> u32 {
        self.cart
            .iter()
            .map(|(b, q)| BOOKS[*b].price_fenings * q)
            .sum()
    }
}

#[derive(Debug, Clone)]
struct Ui {
    home: HomeLocators,
    login: LoginLocators,
    product: ProductLocators,
    search: SearchLocators,
    cart: CartLocators,
    category: Locator,
    unrelated_results: bool,
}

impl Ui {
    fn new(strategy: LocatorStrategy) -> Self {
        Self {
            home: HomeLocators::for_strategy(strategy),
            login: LoginLocators::for_strategy(strategy),
            product: ProductLocators::for_strategy(strategy),
            search: SearchLocators::for_strategy(strategy),
            cart: CartLocators::for_strategy(strategy),
            category: HomeLocators::category_link(strategy, &TestData::category().name),
            unrelated_results: false,
        }
    }
}

/// Storefront behaviour for one suite run
#[derive(Debug, Clone)]
pub struct Storefront {
    strategy: LocatorStrategy,
    credentials: UserCredentials,
    rate_limited: bool,
    dead_cart: bool,
    units_per_add: u32,
    kept_cart: Vec<(usize, u32)>,
    unrelated_results: bool,
    navigation_delay: Duration,
}

impl Storefront {
    pub fn new(config: &SuiteConfig) -> Self {
        Self {
            strategy: config.strategy,
            credentials: config.credentials.clone(),
            rate_limited: false,
            dead_cart: false,
            units_per_add: 1,
            kept_cart: Vec::new(),
            unrelated_results: false,
            navigation_delay: Duration::ZERO,
        }
    }

    /// Login form answers every submit with the throttling banner
    pub fn rate_limited(mut self) -> Self {
        self.rate_limited = true;
        self
    }

    /// Listing "add to cart" buttons do nothing
    pub fn dead_cart(mut self) -> Self {
        self.dead_cart = true;
        self
    }

    /// Listing "add to cart" buttons add `units` copies per click
    pub fn units_per_add(mut self, units: u32) -> Self {
        self.units_per_add = units;
        self
    }

    /// Cart lines the server keeps across cookie resets
    pub fn kept_cart(mut self, book: usize, quantity: u32) -> Self {
        self.kept_cart.push((book, quantity));
        self
    }

    /// Every search lists one unrelated product
    pub fn unrelated_results(mut self) -> Self {
        self.unrelated_results = true;
        self
    }

    pub fn navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Factory handing out a fresh storefront page per scenario
    pub fn factory(self) -> MockDriverFactory {
        MockDriverFactory::new(move || self.driver())
    }

    /// Factory whose first page uses `first`, later pages `rest`
    pub fn first_then(first: Self, rest: Self) -> MockDriverFactory {
        let opened = AtomicUsize::new(0);
        MockDriverFactory::new(move || {
            if opened.fetch_add(1, Ordering::SeqCst) == 0 {
                first.driver()
            } else {
                rest.driver()
            }
        })
    }

    /// A page wired with the storefront hooks
    pub fn driver(&self) -> MockDriver {
        let driver = MockDriver::new();
        driver.set_navigation_delay(self.navigation_delay);
        let fresh = Shop {
            cart: self.kept_cart.clone(),
            signed_in: false,
        };
        let shop = Arc::new(Mutex::new(fresh.clone()));
        let ui = Arc::new(Ui {
            unrelated_results: self.unrelated_results,
            ..Ui::new(self.strategy)
        });

        {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_navigate(move |dom, _| render(dom, &shop.lock().unwrap(), &ui));
        }
        {
            let shop = shop.clone();
            driver.on_clear_cookies(move |_| *shop.lock().unwrap() = fresh.clone());
        }

        self.wire_header(&driver, &shop, &ui);
        self.wire_listing(&driver, &shop, &ui);
        self.wire_login(&driver, &shop, &ui);
        wire_product(&driver, &shop, &ui);
        wire_cart(&driver, &shop, &ui);
        driver
    }

    fn wire_header(&self, driver: &MockDriver, shop: &Arc<Mutex<Shop>>, ui: &Arc<Ui>) {
        let search_key = ui.home.search_input.key();
        let search = {
            let (shop, ui, search_key) = (shop.clone(), ui.clone(), search_key.clone());
            move |dom: &mut MockDom| {
                let query = dom.value(&search_key, 0);
                go(dom, &format!("/?s={query}"), &shop, &ui);
            }
        };
        {
            let search = search.clone();
            driver.on_key("Enter", move |dom, focused| {
                if focused == Some(search_key.as_str()) {
                    search(dom);
                }
            });
        }
        driver.on_click(&ui.home.search_button, move |dom, _| search(dom));

        let links = [
            (ui.home.cart_icon.clone(), CART_PATH.to_string()),
            (ui.home.login_link.clone(), "/my-account/".to_string()),
            (ui.login.login_link.clone(), "/my-account/".to_string()),
            (
                ui.category.clone(),
                format!("/product-category/{}/", TestData::category().slug),
            ),
        ];
        for (link, path) in links {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_click(&link, move |dom, _| go(dom, &path, &shop, &ui));
        }

        for link in [&ui.home.logout_link, &ui.login.logout_link] {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_click(link, move |dom, _| {
                shop.lock().unwrap().signed_in = false;
                go(dom, "/", &shop, &ui);
            });
        }
    }

    fn wire_listing(&self, driver: &MockDriver, shop: &Arc<Mutex<Shop>>, ui: &Arc<Ui>) {
        {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_click(&ui.home.product_cards.clone(), move |dom, index| {
                if let Some(&book) = shown(dom.url()).get(index) {
                    go(dom, &format!("/product/{}/", BOOKS[book].slug), &shop, &ui);
                }
            });
        }

        let dead = self.dead_cart;
        let units = self.units_per_add;
        for buttons in [&ui.home.add_to_cart_buttons, &ui.search.add_to_cart_buttons] {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_click(buttons, move |dom, index| {
                if dead {
                    return;
                }
                let mut shop = shop.lock().unwrap();
                if let Some(&book) = shown(dom.url()).get(index) {
                    shop.add(book, units);
                }
                render(dom, &shop, &ui);
                dom.set(&ui.search.added_to_cart_link, vec![MockElement::new("Pogledaj korpu")]);
            });
        }
    }

    fn wire_login(&self, driver: &MockDriver, shop: &Arc<Mutex<Shop>>, ui: &Arc<Ui>) {
        {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_click(&ui.login.register_link.clone(), move |dom, _| {
                go(dom, "/my-account/?action=register", &shop, &ui);
            });
        }
        {
            let ui = ui.clone();
            let credentials = self.credentials.clone();
            let rate_limited = self.rate_limited;
            driver.on_click(&ui.login.submit_button.clone(), move |dom, _| {
                let l = &ui.login;
                let email = dom.value(&l.email_input, 0);
                let password = dom.value(&l.password_input, 0);
                if rate_limited {
                    dom.set(&l.rate_limit_message, vec![MockElement::new(RATE_LIMIT_BANNER)]);
                    dom.set(&l.error_message, vec![MockElement::new(RATE_LIMIT_BANNER)]);
                } else if email == credentials.email && password == credentials.password {
                    dom.set(
                        &l.verification_message,
                        vec![MockElement::new(
                            "VERIFICATION REQUIRED: confirm the link sent to your email",
                        )],
                    );
                } else {
                    dom.set(
                        &l.error_message,
                        vec![MockElement::new(
                            "Unknown email address. Check again or try your username.",
                        )],
                    );
                }
            });
        }
        {
            let (shop, ui) = (shop.clone(), ui.clone());
            driver.on_click(&ui.login.register_submit.clone(), move |dom, _| {
                let l = &ui.login;
                let accepted = dom.get(&l.terms_checkbox).first().is_some_and(|t| t.checked);
                let complete = !dom.value(&l.register_email, 0).is_empty()
                    && !dom.value(&l.register_password, 0).is_empty();
                if accepted && complete {
                    shop.lock().unwrap().signed_in = true;
                    go(dom, "/my-account/", &shop, &ui);
                } else {
                    dom.set(&l.error_message, vec![MockElement::new("Please fill in all fields")]);
                }
            });
        }
    }
}

fn wire_product(driver: &MockDriver, shop: &Arc<Mutex<Shop>>, ui: &Arc<Ui>) {
    let (shop, ui) = (shop.clone(), ui.clone());
    driver.on_click(&ui.product.add_to_cart_button.clone(), move |dom, _| {
        let p = &ui.product;
        let quantity = dom.value(&p.quantity_input, 0).trim().parse().unwrap_or(1);
        let mut shop = shop.lock().unwrap();
        if let Some(book) = book_on(dom.url()) {
            shop.add(book, quantity);
        }
        render(dom, &shop, &ui);
        dom.set(
            &p.added_to_cart_message,
            vec![MockElement::new("Proizvod je dodan u korpu.")],
        );
        dom.set(&p.view_cart_link, vec![MockElement::new("View cart")]);
    });
}

fn wire_cart(driver: &MockDriver, shop: &Arc<Mutex<Shop>>, ui: &Arc<Ui>) {
    let c = &ui.cart;
    {
        let (shop, ui) = (shop.clone(), ui.clone());
        let remove = c.cart_rows.locator(c.remove_button.clone());
        driver.on_click(&remove, move |dom, index| {
            let mut shop = shop.lock().unwrap();
            if index < shop.cart.len() {
                shop.cart.remove(index);
            }
            render(dom, &shop, &ui);
        });
    }
    {
        let (shop, ui) = (shop.clone(), ui.clone());
        let quantities = c.cart_rows.locator(c.item_quantity.clone());
        driver.on_click(&c.update_cart_button.clone(), move |dom, _| {
            let mut shop = shop.lock().unwrap();
            for (index, line) in shop.cart.iter_mut().enumerate() {
                if let Ok(quantity) = dom.value(&quantities, index).trim().parse() {
                    line.1 = quantity;
                }
            }
            shop.cart.retain(|(_, q)| *q > 0);
            render(dom, &shop, &ui);
            dom.set(&ui.cart.update_message, vec![MockElement::new("Cart updated.")]);
        });
    }
}

fn go(dom: &mut MockDom, path: &str, shop: &Mutex<Shop>, ui: &Ui) {
    dom.set_url(format!("{BASE}{path}"));
    render(dom, &shop.lock().unwrap(), ui);
}

/// Indices into `BOOKS` listed at `url`
fn shown(url: &str) -> Vec<usize> {
    let query = query_param(url, "s").map(str::to_lowercase);
    BOOKS
        .iter()
        .enumerate()
        .filter(|(_, book)| query.as_deref().map_or(true, |q| book.matches(q)))
        .map(|(i, _)| i)
        .collect()
}

fn book_on(url: &str) -> Option<usize> {
    let slug = url_path(url).strip_prefix("/product/")?.trim_matches('/');
    BOOKS.iter().position(|b| b.slug == slug)
}

fn render(dom: &mut MockDom, shop: &Shop, ui: &Ui) {
    let url = dom.url().to_string();
    *dom = MockDom::default();
    dom.set_url(url.as_str());
    header(dom, shop, ui);

    let path = url_path(&url);
    if query_param(&url, "s").is_some() {
        if ui.unrelated_results {
            unrelated_results(dom, ui);
        } else {
            search_results(dom, ui, &shown(&url));
        }
    } else if path.starts_with("/product/") {
        if let Some(book) = book_on(&url) {
            product_page(dom, ui, &BOOKS[book]);
        }
    } else if path == CART_PATH {
        cart_page(dom, shop, ui);
    } else if path.starts_with("/my-account") {
        if shop.signed_in {
            dom.set(&ui.login.account_menu, vec![MockElement::new("Moj račun")]);
        } else if query_param(&url, "action") == Some("register") {
            registration_form(dom, ui);
        } else {
            login_form(dom, ui);
        }
    } else {
        listing(dom, ui, &shown(&url));
    }
}

fn header(dom: &mut MockDom, shop: &Shop, ui: &Ui) {
    let h = &ui.home;
    dom.set(&h.search_input, vec![MockElement::input("")]);
    dom.set(&h.search_button, vec![MockElement::new("Pretraga")]);
    dom.set(&h.cart_icon, vec![MockElement::new("Korpa")]);
    dom.set(&h.cart_count, vec![MockElement::new(shop.items().to_string())]);
    dom.set(&h.main_menu, vec![MockElement::default()]);
    dom.set(&ui.category, vec![MockElement::new(TestData::category().name)]);
    if shop.signed_in {
        dom.set(&h.user_menu, vec![MockElement::new("Moj račun")]);
        dom.set(&h.logout_link, vec![MockElement::new("Logout")]);
        dom.set(&ui.login.logout_link, vec![MockElement::new("Logout")]);
    } else {
        dom.set(&h.login_link, vec![MockElement::new("Login")]);
        dom.set(&ui.login.login_link, vec![MockElement::new("Login")]);
    }
}

fn listing(dom: &mut MockDom, ui: &Ui, books: &[usize]) {
    let h = &ui.home;
    let cards = &h.product_cards;
    dom.set(cards, books.iter().map(|&b| MockElement::new(BOOKS[b].title)).collect());
    dom.set(
        &cards.locator(h.product_title.clone()),
        books.iter().map(|&b| MockElement::new(BOOKS[b].title)).collect(),
    );
    dom.set(
        &cards.locator(h.product_price.clone()),
        books.iter().map(|&b| MockElement::new(km(BOOKS[b].price_fenings))).collect(),
    );
    dom.set(
        &h.add_to_cart_buttons,
        books.iter().map(|_| MockElement::new("Dodaj u korpu")).collect(),
    );
}

fn unrelated_results(dom: &mut MockDom, ui: &Ui) {
    let s = &ui.search;
    dom.set(&s.product_cards, vec![MockElement::new(UNRELATED_TITLE)]);
    dom.set(
        &s.product_cards.locator(s.product_title.clone()),
        vec![MockElement::new(UNRELATED_TITLE)],
    );
    dom.set(
        &s.product_cards.locator(s.product_price.clone()),
        vec![MockElement::new(km(1990))],
    );
}

fn search_results(dom: &mut MockDom, ui: &Ui, books: &[usize]) {
    let s = &ui.search;
    if books.is_empty() {
        dom.set(
            &s.no_results_message,
            vec![MockElement::new("No products were found matching your selection.")],
        );
        return;
    }
    let cards = &s.product_cards;
    dom.set(cards, books.iter().map(|&b| MockElement::new(BOOKS[b].title)).collect());
    dom.set(
        &cards.locator(s.product_title.clone()),
        books.iter().map(|&b| MockElement::new(BOOKS[b].title)).collect(),
    );
    dom.set(
        &cards.locator(s.product_price.clone()),
        books.iter().map(|&b| MockElement::new(km(BOOKS[b].price_fenings))).collect(),
    );
    dom.set(
        &s.add_to_cart_buttons,
        books.iter().map(|_| MockElement::new("Dodaj u korpu")).collect(),
    );
    dom.set(
        &s.result_count,
        vec![MockElement::new(format!("Showing all {} results", books.len()))],
    );
    dom.set(&s.order_by, vec![MockElement::input("relevance")]);
}

fn product_page(dom: &mut MockDom, ui: &Ui, book: &Book) {
    let p = &ui.product;
    dom.set(&p.title, vec![MockElement::new(book.title)]);
    dom.set(&p.price, vec![MockElement::new(km(book.price_fenings))]);
    dom.set(&p.description, vec![MockElement::new(book.tags)]);
    dom.set(&p.image, vec![MockElement::default().with_attribute("alt", book.title)]);
    dom.set(&p.add_to_cart_button, vec![MockElement::new("Dodaj u korpu")]);
    dom.set(&p.quantity_input, vec![MockElement::input("1")]);
    dom.set(&p.in_stock, vec![MockElement::new("Na stanju")]);
}

fn cart_page(dom: &mut MockDom, shop: &Shop, ui: &Ui) {
    let c = &ui.cart;
    if shop.cart.is_empty() {
        dom.set(&c.empty_cart_message, vec![MockElement::new("Vaša korpa je prazna.")]);
        return;
    }
    let rows = &c.cart_rows;
    let lines = &shop.cart;
    dom.set(&c.cart_table, vec![MockElement::default()]);
    dom.set(rows, lines.iter().map(|&(b, _)| MockElement::new(BOOKS[b].title)).collect());
    dom.set(
        &rows.locator(c.item_name.clone()),
        lines.iter().map(|&(b, _)| MockElement::new(BOOKS[b].title)).collect(),
    );
    dom.set(
        &rows.locator(c.item_price.clone()),
        lines.iter().map(|&(b, _)| MockElement::new(km(BOOKS[b].price_fenings))).collect(),
    );
    dom.set(
        &rows.locator(c.item_quantity.clone()),
        lines.iter().map(|&(_, q)| MockElement::input(q.to_string())).collect(),
    );
    dom.set(
        &rows.locator(c.remove_button.clone()),
        lines.iter().map(|_| MockElement::new("×")).collect(),
    );
    dom.set(&c.update_cart_button, vec![MockElement::new("Update cart")]);
    dom.set(&c.subtotal, vec![MockElement::new(km(shop.total()))]);
    dom.set(&c.shipping_cost, vec![MockElement::new(km(0))]);
    dom.set(&c.total, vec![MockElement::new(km(shop.total()))]);
    dom.set(&c.checkout_button, vec![MockElement::new("Proceed to checkout")]);
}

fn login_form(dom: &mut MockDom, ui: &Ui) {
    let l = &ui.login;
    dom.set(&l.email_input, vec![MockElement::input("")]);
    dom.set(
        &l.password_input,
        vec![MockElement::input("").with_attribute("required", "required")],
    );
    dom.set(&l.submit_button, vec![MockElement::new("Login")]);
    dom.set(&l.register_link, vec![MockElement::new("Sign Up")]);
}

fn registration_form(dom: &mut MockDom, ui: &Ui) {
    let l = &ui.login;
    for field in [
        &l.first_name,
        &l.last_name,
        &l.register_email,
        &l.register_password,
        &l.date_of_birth,
        &l.address,
        &l.postcode,
        &l.city,
        &l.state,
        &l.country,
        &l.phone,
    ] {
        dom.set(field, vec![MockElement::input("")]);
    }
    dom.set(&l.terms_checkbox, vec![MockElement::default()]);
    dom.set(&l.register_submit, vec![MockElement::new("Sign Up")]);
}
