//! In-process Swag Labs storefront
//!
//! [`FakeDriver`] hands out [`FakePage`]s that answer the same selectors as
//! the real site (see [`crate::storefront`]): login with an error banner,
//! the sortable listing, cart, three-step checkout and the burger menu.
//! State lives in memory, so scenarios run without a browser or network.
//! [`StorefrontOptions`] can break individual behaviors to exercise the
//! failure paths of the scenarios.

use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use parking_lot::Mutex;
use shopcheck_common::{parse_price, Credentials, ProductRecord, SortMode};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{E2eError, E2eResult};
use crate::page::{Driver, Page};
use crate::storefront::{self, cart, checkout, header, inventory, login, menu};

/// A product as the storefront renders it
#[derive(Debug, Clone, PartialEq)]
pub struct FakeProduct {
    pub name: String,
    /// Rendered price text; `None` renders the item without a price node
    pub price_text: Option<String>,
}

impl FakeProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price_text: Some(format!("${:.2}", price)),
        }
    }

    pub fn with_price_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_text: Some(text.into()),
        }
    }

    pub fn without_price(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_text: None,
        }
    }

    fn record(&self) -> ProductRecord {
        let price = self
            .price_text
            .as_deref()
            .and_then(|t| parse_price(t).ok())
            .unwrap_or(0.0);
        ProductRecord::new(self.name.clone(), price)
    }
}

/// The six products the public demo lists
pub fn sauce_labs_catalog() -> Vec<FakeProduct> {
    vec![
        FakeProduct::new("Sauce Labs Backpack", 29.99),
        FakeProduct::new("Sauce Labs Bike Light", 9.99),
        FakeProduct::new("Sauce Labs Bolt T-Shirt", 15.99),
        FakeProduct::new("Sauce Labs Fleece Jacket", 49.99),
        FakeProduct::new("Sauce Labs Onesie", 7.99),
        FakeProduct::new("Test.allTheThings() T-Shirt (Red)", 15.99),
    ]
}

/// Behavior of the simulated storefront
#[derive(Debug, Clone)]
pub struct StorefrontOptions {
    /// Login page URL
    pub base_url: String,
    pub catalog: Vec<FakeProduct>,
    /// Accounts that may log in
    pub accounts: Vec<Credentials>,
    /// Keep the selected sort mode across reloads
    pub persist_sort_on_reload: bool,
    /// Reorder the listing when a sort mode is selected
    pub apply_sort: bool,
}

impl Default for StorefrontOptions {
    fn default() -> Self {
        Self {
            base_url: "https://www.saucedemo.com/".to_string(),
            catalog: sauce_labs_catalog(),
            accounts: vec![Credentials::default()],
            persist_sort_on_reload: true,
            apply_sort: true,
        }
    }
}

impl StorefrontOptions {
    pub fn with_catalog(mut self, catalog: Vec<FakeProduct>) -> Self {
        self.catalog = catalog;
        self
    }

    fn page_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Opens independent [`FakePage`]s over the same storefront options
pub struct FakeDriver {
    options: StorefrontOptions,
    opened: AtomicUsize,
}

impl FakeDriver {
    pub fn new(options: StorefrontOptions) -> Self {
        Self {
            options,
            opened: AtomicUsize::new(0),
        }
    }

    /// Pages handed out so far
    pub fn pages_opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new(StorefrontOptions::default())
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn new_page(&self) -> E2eResult<Arc<dyn Page>> {
        self.opened.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(FakePage::new(self.options.clone())))
    }

    async fn shutdown(&self) -> E2eResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Blank,
    Login,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
}

impl Route {
    fn path(&self) -> &'static str {
        match self {
            Route::Blank | Route::Login => "",
            Route::Inventory => inventory::PATH,
            Route::Cart => cart::PATH,
            Route::CheckoutInfo => checkout::INFO_PATH,
            Route::CheckoutOverview => checkout::OVERVIEW_PATH,
            Route::CheckoutComplete => checkout::COMPLETE_PATH,
        }
    }

    fn title(&self) -> Option<&'static str> {
        match self {
            Route::Blank | Route::Login => None,
            Route::Inventory => Some(inventory::TITLE),
            Route::Cart => Some(cart::TITLE),
            Route::CheckoutInfo => Some(checkout::INFO_TITLE),
            Route::CheckoutOverview => Some(checkout::OVERVIEW_TITLE),
            Route::CheckoutComplete => Some(checkout::COMPLETE_TITLE),
        }
    }

    fn from_path(path: &str) -> Option<Route> {
        [
            Route::Inventory,
            Route::Cart,
            Route::CheckoutInfo,
            Route::CheckoutOverview,
            Route::CheckoutComplete,
        ]
        .into_iter()
        .find(|r| r.path() == path)
    }
}

#[derive(Debug)]
struct State {
    route: Route,
    user: Option<String>,
    inputs: HashMap<&'static str, String>,
    login_error: Option<&'static str>,
    checkout_error: Option<&'static str>,
    /// Catalog indices, in the order they were added
    cart: Vec<usize>,
    sort: SortMode,
    menu_open: bool,
    closed: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            route: Route::Blank,
            user: None,
            inputs: HashMap::new(),
            login_error: None,
            checkout_error: None,
            cart: Vec::new(),
            sort: SortMode::default(),
            menu_open: false,
            closed: false,
        }
    }
}

/// One simulated browser tab
pub struct FakePage {
    options: StorefrontOptions,
    state: Mutex<State>,
}

const LOGIN_INPUTS: [&str; 2] = [login::USERNAME, login::PASSWORD];
const CHECKOUT_INPUTS: [&str; 3] = [
    checkout::FIRST_NAME,
    checkout::LAST_NAME,
    checkout::POSTAL_CODE,
];
const MENU_LINKS: [(&str, &str); 4] = [
    (menu::ALL_ITEMS, "All Items"),
    (menu::ABOUT, "About"),
    (menu::LOGOUT, "Logout"),
    (menu::RESET, "Reset App State"),
];

impl FakePage {
    pub fn new(options: StorefrontOptions) -> Self {
        Self {
            options,
            state: Mutex::new(State::default()),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> E2eResult<T>) -> E2eResult<T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(E2eError::Browser("page is closed".to_string()));
        }
        f(&mut state)
    }

    /// Catalog indices in display order
    fn displayed(&self, state: &State) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.options.catalog.len()).collect();
        if self.options.apply_sort {
            let records: Vec<ProductRecord> =
                self.options.catalog.iter().map(FakeProduct::record).collect();
            order.sort_by(|&a, &b| state.sort.compare(&records[a], &records[b]));
        }
        order
    }

    fn exists(&self, state: &State, selector: &str) -> bool {
        match state.route {
            Route::Blank => false,
            Route::Login => match selector {
                login::LOGO | login::USERNAME | login::PASSWORD | login::SUBMIT => true,
                login::ERROR => state.login_error.is_some(),
                _ => false,
            },
            route => {
                let in_header = match selector {
                    header::TITLE | header::CART_LINK | header::MENU_BUTTON | menu::WRAP => true,
                    header::CART_BADGE => !state.cart.is_empty(),
                    s => MENU_LINKS.iter().any(|(link, _)| *link == s),
                };
                in_header
                    || match route {
                        Route::Inventory => match selector {
                            inventory::SORT_SELECT => true,
                            inventory::ITEM
                            | inventory::ITEM_NAME
                            | inventory::ITEM_PRICE
                            | inventory::ITEM_BUTTONS => !self.options.catalog.is_empty(),
                            _ => false,
                        },
                        Route::Cart | Route::CheckoutOverview => match selector {
                            cart::ITEM | cart::ITEM_NAME => !state.cart.is_empty(),
                            cart::ITEM_BUTTONS => route == Route::Cart && !state.cart.is_empty(),
                            cart::CONTINUE_SHOPPING | cart::CHECKOUT => route == Route::Cart,
                            checkout::FINISH => route == Route::CheckoutOverview,
                            _ => false,
                        },
                        Route::CheckoutInfo => match selector {
                            checkout::ERROR => state.checkout_error.is_some(),
                            checkout::CONTINUE => true,
                            s => CHECKOUT_INPUTS.contains(&s),
                        },
                        Route::CheckoutComplete => matches!(
                            selector,
                            checkout::COMPLETE_HEADER | checkout::BACK_TO_PRODUCTS
                        ),
                        Route::Blank | Route::Login => false,
                    }
            }
        }
    }

    fn visible(&self, state: &State, selector: &str) -> bool {
        let in_menu =
            selector == menu::WRAP || MENU_LINKS.iter().any(|(link, _)| *link == selector);
        self.exists(state, selector) && (!in_menu || state.menu_open)
    }

    fn require_visible(&self, state: &State, selector: &str) -> E2eResult<()> {
        if !self.exists(state, selector) {
            return Err(E2eError::ElementNotFound(selector.to_string()));
        }
        if !self.visible(state, selector) {
            return Err(E2eError::Timeout(format!("{} to become visible", selector)));
        }
        Ok(())
    }

    fn text(&self, state: &State, selector: &str) -> Option<String> {
        if !self.exists(state, selector) {
            return None;
        }
        let displayed = self.displayed(state);
        let text = match selector {
            header::TITLE => state.route.title()?.to_string(),
            header::CART_BADGE => state.cart.len().to_string(),
            login::LOGO => storefront::TITLE.to_string(),
            login::ERROR if state.route == Route::Login => state.login_error?.to_string(),
            checkout::ERROR => state.checkout_error?.to_string(),
            checkout::COMPLETE_HEADER => checkout::CONFIRMATION.to_string(),
            inventory::ITEM_NAME if state.route == Route::Inventory => {
                self.options.catalog[*displayed.first()?].name.clone()
            }
            cart::ITEM_NAME => self.options.catalog[*state.cart.first()?].name.clone(),
            inventory::ITEM_PRICE => self.options.catalog[*displayed.first()?].price_text.clone()?,
            s => MENU_LINKS
                .iter()
                .find(|(link, _)| *link == s)
                .map(|(_, label)| label.to_string())
                .unwrap_or_default(),
        };
        Some(text)
    }

    fn click_on(&self, state: &mut State, selector: &str) -> E2eResult<()> {
        self.require_visible(state, selector)?;

        match (state.route, selector) {
            (Route::Login, login::SUBMIT) => self.submit_login(state),
            (_, header::CART_LINK) => {
                state.menu_open = false;
                state.route = Route::Cart;
            }
            (_, header::MENU_BUTTON) => state.menu_open = true,
            (_, menu::LOGOUT) => {
                state.user = None;
                state.menu_open = false;
                state.inputs.clear();
                state.route = Route::Login;
            }
            (_, menu::ALL_ITEMS) => {
                state.menu_open = false;
                state.route = Route::Inventory;
            }
            (_, menu::RESET) => {
                state.cart.clear();
                state.sort = SortMode::default();
            }
            (_, menu::ABOUT) => {
                return Err(E2eError::Browser(
                    "navigation away from the storefront is not simulated".to_string(),
                ))
            }
            (Route::Cart, cart::CONTINUE_SHOPPING) => state.route = Route::Inventory,
            (Route::Cart, cart::CHECKOUT) => {
                for input in CHECKOUT_INPUTS {
                    state.inputs.remove(input);
                }
                state.checkout_error = None;
                state.route = Route::CheckoutInfo;
            }
            (Route::CheckoutInfo, checkout::CONTINUE) => self.submit_checkout(state),
            (Route::CheckoutOverview, checkout::FINISH) => {
                state.cart.clear();
                state.route = Route::CheckoutComplete;
            }
            (Route::CheckoutComplete, checkout::BACK_TO_PRODUCTS) => {
                state.route = Route::Inventory;
            }
            // Present but inert, like clicking a heading
            _ => {}
        }
        Ok(())
    }

    fn submit_login(&self, state: &mut State) {
        let username = state.inputs.get(login::USERNAME).cloned().unwrap_or_default();
        let password = state.inputs.get(login::PASSWORD).cloned().unwrap_or_default();

        state.login_error = if username.is_empty() {
            Some(login::ERROR_USERNAME_REQUIRED)
        } else if password.is_empty() {
            Some(login::ERROR_PASSWORD_REQUIRED)
        } else if self
            .options
            .accounts
            .iter()
            .any(|a| a.username == username && a.password == password)
        {
            None
        } else {
            Some(login::ERROR_MISMATCH)
        };

        if state.login_error.is_none() {
            state.user = Some(username);
            state.route = Route::Inventory;
        }
    }

    fn submit_checkout(&self, state: &mut State) {
        let missing = |field: &str| {
            state
                .inputs
                .get(field)
                .map(|v| v.is_empty())
                .unwrap_or(true)
        };

        state.checkout_error = if missing(checkout::FIRST_NAME) {
            Some(checkout::ERROR_FIRST_NAME)
        } else if missing(checkout::LAST_NAME) {
            Some(checkout::ERROR_LAST_NAME)
        } else if missing(checkout::POSTAL_CODE) {
            Some(checkout::ERROR_POSTAL_CODE)
        } else {
            None
        };

        if state.checkout_error.is_none() {
            state.route = Route::CheckoutOverview;
        }
    }

    fn count_items(&self, state: &State, item_selector: &str) -> usize {
        if item_selector == inventory::ITEM {
            self.options.catalog.len()
        } else {
            state.cart.len()
        }
    }

    fn render_png(&self) -> E2eResult<Vec<u8>> {
        let image = RgbaImage::from_pixel(320, 200, Rgba([226, 35, 26, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image).write_to(&mut buf, ImageOutputFormat::Png)?;
        Ok(buf.into_inner())
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.with_state(|state| {
            let base = self.options.base_url.trim_end_matches('/');
            let path = url
                .strip_prefix(base)
                .map(|rest| rest.trim_start_matches('/'))
                .ok_or_else(|| E2eError::Browser(format!("cannot reach {}", url)))?;

            state.menu_open = false;
            state.route = match Route::from_path(path) {
                Some(route) if state.user.is_some() => route,
                _ => Route::Login,
            };
            Ok(())
        })
    }

    async fn reload(&self) -> E2eResult<()> {
        self.with_state(|state| {
            state.inputs.clear();
            state.login_error = None;
            state.checkout_error = None;
            state.menu_open = false;
            if !self.options.persist_sort_on_reload {
                state.sort = SortMode::default();
            }
            Ok(())
        })
    }

    async fn wait_for_load_state(&self) -> E2eResult<()> {
        self.with_state(|_| Ok(()))
    }

    async fn url(&self) -> E2eResult<String> {
        self.with_state(|state| {
            Ok(match state.route {
                Route::Blank => "about:blank".to_string(),
                Route::Login => self.options.base_url.clone(),
                route => self.options.page_url(route.path()),
            })
        })
    }

    async fn title(&self) -> E2eResult<String> {
        self.with_state(|state| {
            Ok(match state.route {
                Route::Blank => String::new(),
                _ => storefront::TITLE.to_string(),
            })
        })
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.with_state(|state| {
            let input = match state.route {
                Route::Login => LOGIN_INPUTS.iter().find(|s| **s == selector),
                Route::CheckoutInfo => CHECKOUT_INPUTS.iter().find(|s| **s == selector),
                _ => None,
            }
            .ok_or_else(|| E2eError::ElementNotFound(selector.to_string()))?;

            state.inputs.insert(*input, value.to_string());
            Ok(())
        })
    }

    async fn click(&self, selector: &str) -> E2eResult<()> {
        self.with_state(|state| self.click_on(state, selector))
    }

    async fn click_nth(&self, selector: &str, index: usize) -> E2eResult<()> {
        self.with_state(|state| {
            let not_found = || E2eError::ElementNotFound(format!("{} #{}", selector, index));

            match (state.route, selector) {
                (Route::Inventory, inventory::ITEM_BUTTONS) => {
                    let item = *self.displayed(state).get(index).ok_or_else(not_found)?;
                    match state.cart.iter().position(|&c| c == item) {
                        Some(pos) => {
                            state.cart.remove(pos);
                        }
                        None => state.cart.push(item),
                    }
                    Ok(())
                }
                (Route::Cart, cart::ITEM_BUTTONS) => {
                    if index >= state.cart.len() {
                        return Err(not_found());
                    }
                    state.cart.remove(index);
                    Ok(())
                }
                _ => Err(not_found()),
            }
        })
    }

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.with_state(|state| {
            if state.route != Route::Inventory || selector != inventory::SORT_SELECT {
                return Err(E2eError::ElementNotFound(selector.to_string()));
            }
            state.sort = value.parse().map_err(|_| {
                E2eError::ElementNotFound(format!("option '{}' in {}", value, selector))
            })?;
            Ok(())
        })
    }

    async fn text_content(&self, selector: &str) -> E2eResult<Option<String>> {
        self.with_state(|state| Ok(self.text(state, selector)))
    }

    async fn input_value(&self, selector: &str) -> E2eResult<Option<String>> {
        self.with_state(|state| {
            if !self.exists(state, selector) {
                return Ok(None);
            }
            if selector == inventory::SORT_SELECT {
                return Ok(Some(state.sort.option_value().to_string()));
            }
            if LOGIN_INPUTS.contains(&selector) || CHECKOUT_INPUTS.contains(&selector) {
                return Ok(Some(state.inputs.get(selector).cloned().unwrap_or_default()));
            }
            Ok(None)
        })
    }

    async fn attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>> {
        self.with_state(|state| {
            if !self.exists(state, selector) || name != "type" {
                return Ok(None);
            }
            Ok(match selector {
                login::PASSWORD => Some("password".to_string()),
                login::SUBMIT => Some("submit".to_string()),
                s if LOGIN_INPUTS.contains(&s) || CHECKOUT_INPUTS.contains(&s) => {
                    Some("text".to_string())
                }
                _ => None,
            })
        })
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        self.with_state(|state| Ok(self.visible(state, selector)))
    }

    async fn count(&self, selector: &str) -> E2eResult<usize> {
        self.with_state(|state| {
            if !self.exists(state, selector) {
                return Ok(0);
            }
            Ok(match (state.route, selector) {
                (
                    Route::Inventory,
                    inventory::ITEM | inventory::ITEM_NAME | inventory::ITEM_BUTTONS,
                ) => self.options.catalog.len(),
                (Route::Inventory, inventory::ITEM_PRICE) => self
                    .options
                    .catalog
                    .iter()
                    .filter(|p| p.price_text.is_some())
                    .count(),
                (Route::Cart | Route::CheckoutOverview, cart::ITEM | cart::ITEM_NAME) => {
                    state.cart.len()
                }
                (Route::Cart, cart::ITEM_BUTTONS) => state.cart.len(),
                _ => 1,
            })
        })
    }

    async fn child_texts(
        &self,
        item_selector: &str,
        child_selector: &str,
    ) -> E2eResult<Vec<Option<String>>> {
        self.with_state(|state| {
            let catalog = &self.options.catalog;
            let texts = match (state.route, item_selector, child_selector) {
                (Route::Inventory, inventory::ITEM, inventory::ITEM_NAME) => self
                    .displayed(state)
                    .into_iter()
                    .map(|i| Some(catalog[i].name.clone()))
                    .collect(),
                (Route::Inventory, inventory::ITEM, inventory::ITEM_PRICE) => self
                    .displayed(state)
                    .into_iter()
                    .map(|i| catalog[i].price_text.clone())
                    .collect(),
                (Route::Inventory, inventory::ITEM, inventory::ITEM_BUTTON) => self
                    .displayed(state)
                    .into_iter()
                    .map(|i| {
                        let label = if state.cart.contains(&i) {
                            inventory::REMOVE_LABEL
                        } else {
                            inventory::ADD_LABEL
                        };
                        Some(label.to_string())
                    })
                    .collect(),
                (Route::Cart | Route::CheckoutOverview, cart::ITEM, cart::ITEM_NAME) => state
                    .cart
                    .iter()
                    .map(|&i| Some(catalog[i].name.clone()))
                    .collect(),
                (Route::Inventory, inventory::ITEM, _)
                | (Route::Cart | Route::CheckoutOverview, cart::ITEM, _) => {
                    vec![None; self.count_items(state, item_selector)]
                }
                _ => Vec::new(),
            };
            Ok(texts)
        })
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        self.with_state(|_| Ok(()))?;
        self.render_png()
    }

    async fn close(&self) -> E2eResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn logged_in(options: StorefrontOptions) -> FakePage {
        let page = FakePage::new(options);
        page.goto("https://www.saucedemo.com/").await.unwrap();
        page.fill(login::USERNAME, "standard_user").await.unwrap();
        page.fill(login::PASSWORD, "secret_sauce").await.unwrap();
        page.click(login::SUBMIT).await.unwrap();
        page
    }

    #[tokio::test]
    async fn inventory_requires_login() {
        let page = FakePage::new(StorefrontOptions::default());
        page.goto("https://www.saucedemo.com/inventory.html").await.unwrap();
        assert_eq!(page.url().await.unwrap(), "https://www.saucedemo.com/");
        assert!(page.is_visible(login::SUBMIT).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_shows_error_banner() {
        let page = FakePage::new(StorefrontOptions::default());
        page.goto("https://www.saucedemo.com/").await.unwrap();
        page.fill(login::USERNAME, "standard_user").await.unwrap();
        page.fill(login::PASSWORD, "nope").await.unwrap();
        page.click(login::SUBMIT).await.unwrap();
        assert_eq!(
            page.text_content(login::ERROR).await.unwrap().as_deref(),
            Some(login::ERROR_MISMATCH)
        );
    }

    #[tokio::test]
    async fn listing_follows_selected_sort() {
        let page = logged_in(StorefrontOptions::default()).await;
        page.select_option(inventory::SORT_SELECT, "lohi").await.unwrap();
        let prices = page
            .child_texts(inventory::ITEM, inventory::ITEM_PRICE)
            .await
            .unwrap();
        assert_eq!(prices.first().cloned().flatten().as_deref(), Some("$7.99"));
        assert_eq!(prices.last().cloned().flatten().as_deref(), Some("$49.99"));
    }

    #[tokio::test]
    async fn unknown_sort_option_is_rejected() {
        let page = logged_in(StorefrontOptions::default()).await;
        let err = page
            .select_option(inventory::SORT_SELECT, "newest")
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn cart_badge_tracks_added_items() {
        let page = logged_in(StorefrontOptions::default()).await;
        assert!(!page.is_visible(header::CART_BADGE).await.unwrap());

        page.click_nth(inventory::ITEM_BUTTONS, 0).await.unwrap();
        page.click_nth(inventory::ITEM_BUTTONS, 1).await.unwrap();
        assert_eq!(
            page.text_content(header::CART_BADGE).await.unwrap().as_deref(),
            Some("2")
        );

        page.click_nth(inventory::ITEM_BUTTONS, 0).await.unwrap();
        assert_eq!(
            page.text_content(header::CART_BADGE).await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn reload_resets_sort_when_not_persisted() {
        let options = StorefrontOptions {
            persist_sort_on_reload: false,
            ..Default::default()
        };
        let page = logged_in(options).await;
        page.select_option(inventory::SORT_SELECT, "hilo").await.unwrap();
        page.reload().await.unwrap();
        assert_eq!(
            page.input_value(inventory::SORT_SELECT).await.unwrap().as_deref(),
            Some("az")
        );
    }

    #[tokio::test]
    async fn menu_links_are_hidden_until_opened() {
        let page = logged_in(StorefrontOptions::default()).await;
        assert!(!page.is_visible(menu::LOGOUT).await.unwrap());
        assert!(matches!(
            page.click(menu::LOGOUT).await,
            Err(E2eError::Timeout(_))
        ));

        page.click(header::MENU_BUTTON).await.unwrap();
        assert!(page.is_visible(menu::LOGOUT).await.unwrap());
    }

    #[tokio::test]
    async fn closed_page_rejects_operations() {
        let page = FakePage::new(StorefrontOptions::default());
        page.close().await.unwrap();
        assert!(matches!(
            page.goto("https://www.saucedemo.com/").await,
            Err(E2eError::Browser(_))
        ));
    }

    #[tokio::test]
    async fn screenshot_is_png() {
        let page = FakePage::new(StorefrontOptions::default());
        let png = page.screenshot().await.unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
