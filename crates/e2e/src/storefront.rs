//! Swag Labs page map
//!
//! Selectors, page paths and fixed texts of the storefront under test. The
//! scenarios and the in-process storefront both go through these constants,
//! so a markup change on the target is a one-line fix here.

use regex::Regex;

pub const TITLE: &str = "Swag Labs";

/// Login page
pub mod login {
    pub const LOGO: &str = "div.login_logo";
    pub const USERNAME: &str = "#user-name";
    pub const PASSWORD: &str = "#password";
    pub const SUBMIT: &str = "#login-button";
    pub const ERROR: &str = "h3[data-test='error']";

    pub const ERROR_MISMATCH: &str =
        "Epic sadface: Username and password do not match any user in this service";
    pub const ERROR_USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    pub const ERROR_PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
}

/// Header shared by every page behind the login
pub mod header {
    pub const TITLE: &str = "span.title";
    pub const CART_LINK: &str = ".shopping_cart_link";
    pub const CART_BADGE: &str = ".shopping_cart_badge";
    pub const MENU_BUTTON: &str = "#react-burger-menu-btn";
}

/// Burger menu
pub mod menu {
    pub const WRAP: &str = ".bm-menu-wrap";
    pub const ALL_ITEMS: &str = "#inventory_sidebar_link";
    pub const ABOUT: &str = "#about_sidebar_link";
    pub const LOGOUT: &str = "#logout_sidebar_link";
    pub const RESET: &str = "#reset_sidebar_link";
}

/// Product listing
pub mod inventory {
    pub const PATH: &str = "inventory.html";
    pub const TITLE: &str = "Products";
    pub const ITEM: &str = ".inventory_item";
    pub const ITEM_NAME: &str = ".inventory_item_name";
    pub const ITEM_PRICE: &str = ".inventory_item_price";
    pub const ITEM_BUTTON: &str = "button";
    /// Per-item add/remove buttons, one per listed item
    pub const ITEM_BUTTONS: &str = ".inventory_item button";
    pub const SORT_SELECT: &str = ".product_sort_container";

    pub const ADD_LABEL: &str = "Add to cart";
    pub const REMOVE_LABEL: &str = "Remove";
}

/// Cart
pub mod cart {
    pub const PATH: &str = "cart.html";
    pub const TITLE: &str = "Your Cart";
    pub const ITEM: &str = ".cart_item";
    pub const ITEM_NAME: &str = ".inventory_item_name";
    pub const ITEM_BUTTONS: &str = ".cart_item button";
    pub const CONTINUE_SHOPPING: &str = "#continue-shopping";
    pub const CHECKOUT: &str = "#checkout";
}

/// Three-step checkout
pub mod checkout {
    pub const INFO_PATH: &str = "checkout-step-one.html";
    pub const OVERVIEW_PATH: &str = "checkout-step-two.html";
    pub const COMPLETE_PATH: &str = "checkout-complete.html";

    pub const INFO_TITLE: &str = "Checkout: Your Information";
    pub const OVERVIEW_TITLE: &str = "Checkout: Overview";
    pub const COMPLETE_TITLE: &str = "Checkout: Complete!";

    pub const FIRST_NAME: &str = "#first-name";
    pub const LAST_NAME: &str = "#last-name";
    pub const POSTAL_CODE: &str = "#postal-code";
    pub const CONTINUE: &str = "#continue";
    pub const FINISH: &str = "#finish";
    pub const ERROR: &str = "h3[data-test='error']";
    pub const COMPLETE_HEADER: &str = ".complete-header";
    pub const BACK_TO_PRODUCTS: &str = "#back-to-products";

    pub const CONFIRMATION: &str = "Thank you for your order!";
    pub const ERROR_FIRST_NAME: &str = "Error: First Name is required";
    pub const ERROR_LAST_NAME: &str = "Error: Last Name is required";
    pub const ERROR_POSTAL_CODE: &str = "Error: Postal Code is required";
}

/// Pattern matching any URL that ends in `path`, like `.*inventory\.html`
pub fn url_pattern(path: &str) -> Regex {
    // An escaped literal always compiles.
    Regex::new(&format!(r".*{}$", regex::escape(path))).expect("escaped path is a valid regex")
}
