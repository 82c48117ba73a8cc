//! Cart and checkout flows

use shopcheck_common::CheckoutDetails;
use tracing::info;

use super::StepLog;
use crate::error::{E2eError, E2eResult};
use crate::session::{authenticate, AuthenticatedSession, Session};
use crate::storefront::{cart, checkout, header, inventory, url_pattern};

/// Add the first `n` listed products through their "Add to cart" buttons,
/// returning their names
async fn add_first_products(shop: &AuthenticatedSession<'_>, n: usize) -> E2eResult<Vec<String>> {
    let page = shop.page();
    let names = page
        .child_texts(inventory::ITEM, inventory::ITEM_NAME)
        .await?;
    let labels = page
        .child_texts(inventory::ITEM, inventory::ITEM_BUTTON)
        .await?;

    if names.len() < n {
        return Err(E2eError::assertion(
            "listed products",
            format!("at least {}", n),
            names.len(),
        ));
    }

    let mut added = Vec::with_capacity(n);
    for (index, (name, label)) in names.into_iter().zip(labels).take(n).enumerate() {
        let name = name
            .map(|n| n.trim().to_string())
            .ok_or_else(|| E2eError::ElementNotFound(inventory::ITEM_NAME.to_string()))?;
        let label = label.unwrap_or_default();
        if label.trim() != inventory::ADD_LABEL {
            return Err(E2eError::assertion(
                format!("button of {:?}", name),
                format!("{:?}", inventory::ADD_LABEL),
                format!("{:?}", label.trim()),
            ));
        }

        page.click_nth(inventory::ITEM_BUTTONS, index).await?;
        info!("Added {:?} to the cart", name);
        added.push(name);
    }
    Ok(added)
}

pub(super) async fn add_remove(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;
    let page = shop.page();
    let expect = shop.expect();

    steps.step("add first product");
    let added = add_first_products(&shop, 1).await?;

    steps.step("cart badge shows 1");
    expect.to_be_visible(header::CART_BADGE).await?;
    expect.to_have_text(header::CART_BADGE, "1").await?;

    steps.step("open cart");
    page.click(header::CART_LINK).await?;
    expect.to_match_url(&url_pattern(cart::PATH)).await?;

    steps.step("product is in the cart");
    expect.to_have_count(cart::ITEM, 1).await?;
    expect.to_have_text(cart::ITEM_NAME, &added[0]).await?;

    steps.step("remove product");
    page.click_nth(cart::ITEM_BUTTONS, 0).await?;
    expect.not_to_be_visible(cart::ITEM).await?;
    expect.not_to_be_visible(header::CART_BADGE).await?;

    steps.step("continue shopping");
    page.click(cart::CONTINUE_SHOPPING).await?;
    expect.to_match_url(&url_pattern(inventory::PATH)).await?;

    Ok(())
}

pub(super) async fn complete_order(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;
    let page = shop.page();
    let expect = shop.expect();

    steps.step("add two products");
    add_first_products(&shop, 2).await?;
    expect.to_have_text(header::CART_BADGE, "2").await?;

    steps.step("open cart");
    page.click(header::CART_LINK).await?;
    expect.to_match_url(&url_pattern(cart::PATH)).await?;
    expect.to_have_count(cart::ITEM, 2).await?;

    steps.step("start checkout");
    page.click(cart::CHECKOUT).await?;
    expect.to_match_url(&url_pattern(checkout::INFO_PATH)).await?;

    steps.step("fill customer details");
    let details = CheckoutDetails::random();
    info!(
        "Checking out as {} {}, postal code {}",
        details.first_name, details.last_name, details.postal_code
    );
    page.fill(checkout::FIRST_NAME, &details.first_name).await?;
    page.fill(checkout::LAST_NAME, &details.last_name).await?;
    page.fill(checkout::POSTAL_CODE, &details.postal_code).await?;

    steps.step("continue to overview");
    page.click(checkout::CONTINUE).await?;
    expect.to_match_url(&url_pattern(checkout::OVERVIEW_PATH)).await?;

    steps.step("finish order");
    page.click(checkout::FINISH).await?;
    expect.to_match_url(&url_pattern(checkout::COMPLETE_PATH)).await?;

    steps.step("confirmation shown");
    expect
        .to_have_text(checkout::COMPLETE_HEADER, checkout::CONFIRMATION)
        .await?;

    steps.step("back to products");
    page.click(checkout::BACK_TO_PRODUCTS).await?;
    expect.to_match_url(&url_pattern(inventory::PATH)).await?;

    Ok(())
}
