//! Product listing sort flows

use shopcheck_common::{verify_order, verify_persisted, verify_reordered, ProductSequence, SortMode};
use tracing::{debug, info};

use super::StepLog;
use crate::error::E2eResult;
use crate::session::{authenticate, AuthenticatedSession, Session};
use crate::storefront::inventory;

/// Pick `mode` in the sort selector and confirm the selector reflects it
async fn select_mode(shop: &AuthenticatedSession<'_>, mode: SortMode) -> E2eResult<()> {
    let page = shop.page();
    page.select_option(inventory::SORT_SELECT, mode.option_value())
        .await?;
    page.wait_for_load_state().await?;
    shop.expect()
        .to_have_value(inventory::SORT_SELECT, mode.option_value())
        .await
}

async fn listing(shop: &AuthenticatedSession<'_>, mode: SortMode) -> E2eResult<ProductSequence> {
    let products = shop.products().await?;
    debug!("Listing under {}:\n{}", mode.label(), products.to_table());
    Ok(products)
}

pub(super) async fn default_order(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;

    steps.step("default sort is name ascending");
    let mode = SortMode::default();
    shop.expect()
        .to_have_value(inventory::SORT_SELECT, mode.option_value())
        .await?;

    steps.step("listing ordered by name");
    let products = listing(&shop, mode).await?;
    info!("Found {} products", products.len());
    verify_order(&products, mode)?;

    Ok(())
}

pub(super) async fn single_mode(
    session: &Session,
    steps: &mut StepLog,
    mode: SortMode,
) -> E2eResult<()> {
    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;

    steps.step(format!("select {}", mode.label()));
    select_mode(&shop, mode).await?;

    steps.step(format!("listing ordered {}", mode.label()));
    let products = listing(&shop, mode).await?;
    verify_order(&products, mode)?;

    Ok(())
}

pub(super) async fn all_modes(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;

    let mut previous: Option<(SortMode, ProductSequence)> = None;
    for mode in SortMode::ALL {
        steps.step(format!("select {}", mode.label()));
        select_mode(&shop, mode).await?;
        let products = listing(&shop, mode).await?;

        if let Some((from, before)) = &previous {
            verify_reordered(before, *from, &products, mode)?;
        }
        verify_order(&products, mode)?;
        info!("{} ok", mode.label());

        previous = Some((mode, products));
    }

    Ok(())
}

pub(super) async fn persistence(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    let mode = SortMode::PriceDescending;

    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;

    steps.step(format!("select {}", mode.label()));
    select_mode(&shop, mode).await?;
    let before = listing(&shop, mode).await?;

    steps.step("reload page");
    shop.page().reload().await?;
    shop.page().wait_for_load_state().await?;

    steps.step("sort survives reload");
    shop.expect()
        .to_have_value(inventory::SORT_SELECT, mode.option_value())
        .await?;
    let after = listing(&shop, mode).await?;
    verify_persisted(mode, &before, &after)?;

    Ok(())
}

pub(super) async fn special_characters(session: &Session, steps: &mut StepLog) -> E2eResult<()> {
    let mode = SortMode::NameAscending;

    steps.step("log in");
    let shop = authenticate(session, &session.target().credentials).await?;

    steps.step(format!("select {}", mode.label()));
    select_mode(&shop, mode).await?;

    steps.step("listing ordered by name");
    let products = listing(&shop, mode).await?;
    for record in products.iter().filter(|r| r.has_special_characters()) {
        info!("Special characters in {:?}", record.name);
    }
    verify_order(&products, mode)?;

    Ok(())
}
