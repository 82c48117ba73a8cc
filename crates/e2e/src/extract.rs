//! Reading the product listing off a rendered page

use shopcheck_common::{PricePolicy, ProductRecord, ProductSequence};
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::page::Page;
use crate::storefront::inventory;

/// Extract every listed product, in display order.
///
/// Names are trimmed. Prices are resolved under `policy`: with
/// [`PricePolicy::Lenient`] a malformed or missing price becomes `0.0`,
/// with [`PricePolicy::Strict`] it fails the extraction. An item without a
/// name node is always an error.
pub async fn extract_products(page: &dyn Page, policy: PricePolicy) -> E2eResult<ProductSequence> {
    let names = page
        .child_texts(inventory::ITEM, inventory::ITEM_NAME)
        .await?;
    let prices = page
        .child_texts(inventory::ITEM, inventory::ITEM_PRICE)
        .await?;

    let sequence = assemble_listing(names, prices, policy)?;
    debug!("Extracted {} products", sequence.len());
    Ok(sequence)
}

/// Pair per-item name and price texts read from the same item list
fn assemble_listing(
    names: Vec<Option<String>>,
    prices: Vec<Option<String>>,
    policy: PricePolicy,
) -> E2eResult<ProductSequence> {
    // Both reads walk the same item list; a mismatch means it re-rendered.
    if names.len() != prices.len() {
        return Err(E2eError::assertion(
            "listing stable while reading",
            format!("{} names and {} prices", names.len(), names.len()),
            format!("{} names and {} prices", names.len(), prices.len()),
        ));
    }

    names
        .into_iter()
        .zip(prices)
        .enumerate()
        .map(|(index, (name, price))| {
            let name = name.ok_or_else(|| {
                E2eError::ElementNotFound(format!(
                    "{} in {} #{}",
                    inventory::ITEM_NAME,
                    inventory::ITEM,
                    index
                ))
            })?;
            Ok(ProductRecord::from_rendered(&name, price.as_deref(), policy)?)
        })
        .collect()
}
