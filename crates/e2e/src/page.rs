//! Page-interaction abstraction
//!
//! Scenarios only ever talk to a storefront through [`Page`]. A [`Driver`]
//! hands out independent pages, one per scenario, so no browser state leaks
//! between scenarios. Implementations exist for Chromium
//! ([`crate::chromium`]) and for the in-process storefront ([`crate::mock`]).

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::E2eResult;

/// A single browser page with the primitives the scenarios need.
///
/// Selectors are CSS selectors. Every method is bounded by the
/// implementation's action timeout.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to an absolute URL and wait for it to load
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Reload the current document
    async fn reload(&self) -> E2eResult<()>;

    /// Wait until the document has finished loading
    async fn wait_for_load_state(&self) -> E2eResult<()>;

    async fn url(&self) -> E2eResult<String>;

    async fn title(&self) -> E2eResult<String>;

    /// Replace the value of an input field
    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()>;

    async fn click(&self, selector: &str) -> E2eResult<()>;

    /// Click the `index`-th element (document order) matching `selector`
    async fn click_nth(&self, selector: &str, index: usize) -> E2eResult<()>;

    /// Choose an option of a `<select>` by its value
    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()>;

    /// Text content of the first match, `None` if nothing matches
    async fn text_content(&self, selector: &str) -> E2eResult<Option<String>>;

    /// Current value of the first matching form control
    async fn input_value(&self, selector: &str) -> E2eResult<Option<String>>;

    async fn attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>>;

    /// Whether the first match exists and is rendered visibly
    async fn is_visible(&self, selector: &str) -> E2eResult<bool>;

    async fn count(&self, selector: &str) -> E2eResult<usize>;

    /// For every element matching `item_selector`, in display order, the text
    /// of its first descendant matching `child_selector`
    async fn child_texts(
        &self,
        item_selector: &str,
        child_selector: &str,
    ) -> E2eResult<Vec<Option<String>>>;

    /// Full-page PNG capture
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;

    async fn close(&self) -> E2eResult<()>;
}

/// A source of independent pages
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a page with fresh cookies and storage
    async fn new_page(&self) -> E2eResult<Arc<dyn Page>>;

    /// Release the underlying browser
    async fn shutdown(&self) -> E2eResult<()>;

    /// Short name for logs and reports
    fn name(&self) -> &'static str;
}
