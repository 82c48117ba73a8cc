//! Per-scenario page session and explicit authentication

use shopcheck_common::{Credentials, PricePolicy, ProductSequence};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::TargetConfig;
use crate::error::E2eResult;
use crate::expect::Expect;
use crate::extract::extract_products;
use crate::page::Page;
use crate::storefront::{self, header, inventory, login};

/// One fresh page plus the settings a scenario needs to drive it
pub struct Session {
    page: Arc<dyn Page>,
    target: TargetConfig,
    price_policy: PricePolicy,
}

impl Session {
    pub fn new(page: Arc<dyn Page>, target: TargetConfig, price_policy: PricePolicy) -> Self {
        Self {
            page,
            target,
            price_policy,
        }
    }

    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    /// Expectations bounded by the configured expect timeout
    pub fn expect(&self) -> Expect<'_> {
        Expect::new(self.page(), self.target.expect_timeout())
    }

    /// Navigate to the login page and wait for it to load
    pub async fn open_login_page(&self) -> E2eResult<()> {
        debug!("Opening {}", self.target.base_url);
        self.page.goto(&self.target.base_url).await?;
        self.page.wait_for_load_state().await
    }

    /// Product listing as currently rendered
    pub async fn products(&self) -> E2eResult<ProductSequence> {
        extract_products(self.page(), self.price_policy).await
    }
}

/// A [`Session`] whose page is logged in and showing the product listing
pub struct AuthenticatedSession<'s> {
    session: &'s Session,
    username: String,
}

impl AuthenticatedSession<'_> {
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Deref for AuthenticatedSession<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

/// Log in through the login form.
///
/// Succeeds once the browser lands on the product listing and its header
/// reads "Products"; a rejected login surfaces as the URL assertion failing.
pub async fn authenticate<'s>(
    session: &'s Session,
    credentials: &Credentials,
) -> E2eResult<AuthenticatedSession<'s>> {
    session.open_login_page().await?;

    let page = session.page();
    page.fill(login::USERNAME, &credentials.username).await?;
    page.fill(login::PASSWORD, &credentials.password).await?;
    page.click(login::SUBMIT).await?;
    page.wait_for_load_state().await?;

    let expect = session.expect();
    expect
        .to_match_url(&storefront::url_pattern(inventory::PATH))
        .await?;
    expect.to_have_text(header::TITLE, inventory::TITLE).await?;

    info!("Logged in as {}", credentials.username);
    Ok(AuthenticatedSession {
        session,
        username: credentials.username.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::E2eError;
    use crate::mock::{FakePage, StorefrontOptions};
    use async_trait::async_trait;
    use std::time::Duration;

    /// The fake storefront with a header that never reads "Products"
    struct MislabelledHeader(FakePage);

    #[async_trait]
    impl Page for MislabelledHeader {
        async fn goto(&self, url: &str) -> E2eResult<()> {
            self.0.goto(url).await
        }
        async fn reload(&self) -> E2eResult<()> {
            self.0.reload().await
        }
        async fn wait_for_load_state(&self) -> E2eResult<()> {
            self.0.wait_for_load_state().await
        }
        async fn url(&self) -> E2eResult<String> {
            self.0.url().await
        }
        async fn title(&self) -> E2eResult<String> {
            self.0.title().await
        }
        async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
            self.0.fill(selector, value).await
        }
        async fn click(&self, selector: &str) -> E2eResult<()> {
            self.0.click(selector).await
        }
        async fn click_nth(&self, selector: &str, index: usize) -> E2eResult<()> {
            self.0.click_nth(selector, index).await
        }
        async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()> {
            self.0.select_option(selector, value).await
        }
        async fn text_content(&self, selector: &str) -> E2eResult<Option<String>> {
            if selector == header::TITLE {
                return Ok(Some("Checkout: Overview".to_string()));
            }
            self.0.text_content(selector).await
        }
        async fn input_value(&self, selector: &str) -> E2eResult<Option<String>> {
            self.0.input_value(selector).await
        }
        async fn attribute(&self, selector: &str, name: &str) -> E2eResult<Option<String>> {
            self.0.attribute(selector, name).await
        }
        async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
            self.0.is_visible(selector).await
        }
        async fn count(&self, selector: &str) -> E2eResult<usize> {
            self.0.count(selector).await
        }
        async fn child_texts(
            &self,
            item_selector: &str,
            child_selector: &str,
        ) -> E2eResult<Vec<Option<String>>> {
            self.0.child_texts(item_selector, child_selector).await
        }
        async fn screenshot(&self) -> E2eResult<Vec<u8>> {
            self.0.screenshot().await
        }
        async fn close(&self) -> E2eResult<()> {
            self.0.close().await
        }
    }

    fn session() -> Session {
        let target = TargetConfig {
            expect_timeout_ms: 200,
            ..Default::default()
        };
        let page = Arc::new(FakePage::new(StorefrontOptions::default()));
        Session::new(page, target, PricePolicy::Lenient)
    }

    #[tokio::test]
    async fn authenticate_lands_on_inventory() {
        let session = session();
        let authed = authenticate(&session, &Credentials::default()).await.unwrap();
        assert_eq!(authed.username(), "standard_user");
        assert_eq!(
            authed.page().url().await.unwrap(),
            "https://www.saucedemo.com/inventory.html"
        );
        assert_eq!(authed.products().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn rejected_login_fails_url_assertion() {
        let session = session();
        let started = tokio::time::Instant::now();
        let err = authenticate(&session, &Credentials::new("locked", "nope"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, E2eError::AssertionFailed { .. }));
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn wrong_listing_header_fails_authentication() {
        let target = TargetConfig {
            expect_timeout_ms: 200,
            ..Default::default()
        };
        let page = MislabelledHeader(FakePage::new(StorefrontOptions::default()));
        let session = Session::new(Arc::new(page), target, PricePolicy::Lenient);

        let err = authenticate(&session, &Credentials::default())
            .await
            .err()
            .unwrap();
        match err {
            E2eError::AssertionFailed { what, actual, .. } => {
                assert_eq!(what, "text of span.title");
                assert_eq!(actual, "\"Checkout: Overview\"");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
