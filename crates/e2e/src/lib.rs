//! Shopcheck E2E Scenarios
//!
//! End-to-end checks of the Swag Labs demo storefront: login and logout,
//! cart, checkout and the four product sort modes. Scenarios drive a
//! [`Page`] and assert through auto-waiting [`Expect`] calls; listings are
//! extracted into [`shopcheck_common::ProductSequence`] and judged by the
//! common verifiers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── preflight GET base_url (live runs)                   │
//! │    ├── Driver::new_page() -> Arc<dyn Page>  (per scenario)  │
//! │    ├── Scenario::run(&Session, &mut StepLog)                │
//! │    ├── on failure: screenshot -> SnapshotInfo               │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Driver                                                     │
//! │    ├── ChromiumDriver  (chromiumoxide, one context/page)    │
//! │    └── FakeDriver      (in-process storefront)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario                                                   │
//! │    ├── authenticate(session, credentials)                   │
//! │    ├── extract_products(page, policy) -> ProductSequence    │
//! │    └── verify_order / verify_reordered / verify_persisted   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod chromium;
pub mod cli;
pub mod config;
pub mod error;
pub mod expect;
pub mod extract;
pub mod mock;
pub mod page;
pub mod preflight;
pub mod runner;
pub mod scenarios;
pub mod session;
pub mod snapshot;
pub mod storefront;

use std::sync::Arc;

pub use cli::RunArgs;
pub use config::{DriverKind, SuiteConfig};
pub use error::{E2eError, E2eResult};
pub use expect::Expect;
pub use page::{Driver, Page};
pub use runner::{RunnerConfig, ScenarioResult, SuiteResult, TestRunner};
pub use scenarios::Scenario;
pub use session::{authenticate, AuthenticatedSession, Session};

/// Start the driver selected in `config`
pub async fn open_driver(config: &SuiteConfig) -> E2eResult<Arc<dyn Driver>> {
    match config.browser.driver {
        DriverKind::Chromium => {
            let driver = chromium::ChromiumDriver::launch(
                &config.browser,
                config.target.action_timeout(),
            )
            .await?;
            Ok(Arc::new(driver))
        }
        DriverKind::Fake => {
            let options = mock::StorefrontOptions {
                base_url: config.target.base_url.clone(),
                accounts: vec![config.target.credentials.clone()],
                ..Default::default()
            };
            Ok(Arc::new(mock::FakeDriver::new(options)))
        }
    }
}
