//! Storefront scenarios
//!
//! Each scenario is an independent flow run against a fresh [`Session`].
//! Steps are announced on a [`StepLog`] so a failure report names the step
//! that broke.

mod auth;
mod cart;
mod sorting;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

use crate::error::{E2eError, E2eResult};
use crate::session::Session;

/// Every scenario the suite knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    LoginLogout,
    InvalidCredentials,
    CartAddRemove,
    CheckoutCompleteOrder,
    SortNameAscendingDefault,
    SortNameDescending,
    SortPriceAscending,
    SortPriceDescending,
    SortAllModes,
    SortPersistence,
    SortSpecialCharacters,
}

impl Scenario {
    pub const ALL: [Scenario; 11] = [
        Scenario::LoginLogout,
        Scenario::InvalidCredentials,
        Scenario::CartAddRemove,
        Scenario::CheckoutCompleteOrder,
        Scenario::SortNameAscendingDefault,
        Scenario::SortNameDescending,
        Scenario::SortPriceAscending,
        Scenario::SortPriceDescending,
        Scenario::SortAllModes,
        Scenario::SortPersistence,
        Scenario::SortSpecialCharacters,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::LoginLogout => "auth-login-logout",
            Scenario::InvalidCredentials => "auth-invalid-credentials",
            Scenario::CartAddRemove => "cart-add-remove",
            Scenario::CheckoutCompleteOrder => "checkout-complete-order",
            Scenario::SortNameAscendingDefault => "sort-name-ascending-default",
            Scenario::SortNameDescending => "sort-name-descending",
            Scenario::SortPriceAscending => "sort-price-ascending",
            Scenario::SortPriceDescending => "sort-price-descending",
            Scenario::SortAllModes => "sort-all-modes",
            Scenario::SortPersistence => "sort-persistence",
            Scenario::SortSpecialCharacters => "sort-special-characters",
        }
    }

    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Scenario::LoginLogout => &["auth", "smoke"],
            Scenario::InvalidCredentials => &["auth"],
            Scenario::CartAddRemove => &["cart"],
            Scenario::CheckoutCompleteOrder => &["cart", "checkout", "smoke"],
            Scenario::SortNameAscendingDefault => &["sort", "smoke"],
            Scenario::SortNameDescending
            | Scenario::SortPriceAscending
            | Scenario::SortPriceDescending
            | Scenario::SortAllModes
            | Scenario::SortPersistence
            | Scenario::SortSpecialCharacters => &["sort"],
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }

    pub async fn run(&self, session: &Session, steps: &mut StepLog) -> E2eResult<()> {
        use shopcheck_common::SortMode;

        match self {
            Scenario::LoginLogout => auth::login_logout(session, steps).await,
            Scenario::InvalidCredentials => auth::invalid_credentials(session, steps).await,
            Scenario::CartAddRemove => cart::add_remove(session, steps).await,
            Scenario::CheckoutCompleteOrder => cart::complete_order(session, steps).await,
            Scenario::SortNameAscendingDefault => sorting::default_order(session, steps).await,
            Scenario::SortNameDescending => {
                sorting::single_mode(session, steps, SortMode::NameDescending).await
            }
            Scenario::SortPriceAscending => {
                sorting::single_mode(session, steps, SortMode::PriceAscending).await
            }
            Scenario::SortPriceDescending => {
                sorting::single_mode(session, steps, SortMode::PriceDescending).await
            }
            Scenario::SortAllModes => sorting::all_modes(session, steps).await,
            Scenario::SortPersistence => sorting::persistence(session, steps).await,
            Scenario::SortSpecialCharacters => sorting::special_characters(session, steps).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = E2eError;

    fn from_str(s: &str) -> E2eResult<Self> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name() == s)
            .ok_or_else(|| E2eError::ScenarioNotFound(s.to_string()))
    }
}

/// Outcome of one scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Records the steps of a running scenario.
///
/// Announcing a step closes the previous one as passed. [`StepLog::finish`]
/// closes the last step with the scenario's outcome.
#[derive(Debug, Default)]
pub struct StepLog {
    done: Vec<StepResult>,
    current: Option<(String, Instant)>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, name: impl Into<String>) {
        self.close(None);
        let name = name.into();
        info!("  → {}", name);
        self.current = Some((name, Instant::now()));
    }

    /// Name of the step in progress
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(name, _)| name.as_str())
    }

    fn close(&mut self, error: Option<String>) {
        if let Some((step_name, started)) = self.current.take() {
            self.done.push(StepResult {
                step_name,
                success: error.is_none(),
                duration_ms: started.elapsed().as_millis() as u64,
                error,
            });
        }
    }

    pub fn finish(mut self, outcome: &E2eResult<()>) -> Vec<StepResult> {
        self.close(outcome.as_ref().err().map(|e| e.to_string()));
        self.done
    }
}
