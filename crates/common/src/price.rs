//! Parsing of rendered currency text
//!
//! Prices are rendered as `"$29.99"`. Parsing strips surrounding whitespace
//! and the dollar sign, then reads a finite, non-negative decimal.
//!
//! Text that does not parse is resolved by a [`PricePolicy`]:
//! [`PricePolicy::Lenient`] substitutes `0.0`, [`PricePolicy::Strict`]
//! returns the error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Price substituted for malformed text under the lenient policy
pub const FALLBACK_PRICE: f64 = 0.0;

/// How malformed price text is handled during extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Substitute [`FALLBACK_PRICE`] and log a warning
    #[default]
    Lenient,
    /// Fail with [`Error::MalformedPrice`]
    Strict,
}

impl PricePolicy {
    /// Resolve rendered price text to a value under this policy.
    ///
    /// `None` means the price node was absent from the item.
    pub fn resolve(&self, text: Option<&str>) -> Result<f64> {
        let parsed = match text {
            Some(text) => parse_price(text),
            None => Err(Error::MalformedPrice {
                text: String::new(),
            }),
        };

        match (parsed, self) {
            (Ok(price), _) => Ok(price),
            (Err(e), PricePolicy::Lenient) => {
                warn!("{}; substituting {:.2}", e, FALLBACK_PRICE);
                Ok(FALLBACK_PRICE)
            }
            (Err(e), PricePolicy::Strict) => Err(e),
        }
    }
}

/// Parse currency text such as `"$29.99"` into a decimal price
pub fn parse_price(text: &str) -> Result<f64> {
    let malformed = || Error::MalformedPrice {
        text: text.to_string(),
    };

    let digits = text.trim().replace('$', "");
    let price: f64 = digits.trim().parse().map_err(|_| malformed())?;

    if !price.is_finite() || price < 0.0 {
        return Err(malformed());
    }

    Ok(price)
}
