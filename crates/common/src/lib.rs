//! Shopcheck Common Library
//!
//! Domain types for a rendered product listing and the rules that decide
//! whether a listing is ordered for a given sort mode.

pub mod error;
pub mod price;
pub mod types;
pub mod verify;

// Re-export commonly used types
pub use error::{Error, Result};
pub use price::{parse_price, PricePolicy};
pub use types::*;
pub use verify::{is_ordered, verify_order, verify_persisted, verify_reordered, VerifyError};

/// Shopcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
