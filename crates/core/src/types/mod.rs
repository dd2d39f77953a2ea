//! Core types for the Waste2Worth storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod totals;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use totals::{CartTotals, LineAmount, SHIPPING_FLAT_FEE, TAX_RATE};
