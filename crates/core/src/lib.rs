//! Waste2Worth Core - Shared types library.
//!
//! This crate provides the common types used by the Waste2Worth storefront.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, product
//!   categories, and the cart totals calculator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
