//! Business logic services.
//!
//! The decision logic (upsert planning, featured selection, card rules,
//! fallback text) is pure and unit-tested; the async methods are thin glue
//! over the backend client.

pub mod assistant;
pub mod cart;
pub mod catalog;

pub use assistant::AssistantClient;
pub use cart::CartStore;
