//! Domain models for the storefront.
//!
//! Everything here is device-local state kept in the per-device session:
//! the cached identity, the wishlist, the best-effort cart mirror, and the
//! chat transcript. The authoritative cart and catalog live on the hosted
//! backend and are modeled in [`crate::supabase::types`].

pub mod backup;
pub mod chat;
pub mod session;
pub mod wishlist;

pub use backup::CartBackup;
pub use chat::{ChatLog, ChatMessage, ChatRole};
pub use session::{CurrentUser, session_keys};
pub use wishlist::{Wishlist, WishlistEntry};
