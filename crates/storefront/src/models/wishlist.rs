//! Device-local wishlist.
//!
//! The wishlist never leaves the device: it is a pure value serialized under
//! one session key, not tied to a user account, and not synced to the hosted
//! backend. A missing or malformed session value reads as an empty list.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use waste2worth_core::ProductId;

use crate::models::session_keys;

/// A denormalized product snapshot saved when the user wishlists it.
///
/// A snapshot, not a live reference: the entry keeps rendering even if the
/// product later changes or disappears from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Emoji fallback shown when there is no image.
    #[serde(default)]
    pub icon: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// The wishlist value: at most one entry per product id, insertion order
/// preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// Add an entry. Returns `false` and leaves the list unchanged if the
    /// product is already present.
    pub fn add(&mut self, entry: WishlistEntry) -> bool {
        if self.contains(&entry.product_id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the entry for a product id. Idempotent.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.entries.retain(|e| &e.product_id != product_id);
    }

    /// Whether the product is wishlisted.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product_id == product_id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load the wishlist from the session. Absent or unreadable reads as empty.
pub async fn load(session: &Session) -> Wishlist {
    session
        .get::<Wishlist>(session_keys::WISHLIST)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the wishlist to the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save(
    session: &Session,
    wishlist: &Wishlist,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::WISHLIST, wishlist).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> WishlistEntry {
        WishlistEntry {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Decimal::from(100),
            image_url: None,
            icon: Some("🌱".to_string()),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_deduplicates_by_product_id() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.add(entry("p1")));
        assert!(!wishlist.add(entry("p1")));
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(&ProductId::new("p1")));
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut wishlist = Wishlist::default();
        wishlist.add(entry("p2"));
        wishlist.add(entry("p1"));
        wishlist.add(entry("p3"));

        let ids: Vec<&str> = wishlist
            .entries()
            .iter()
            .map(|e| e.product_id.as_str())
            .collect();
        assert_eq!(ids, ["p2", "p1", "p3"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut wishlist = Wishlist::default();
        wishlist.add(entry("p1"));

        wishlist.remove(&ProductId::new("p1"));
        assert!(wishlist.is_empty());

        // Removing again is a no-op
        wishlist.remove(&ProductId::new("p1"));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_remove_missing_changes_nothing() {
        let mut wishlist = Wishlist::default();
        wishlist.add(entry("p1"));
        wishlist.remove(&ProductId::new("p9"));
        assert_eq!(wishlist.len(), 1);
    }
}
