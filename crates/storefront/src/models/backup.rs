//! Best-effort device-local cart mirror.
//!
//! The remote `cart_items` table is authoritative. This mirror only records
//! what the device added, as a recovery copy of the shopper's picks. It is
//! updated on add, cleared on cart clear and logout, and never pushed back
//! to the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use waste2worth_core::ProductId;

use crate::models::session_keys;

/// One mirrored line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// The mirrored cart value kept under one session key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartBackup {
    lines: Vec<BackupLine>,
}

impl CartBackup {
    /// Record an add: increments the mirrored quantity if the product is
    /// already present, otherwise appends a line with quantity 1.
    pub fn record_add(&mut self, product_id: ProductId, name: String, price: Decimal) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(BackupLine {
            product_id,
            name,
            price,
            quantity: 1,
        });
    }

    #[must_use]
    pub fn lines(&self) -> &[BackupLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Load the mirror from the session. Absent or unreadable reads as empty.
pub async fn load(session: &Session) -> CartBackup {
    session
        .get::<CartBackup>(session_keys::CART_BACKUP)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the mirror. Best effort: failures are logged, not surfaced.
pub async fn save(session: &Session, backup: &CartBackup) {
    if let Err(e) = session.insert(session_keys::CART_BACKUP, backup).await {
        tracing::warn!("Failed to save cart mirror to session: {e}");
    }
}

/// Drop the mirror. Best effort.
pub async fn clear(session: &Session) {
    if let Err(e) = session.remove::<CartBackup>(session_keys::CART_BACKUP).await {
        tracing::warn!("Failed to clear cart mirror from session: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_add_increments_existing() {
        let mut backup = CartBackup::default();
        backup.record_add(ProductId::new("p1"), "Bricket".to_string(), Decimal::from(80));
        backup.record_add(ProductId::new("p1"), "Bricket".to_string(), Decimal::from(80));

        assert_eq!(backup.lines().len(), 1);
        assert_eq!(backup.lines()[0].quantity, 2);
    }

    #[test]
    fn test_record_add_appends_new_product() {
        let mut backup = CartBackup::default();
        backup.record_add(ProductId::new("p1"), "Bricket".to_string(), Decimal::from(80));
        backup.record_add(ProductId::new("p2"), "Coco-Peat".to_string(), Decimal::from(199));

        assert_eq!(backup.lines().len(), 2);
        assert_eq!(backup.lines()[1].quantity, 1);
    }
}
