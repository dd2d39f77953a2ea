//! Remote-authoritative cart store.
//!
//! All operations are scoped to one authenticated user; the hosted
//! `cart_items` table is the source of truth. The upsert and quantity
//! decisions are pure planner functions so they can be tested without a
//! backend. Concurrent tabs race last-write-wins; there is no optimistic
//! locking.

use tracing::instrument;

use waste2worth_core::{CartLineId, CartTotals, LineAmount, ProductId, UserId};

use crate::supabase::types::CartLine;
use crate::supabase::{SupabaseClient, SupabaseError};

// =============================================================================
// Planners (pure)
// =============================================================================

/// What an add should do, given the existing line for (user, product).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPlan {
    /// No line yet: insert one with quantity 1.
    Insert,
    /// A line exists: bump its quantity by one.
    Increment {
        line: CartLineId,
        new_quantity: u32,
    },
}

/// Plan an add against the existing (line id, quantity) pair, if any.
#[must_use]
pub fn plan_add(existing: Option<(CartLineId, u32)>) -> AddPlan {
    match existing {
        Some((line, quantity)) => AddPlan::Increment {
            line,
            new_quantity: quantity + 1,
        },
        None => AddPlan::Insert,
    }
}

/// What a quantity change should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityPlan {
    /// Requested quantity dropped to zero or below: delete the line.
    Remove,
    /// Set the line to this quantity.
    Set(u32),
}

/// Plan a quantity change. Anything at or below zero removes the line.
#[must_use]
pub fn plan_quantity(requested: i64) -> QuantityPlan {
    u32::try_from(requested).map_or(QuantityPlan::Remove, |qty| {
        if qty == 0 {
            QuantityPlan::Remove
        } else {
            QuantityPlan::Set(qty)
        }
    })
}

/// Totals over a line snapshot.
#[must_use]
pub fn totals(lines: &[CartLine]) -> CartTotals {
    CartTotals::compute(
        lines
            .iter()
            .map(|line| LineAmount::new(line.product.price, line.quantity)),
    )
}

// =============================================================================
// CartStore
// =============================================================================

/// Cart operations for one authenticated user.
///
/// Borrows the backend client and the caller's credentials for the duration
/// of a request, the same shape as a scoped service.
pub struct CartStore<'a> {
    supabase: &'a SupabaseClient,
    token: &'a str,
    user: &'a UserId,
}

impl<'a> CartStore<'a> {
    #[must_use]
    pub const fn new(supabase: &'a SupabaseClient, token: &'a str, user: &'a UserId) -> Self {
        Self {
            supabase,
            token,
            user,
        }
    }

    /// Add one unit of a product: increment the existing line or insert a
    /// new one with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or the write fails.
    #[instrument(skip(self))]
    pub async fn add_item(&self, product: &ProductId) -> Result<(), SupabaseError> {
        let existing = self
            .supabase
            .find_cart_line(self.token, self.user, product)
            .await?
            .map(|line| (line.id, line.quantity));

        match plan_add(existing) {
            AddPlan::Insert => {
                self.supabase
                    .insert_cart_line(self.token, self.user, product)
                    .await
            }
            AddPlan::Increment { line, new_quantity } => {
                self.supabase
                    .set_line_quantity(self.token, self.user, &line, new_quantity)
                    .await
            }
        }
    }

    /// The user's lines with products embedded. A remote failure is logged
    /// and reads as an empty cart, never an error page.
    #[instrument(skip(self))]
    pub async fn lines(&self) -> Vec<CartLine> {
        match self.supabase.cart_lines(self.token, self.user).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("Failed to fetch cart lines: {e}");
                Vec::new()
            }
        }
    }

    /// Change a line's quantity; zero or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. A line id belonging to another
    /// user matches zero rows and is not an error.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        line: &CartLineId,
        requested: i64,
    ) -> Result<(), SupabaseError> {
        match plan_quantity(requested) {
            QuantityPlan::Remove => self.remove_line(line).await,
            QuantityPlan::Set(quantity) => {
                self.supabase
                    .set_line_quantity(self.token, self.user, line, quantity)
                    .await
            }
        }
    }

    /// Remove one line. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[instrument(skip(self))]
    pub async fn remove_line(&self, line: &CartLineId) -> Result<(), SupabaseError> {
        self.supabase
            .delete_cart_line(self.token, self.user, line)
            .await
    }

    /// Remove every line for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), SupabaseError> {
        self.supabase
            .delete_all_cart_lines(self.token, self.user)
            .await
    }

    /// Badge count: the sum of quantities across the user's lines.
    /// A remote failure reads as zero.
    #[instrument(skip(self))]
    pub async fn count(&self) -> u32 {
        match self.supabase.cart_quantities(self.token, self.user).await {
            Ok(quantities) => quantities.iter().sum(),
            Err(e) => {
                tracing::warn!("Failed to fetch cart count: {e}");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_add_inserts_when_no_line_exists() {
        assert_eq!(plan_add(None), AddPlan::Insert);
    }

    #[test]
    fn test_plan_add_increments_existing_line() {
        let plan = plan_add(Some((CartLineId::new("line-1"), 1)));
        assert_eq!(
            plan,
            AddPlan::Increment {
                line: CartLineId::new("line-1"),
                new_quantity: 2,
            }
        );
    }

    #[test]
    fn test_plan_quantity_zero_removes() {
        assert_eq!(plan_quantity(0), QuantityPlan::Remove);
    }

    #[test]
    fn test_plan_quantity_negative_removes() {
        assert_eq!(plan_quantity(-3), QuantityPlan::Remove);
    }

    #[test]
    fn test_plan_quantity_positive_sets() {
        assert_eq!(plan_quantity(5), QuantityPlan::Set(5));
    }
}
