//! Cart totals calculator.
//!
//! Totals are derived data: they are recomputed from the current line
//! snapshot on every query and never stored. The computation is pure and
//! deterministic, using decimal arithmetic throughout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat shipping fee, charged once per non-empty cart.
pub const SHIPPING_FLAT_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat GST rate applied to the subtotal (18%).
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// The priced portion of one cart line: unit price and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmount {
    /// Unit price in the store currency's standard unit.
    pub unit_price: Decimal,
    /// Line quantity. Always positive for a stored line.
    pub quantity: u32,
}

impl LineAmount {
    /// Create a new line amount.
    #[must_use]
    pub const fn new(unit_price: Decimal, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// Extended price for the line (`unit_price * quantity`).
    #[must_use]
    pub fn extended(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Derived cart totals.
///
/// `item_count` counts *distinct lines*, not summed quantities - it is the
/// value that gates checkout. The navigation badge uses summed quantities,
/// which the cart store exposes separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartTotals {
    /// Sum of extended line prices.
    pub subtotal: Decimal,
    /// Flat shipping fee; zero for an empty cart.
    pub shipping: Decimal,
    /// Flat-rate tax on the subtotal.
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    pub total: Decimal,
    /// Number of distinct lines.
    pub item_count: usize,
}

impl CartTotals {
    /// Compute totals from a snapshot of cart lines.
    #[must_use]
    pub fn compute<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = LineAmount>,
    {
        let mut subtotal = Decimal::ZERO;
        let mut item_count = 0usize;

        for line in lines {
            subtotal += line.extended();
            item_count += 1;
        }

        let shipping = if subtotal > Decimal::ZERO {
            SHIPPING_FLAT_FEE
        } else {
            Decimal::ZERO
        };
        let tax = subtotal * TAX_RATE;

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            item_count,
        }
    }

    /// True when there is nothing to check out.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_totals_reference_cart() {
        // [{price: 100, qty: 2}, {price: 50, qty: 1}]
        let totals = CartTotals::compute([
            LineAmount::new(d(100), 2),
            LineAmount::new(d(50), 1),
        ]);

        assert_eq!(totals.subtotal, d(250));
        assert_eq!(totals.shipping, d(50));
        assert_eq!(totals.tax, d(45));
        assert_eq!(totals.total, d(345));
        assert_eq!(totals.item_count, 2);
    }

    #[test]
    fn test_totals_empty_cart() {
        let totals = CartTotals::compute([]);

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.item_count, 0);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_item_count_is_distinct_lines_not_quantity() {
        let totals = CartTotals::compute([LineAmount::new(d(10), 7)]);
        assert_eq!(totals.item_count, 1);
    }

    #[test]
    fn test_fractional_prices() {
        let totals = CartTotals::compute([LineAmount::new(Decimal::new(995, 1), 2)]);
        // 99.5 * 2 = 199.0
        assert_eq!(totals.subtotal, Decimal::new(1990, 1));
        assert_eq!(totals.tax, Decimal::new(35_82, 2));
        assert_eq!(totals.total, Decimal::new(284_82, 2));
    }

    #[test]
    fn test_constants() {
        assert_eq!(SHIPPING_FLAT_FEE, d(50));
        assert_eq!(TAX_RATE, Decimal::new(18, 2));
    }
}
