//! Catalog presentation rules.
//!
//! Featured selection and card rules are pure functions over the fetched
//! product list. The homepage shows at most one card per category bucket;
//! the card action depends on the category and the stock level.

use waste2worth_core::Category;

use crate::supabase::types::Product;

/// Stock threshold below which the low-stock notice appears.
const LOW_STOCK_THRESHOLD: u32 = 10;

/// What the card's button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Link to the category's collection page.
    Collection { href: &'static str },
    /// Add the product straight to the cart.
    AddToCart,
    /// No stock: the action is disabled.
    OutOfStock,
}

/// Decide the card action. Perfume and cocoplate cards always link to their
/// collection pages; the rest add to cart unless sold out.
#[must_use]
pub const fn card_action(product: &Product) -> CardAction {
    match product.category {
        Category::Perfume => CardAction::Collection {
            href: "/collections/perfume",
        },
        Category::Cocoplate => CardAction::Collection {
            href: "/collections/cocoplate",
        },
        Category::CocoPeat | Category::Bricket | Category::Other => {
            if product.stock == 0 {
                CardAction::OutOfStock
            } else {
                CardAction::AddToCart
            }
        }
    }
}

/// Stock notice text, if any.
#[must_use]
pub fn stock_notice(stock: u32) -> Option<String> {
    match stock {
        0 => Some("Out of Stock".to_string()),
        s if s < LOW_STOCK_THRESHOLD => Some(format!("Only {s} left!")),
        _ => None,
    }
}

/// Pick the featured set: the first product of each category bucket in
/// fetch order, at most one per bucket.
#[must_use]
pub fn featured(products: &[Product]) -> Vec<&Product> {
    Category::ALL
        .iter()
        .filter_map(|bucket| products.iter().find(|p| p.category == *bucket))
        .collect()
}

/// All products in one category, in fetch order.
#[must_use]
pub fn in_category(products: &[Product], category: Category) -> Vec<&Product> {
    products.iter().filter(|p| p.category == category).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use waste2worth_core::ProductId;

    fn product(id: &str, category: Category, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Decimal::from(100),
            image_url: None,
            stock,
            category,
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_featured_takes_first_per_bucket() {
        let products = vec![
            product("perfume-1", Category::Perfume, 5),
            product("perfume-2", Category::Perfume, 5),
            product("peat-1", Category::CocoPeat, 5),
            product("peat-2", Category::CocoPeat, 5),
        ];

        let featured = featured(&products);
        let ids: Vec<&str> = featured.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["perfume-1", "peat-1"]);
    }

    #[test]
    fn test_featured_at_most_one_per_bucket() {
        let products = vec![
            product("a", Category::Perfume, 5),
            product("b", Category::Cocoplate, 5),
            product("c", Category::CocoPeat, 5),
            product("d", Category::Bricket, 5),
            product("e", Category::Other, 5),
            product("f", Category::Other, 5),
        ];

        let featured = featured(&products);
        assert_eq!(featured.len(), Category::ALL.len());
    }

    #[test]
    fn test_featured_skips_empty_buckets() {
        let products = vec![product("a", Category::Bricket, 5)];
        assert_eq!(featured(&products).len(), 1);
        assert!(featured(&[]).is_empty());
    }

    #[test]
    fn test_perfume_and_cocoplate_link_to_collections() {
        let perfume = product("p", Category::Perfume, 0);
        assert_eq!(
            card_action(&perfume),
            CardAction::Collection {
                href: "/collections/perfume"
            }
        );

        let plate = product("c", Category::Cocoplate, 0);
        assert_eq!(
            card_action(&plate),
            CardAction::Collection {
                href: "/collections/cocoplate"
            }
        );
    }

    #[test]
    fn test_direct_purchase_disabled_when_sold_out() {
        let in_stock = product("a", Category::Bricket, 3);
        assert_eq!(card_action(&in_stock), CardAction::AddToCart);

        let sold_out = product("b", Category::Bricket, 0);
        assert_eq!(card_action(&sold_out), CardAction::OutOfStock);
    }

    #[test]
    fn test_stock_notice_rules() {
        assert_eq!(stock_notice(0).unwrap(), "Out of Stock");
        assert_eq!(stock_notice(9).unwrap(), "Only 9 left!");
        assert_eq!(stock_notice(10), None);
        assert_eq!(stock_notice(100), None);
    }

    #[test]
    fn test_in_category_filters_in_fetch_order() {
        let products = vec![
            product("a", Category::Perfume, 5),
            product("b", Category::Bricket, 5),
            product("c", Category::Perfume, 5),
        ];

        let perfumes = in_category(&products, Category::Perfume);
        let ids: Vec<&str> = perfumes.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
