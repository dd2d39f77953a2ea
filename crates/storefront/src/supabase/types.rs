//! Wire types for the hosted backend (Supabase auth + PostgREST).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use waste2worth_core::{CartLineId, Category, ProductId, UserId};

/// A row from the remote `products` table.
///
/// Prices arrive as JSON numbers (PostgREST numeric); they are parsed into
/// `Decimal` per field so money never touches binary floats downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    /// The live table spells this column `stock_quantity`.
    #[serde(default, alias = "stock_quantity")]
    pub stock: u32,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
    #[serde(default)]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Unknown category strings fall back to the `other` bucket rather than
/// failing the whole catalog fetch.
fn lenient_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(Category::parse(&raw))
}

/// A row from the remote `cart_items` table with its product embedded
/// (`select=*,products(*)`).
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "products")]
    pub product: Product,
}

/// The subset of a cart line fetched when checking for an existing
/// (user, product) line before an add.
#[derive(Debug, Clone, Deserialize)]
pub struct SparseCartLine {
    pub id: CartLineId,
    pub quantity: u32,
}

/// Body for inserting a new cart line.
#[derive(Debug, Serialize)]
pub struct NewCartLine<'a> {
    pub user_id: &'a UserId,
    pub product_id: &'a ProductId,
    pub quantity: u32,
}

/// Body for updating a cart line's quantity.
#[derive(Debug, Serialize)]
pub struct QuantityPatch {
    pub quantity: u32,
}

/// The authenticated user as returned by `GET /auth/v1/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Free-form metadata attached to the auth user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Response to the password grant (`POST /auth/v1/token?grant_type=password`).
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub access_token: String,
    pub user: AuthUser,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_numeric_price() {
        let json = r#"{
            "id": "p1",
            "name": "Coco-Peat Block",
            "description": "5kg block",
            "price": 199.5,
            "image_url": null,
            "stock": 12,
            "category": "coco-peat",
            "is_available": true,
            "created_at": "2025-01-15T10:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(1995, 1));
        assert_eq!(product.category, Category::CocoPeat);
        assert_eq!(product.stock, 12);
    }

    #[test]
    fn test_stock_quantity_column_spelling() {
        let json = r#"{
            "id": "p3",
            "name": "Bricket Pack",
            "price": 80,
            "stock_quantity": 12,
            "category": "bricket",
            "is_available": true,
            "created_at": "2025-01-15T10:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock, 12);
    }

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        let json = r#"{
            "id": "p2",
            "name": "Steel Scrap Art",
            "price": 500,
            "category": "steel-scrap",
            "created_at": "2025-01-15T10:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, Category::Other);
        assert!(!product.is_available);
    }

    #[test]
    fn test_cart_line_with_embedded_product() {
        let json = r#"{
            "id": "line-1",
            "user_id": "u1",
            "product_id": "p1",
            "quantity": 2,
            "created_at": "2025-01-15T10:00:00Z",
            "products": {
                "id": "p1",
                "name": "Vrindavan Prem",
                "price": 599,
                "category": "perfume",
                "created_at": "2025-01-10T10:00:00Z"
            }
        }"#;

        let line: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.name, "Vrindavan Prem");
        assert_eq!(line.product.category, Category::Perfume);
    }

    #[test]
    fn test_auth_user_without_metadata() {
        let json = r#"{"id": "u1", "email": "eco@example.com"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.email, "eco@example.com");
        assert!(user.user_metadata.full_name.is_none());
    }
}
