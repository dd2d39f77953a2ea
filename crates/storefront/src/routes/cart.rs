//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The remote `cart_items` table is authoritative; each mutation re-renders
//! the whole cart panel from a fresh fetch.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use waste2worth_core::{CartLineId, LineAmount, ProductId};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::middleware::auth::AuthSession;
use crate::models::backup;
use crate::services::cart::CartStore;
use crate::state::AppState;
use crate::supabase::types::CartLine;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub line_id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub image_url: Option<String>,
    /// The quantity input's upper bound.
    pub max_quantity: u32,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
    /// Distinct lines; zero disables checkout.
    pub item_count: usize,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_lines(&[])
    }

    /// Build the view from a line snapshot, recomputing totals.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let totals = crate::services::cart::totals(lines);
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            subtotal: filters::format_inr(totals.subtotal),
            shipping: filters::format_inr(totals.shipping),
            tax: filters::format_inr(totals.tax),
            total: filters::format_inr(totals.total),
            item_count: totals.item_count,
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let line_total = LineAmount::new(line.product.price, line.quantity).extended();
        Self {
            line_id: line.id.to_string(),
            name: line.product.name.clone(),
            price: filters::format_inr(line.product.price),
            quantity: line.quantity,
            line_total: filters::format_inr(line_total),
            image_url: line.product.image_url.clone(),
            max_quantity: line.product.stock.max(line.quantity),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
}

fn store<'a>(state: &'a AppState, auth: &'a AuthSession) -> CartStore<'a> {
    CartStore::new(state.supabase(), &auth.token, &auth.user.id)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, auth))]
pub async fn show(State(state): State<AppState>, RequireAuth(auth): RequireAuth) -> impl IntoResponse {
    let lines = store(&state, &auth).lines().await;
    CartShowTemplate {
        cart: CartView::from_lines(&lines),
    }
}

/// Add a product to the cart (HTMX).
///
/// Upserts the line remotely, mirrors the add into the device session, and
/// returns the count badge with a trigger so other panels refresh.
#[instrument(skip(state, session, auth))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let cart = store(&state, &auth);

    match cart.add_item(&product_id).await {
        Ok(()) => {
            // Best-effort device mirror; needs the product snapshot
            if let Ok(products) = state.supabase().available_products().await
                && let Some(product) = products.iter().find(|p| p.id == product_id)
            {
                let mut mirror = backup::load(&session).await;
                mirror.record_add(product.id.clone(), product.name.clone(), product.price);
                backup::save(&session, &mirror).await;
            }

            let count = cart.count().await;
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"notice notice-error\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Update a line's quantity (HTMX). Zero removes the line.
#[instrument(skip(state, auth))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let cart = store(&state, &auth);
    let line_id = CartLineId::new(form.line_id);

    if let Err(e) = cart.set_quantity(&line_id, form.quantity).await {
        tracing::error!("Failed to update cart: {e}");
    }

    let lines = cart.lines().await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_lines(&lines),
        },
    )
        .into_response()
}

/// Remove a line (HTMX).
#[instrument(skip(state, auth))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let cart = store(&state, &auth);
    let line_id = CartLineId::new(form.line_id);

    if let Err(e) = cart.remove_line(&line_id).await {
        tracing::error!("Failed to remove from cart: {e}");
    }

    let lines = cart.lines().await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_lines(&lines),
        },
    )
        .into_response()
}

/// Clear the cart (HTMX). Also drops the device mirror.
#[instrument(skip(state, session, auth))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> Response {
    let cart = store(&state, &auth);

    if let Err(e) = cart.clear().await {
        tracing::error!("Failed to clear cart: {e}");
    }
    backup::clear(&session).await;

    let lines = cart.lines().await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_lines(&lines),
        },
    )
        .into_response()
}

/// Cart count badge (HTMX): the sum of quantities.
#[instrument(skip(state, auth))]
pub async fn count(State(state): State<AppState>, RequireAuth(auth): RequireAuth) -> impl IntoResponse {
    let count = store(&state, &auth).count().await;
    CartCountTemplate { count }
}

/// Checkout summary. An empty cart (no distinct lines) bounces back to the
/// cart page instead of rendering.
#[instrument(skip(state, auth))]
pub async fn checkout(State(state): State<AppState>, RequireAuth(auth): RequireAuth) -> Response {
    let lines = store(&state, &auth).lines().await;
    let cart = CartView::from_lines(&lines);

    if cart.item_count == 0 {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate { cart }.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use waste2worth_core::{Category, UserId};

    use crate::supabase::types::Product;

    fn line(id: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            id: CartLineId::new(id),
            user_id: UserId::new("u1"),
            product_id: ProductId::new(format!("p-{id}")),
            quantity,
            created_at: Utc::now(),
            product: Product {
                id: ProductId::new(format!("p-{id}")),
                name: format!("Product {id}"),
                description: None,
                price: Decimal::from(price),
                image_url: None,
                stock: 20,
                category: Category::Bricket,
                is_available: true,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let view = CartView::from_lines(&[line("a", 100, 2), line("b", 50, 1)]);
        assert_eq!(view.subtotal, "₹250.00");
        assert_eq!(view.shipping, "₹50.00");
        assert_eq!(view.tax, "₹45.00");
        assert_eq!(view.total, "₹345.00");
        assert_eq!(view.item_count, 2);
    }

    #[test]
    fn test_empty_cart_view_disables_checkout() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.total, "₹0.00");
        assert!(view.items.is_empty());
    }

    #[test]
    fn test_item_view_line_total() {
        let view = CartItemView::from(&line("a", 100, 3));
        assert_eq!(view.line_total, "₹300.00");
        assert_eq!(view.max_quantity, 20);
    }
}
