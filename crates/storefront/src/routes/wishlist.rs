//! Wishlist route handlers.
//!
//! The wishlist is device-local: every operation reads and writes the
//! session value, nothing touches the hosted backend. Toggles re-render the
//! card's toggle fragment; removals re-render the whole list panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use waste2worth_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::wishlist::{self, WishlistEntry};
use crate::state::AppState;

/// Fallback icon for entries without an image.
const DEFAULT_ICON: &str = "🌱";

/// Wishlist entry display data for templates.
#[derive(Clone)]
pub struct WishlistItemView {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub icon: String,
}

impl From<&WishlistEntry> for WishlistItemView {
    fn from(entry: &WishlistEntry) -> Self {
        Self {
            product_id: entry.product_id.to_string(),
            name: entry.name.clone(),
            description: entry.description.clone().unwrap_or_default(),
            price: filters::format_inr(entry.price),
            image_url: entry.image_url.clone(),
            icon: entry.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
        }
    }
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub product_id: String,
}

/// Remove form data.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub product_id: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub items: Vec<WishlistItemView>,
}

/// Wishlist items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishlistItemsTemplate {
    pub items: Vec<WishlistItemView>,
}

/// Wishlist toggle button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_toggle.html")]
pub struct WishlistToggleTemplate {
    pub product_id: String,
    pub in_wishlist: bool,
}

fn item_views(entries: &[WishlistEntry]) -> Vec<WishlistItemView> {
    entries.iter().map(WishlistItemView::from).collect()
}

/// Display the wishlist page.
#[instrument(skip(session, _auth))]
pub async fn show(session: Session, RequireAuth(_auth): RequireAuth) -> impl IntoResponse {
    let device_wishlist = wishlist::load(&session).await;
    WishlistShowTemplate {
        items: item_views(device_wishlist.entries()),
    }
}

/// Toggle a product on the wishlist (HTMX).
///
/// Adding snapshots the product from the catalog so the entry keeps
/// rendering even if the product later disappears.
#[instrument(skip(state, session, _auth))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_auth): RequireAuth,
    Form(form): Form<ToggleForm>,
) -> Result<Response, AppError> {
    let product_id = ProductId::new(form.product_id);
    let mut device_wishlist = wishlist::load(&session).await;

    if device_wishlist.contains(&product_id) {
        device_wishlist.remove(&product_id);
    } else {
        let products = state.supabase().available_products().await?;
        let product = products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("product: {product_id}")))?;

        device_wishlist.add(WishlistEntry {
            product_id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            icon: Some(DEFAULT_ICON.to_string()),
            added_at: Utc::now(),
        });
    }

    wishlist::save(&session, &device_wishlist).await?;

    Ok(WishlistToggleTemplate {
        in_wishlist: device_wishlist.contains(&product_id),
        product_id: product_id.into_inner(),
    }
    .into_response())
}

/// Remove an entry from the wishlist page (HTMX).
#[instrument(skip(session, _auth))]
pub async fn remove(
    session: Session,
    RequireAuth(_auth): RequireAuth,
    Form(form): Form<RemoveForm>,
) -> Result<Response, AppError> {
    let product_id = ProductId::new(form.product_id);
    let mut device_wishlist = wishlist::load(&session).await;

    device_wishlist.remove(&product_id);
    wishlist::save(&session, &device_wishlist).await?;

    Ok(WishlistItemsTemplate {
        items: item_views(device_wishlist.entries()),
    }
    .into_response())
}
