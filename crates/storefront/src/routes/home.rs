//! Home page route handler.
//!
//! The home page is gated and shows the featured set: at most one card per
//! category bucket, picked from the available catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, wishlist};
use crate::services::catalog::{self, CardAction};
use crate::state::AppState;
use crate::supabase::types::Product;

/// Description shown when a product has none.
const DEFAULT_DESCRIPTION: &str = "Premium quality product";

/// Product card display data for templates. All presentation decisions
/// (action, stock notice, price string) are made here, not in the template.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    /// Collection page link; `None` means the card adds to cart.
    pub collection_href: Option<&'static str>,
    /// Whether the add-to-cart button is disabled.
    pub sold_out: bool,
    pub stock_notice: Option<String>,
    pub in_wishlist: bool,
}

impl ProductCardView {
    /// Build the card view from a product and the device wishlist state.
    #[must_use]
    pub fn build(product: &Product, in_wishlist: bool) -> Self {
        let (collection_href, sold_out) = match catalog::card_action(product) {
            CardAction::Collection { href } => (Some(href), false),
            CardAction::AddToCart => (None, false),
            CardAction::OutOfStock => (None, true),
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            price: filters::format_inr(product.price),
            image_url: product.image_url.clone(),
            collection_href,
            sold_out,
            stock_notice: catalog::stock_notice(product.stock),
            in_wishlist,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: CurrentUser,
    pub cards: Vec<ProductCardView>,
}

/// Display the home page with the featured cards.
#[instrument(skip(state, session, auth))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> impl IntoResponse {
    // A catalog failure renders an empty grid, not an error page
    let products = match state.supabase().available_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!("Failed to fetch catalog: {e}");
            std::sync::Arc::new(Vec::new())
        }
    };

    let device_wishlist = wishlist::load(&session).await;
    let cards = catalog::featured(&products)
        .into_iter()
        .map(|p| ProductCardView::build(p, device_wishlist.contains(&p.id)))
        .collect();

    HomeTemplate {
        user: auth.user,
        cards,
    }
}
