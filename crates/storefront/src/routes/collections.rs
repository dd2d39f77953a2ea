//! Category page route handler.
//!
//! One page per category bucket; the perfume and cocoplate cards on the home
//! page link here. Unknown slugs are a 404, not an `other` fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use waste2worth_core::Category;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::wishlist;
use crate::routes::home::ProductCardView;
use crate::services::catalog;
use crate::state::AppState;

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionTemplate {
    pub title: &'static str,
    pub cards: Vec<ProductCardView>,
}

/// Display a category page.
#[instrument(skip(state, session, _auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_auth): RequireAuth,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = Category::ALL
        .into_iter()
        .find(|c| c.slug() == slug)
        .ok_or_else(|| AppError::NotFound(format!("collection: {slug}")))?;

    let products = match state.supabase().available_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!("Failed to fetch catalog: {e}");
            std::sync::Arc::new(Vec::new())
        }
    };

    let device_wishlist = wishlist::load(&session).await;
    let cards = catalog::in_category(&products, category)
        .into_iter()
        .map(|p| ProductCardView::build(p, device_wishlist.contains(&p.id)))
        .collect();

    Ok(CollectionTemplate {
        title: category.display_name(),
        cards,
    })
}
