//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (gated, featured cards)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /collections/{slug}     - Category page (gated)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page (gated)
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/clear             - Clear cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Order summary (gated; empty cart bounces to /cart)
//!
//! # Wishlist (device-local)
//! GET  /wishlist               - Wishlist page (gated)
//! POST /wishlist/toggle        - Toggle a product (returns toggle fragment)
//! POST /wishlist/remove        - Remove an entry (returns wishlist_items fragment)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (password grant)
//! POST /auth/logout            - Logout action
//!
//! # Chat widget (HTMX fragments)
//! GET  /chat/button            - Collapsed widget button
//! GET  /chat/panel             - Open panel with the transcript
//! POST /chat/send              - Send a message (returns chat_messages fragment)
//! ```

pub mod auth;
pub mod cart;
pub mod chat;
pub mod collections;
pub mod home;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
}

/// Create the chat widget routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/button", get(chat::button))
        .route("/panel", get(chat::panel))
        .route("/send", post(chat::send))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/collections/{slug}", get(collections::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/wishlist", wishlist_routes())
        .nest("/auth", auth_routes())
        .nest("/chat", chat_routes())
}
