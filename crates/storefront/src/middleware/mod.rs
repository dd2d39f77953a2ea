//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, trace transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store)

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_auth_session, set_auth_session};
pub use session::create_session_layer;
