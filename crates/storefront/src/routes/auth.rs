//! Authentication route handlers.
//!
//! Login is a password grant against the hosted auth service; the returned
//! token and identity are cached in the device session. Logout revokes the
//! token best-effort and flushes the whole session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use waste2worth_core::Email;

use crate::filters;
use crate::middleware::{OptionalAuth, clear_auth_session, set_auth_session};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;
use crate::supabase::SupabaseError;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page. An already signed-in user goes straight home.
pub async fn login_page(
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate { error: query.error }.into_response()
}

/// Handle login form submission (password grant).
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    // Reject inputs that can never be an address before the round trip
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(e) => {
            tracing::debug!("Login rejected before the password grant: {e}");
            return Redirect::to("/auth/login?error=Enter%20a%20valid%20email%20address")
                .into_response();
        }
    };

    match state.supabase().sign_in(email.as_str(), &form.password).await {
        Ok(signed_in) => {
            let user = CurrentUser {
                id: signed_in.user.id,
                email: signed_in.user.email,
                full_name: signed_in.user.user_metadata.full_name,
            };

            if let Err(e) = set_auth_session(&session, &signed_in.access_token, &user).await {
                tracing::error!("Failed to store login in session: {e}");
                return Redirect::to("/auth/login?error=Session%20error%2C%20please%20try%20again")
                    .into_response();
            }

            crate::error::set_sentry_user(&user.id, Some(&user.email));
            Redirect::to("/").into_response()
        }
        Err(SupabaseError::InvalidCredentials) => {
            Redirect::to("/auth/login?error=Invalid%20email%20or%20password").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed against auth service: {e}");
            Redirect::to("/auth/login?error=Login%20is%20unavailable%20right%20now")
                .into_response()
        }
    }
}

/// Handle logout: revoke the token (best effort), flush the device session
/// (identity, wishlist, cart mirror, chat transcript), redirect to login.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let token: Option<String> = session
        .get(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten();

    if let Some(token) = token
        && let Err(e) = state.supabase().sign_out(&token).await
    {
        tracing::warn!("Token revocation failed, clearing session anyway: {e}");
    }

    if let Err(e) = clear_auth_session(&session).await {
        tracing::error!("Failed to clear session on logout: {e}");
    }

    Redirect::to("/auth/login").into_response()
}
