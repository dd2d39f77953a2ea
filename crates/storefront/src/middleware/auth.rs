//! Authentication middleware and extractors.
//!
//! Provides extractors that gate pages on a live backend session. The gate
//! fails closed: an absent token, a transport error, and a rejected token
//! all redirect to the login page before any page data is fetched.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Where rejected requests are sent.
const LOGIN_PATH: &str = "/auth/login";

/// The validated session: cached identity plus the bearer token used for
/// backend calls on the user's behalf.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: CurrentUser,
    pub token: String,
}

/// Extractor that requires a live backend session.
///
/// Revalidates the session token against the auth service on every gated
/// request and refreshes the cached identity. If anything fails, redirects
/// to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(auth): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthSession);

/// Error returned when authentication is required but there is no live session.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page (full page navigation).
    RedirectToLogin,
    /// Tell HTMX to navigate the whole window to the login page. A plain
    /// redirect would be followed by HTMX and swap the login page into the
    /// requesting fragment's target.
    HtmxRedirectToLogin,
    /// Unauthorized response (when the session machinery itself is absent).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::HtmxRedirectToLogin => {
                (StatusCode::UNAUTHORIZED, [("HX-Redirect", LOGIN_PATH)]).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?
            .clone();

        let is_htmx = parts.headers.contains_key("HX-Request");

        let auth = validate_session(&session, state).await.ok_or(if is_htmx {
            AuthRejection::HtmxRedirectToLogin
        } else {
            AuthRejection::RedirectToLogin
        })?;

        Ok(Self(auth))
    }
}

/// Extractor that optionally gets the current session.
///
/// Unlike `RequireAuth`, this never rejects the request.
pub struct OptionalAuth(pub Option<AuthSession>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>().cloned() {
            Some(session) => validate_session(&session, state).await,
            None => None,
        };

        Ok(Self(auth))
    }
}

/// Validate the stored token against the auth service and refresh the
/// cached identity. Any failure reads as "no session".
async fn validate_session(session: &Session, state: &AppState) -> Option<AuthSession> {
    let token: String = session
        .get(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten()?;

    let auth_user = match state.supabase().get_user(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!("Session token rejected by auth service: {e}");
            return None;
        }
    };

    let user = CurrentUser {
        id: auth_user.id,
        email: auth_user.email,
        full_name: auth_user.user_metadata.full_name,
    };

    // Refresh the cached identity; a write failure does not invalidate the gate
    if let Err(e) = session.insert(session_keys::CURRENT_USER, &user).await {
        tracing::warn!("Failed to refresh cached identity: {e}");
    }

    crate::error::set_sentry_user(&user.id, Some(&user.email));

    Some(AuthSession { user, token })
}

/// Store the token and identity after a successful login.
///
/// # Errors
///
/// Returns an error if the session store rejects the writes.
pub async fn set_auth_session(
    session: &Session,
    token: &str,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ACCESS_TOKEN, token).await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    Ok(())
}

/// Clear the whole device session on logout: identity, token, wishlist,
/// cart mirror, and chat transcript.
///
/// # Errors
///
/// Returns an error if the session store rejects the flush.
pub async fn clear_auth_session(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.flush().await?;
    crate::error::clear_sentry_user();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_redirects_to_login() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
    }

    #[test]
    fn test_rejection_tells_htmx_to_navigate() {
        // Fragment requests get a window-level navigation header, never a
        // 3xx the client would swap into the fragment target
        let response = AuthRejection::HtmxRedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get("HX-Redirect")
                .and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
    }

    #[test]
    fn test_rejection_without_session_machinery() {
        let response = AuthRejection::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
