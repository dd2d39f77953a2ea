//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use waste2worth_core::UserId;

/// Session-cached user identity.
///
/// Populated on login and refreshed whenever the session gate revalidates
/// the token. The remote auth service owns the canonical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Remote auth user id.
    pub id: UserId,
    /// User's email address.
    pub email: String,
    /// Display name from the user metadata, if set.
    pub full_name: Option<String>,
}

impl CurrentUser {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("User")
    }
}

/// Session keys for device-local state.
pub mod session_keys {
    /// Key for the backend access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the cached user identity.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the device-local wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the best-effort cart mirror.
    pub const CART_BACKUP: &str = "cart_backup";

    /// Key for the chat transcript.
    pub const CHAT_LOG: &str = "chat_log";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back() {
        let user = CurrentUser {
            id: UserId::new("u1"),
            email: "eco@example.com".to_string(),
            full_name: None,
        };
        assert_eq!(user.display_name(), "User");

        let named = CurrentUser {
            full_name: Some("Asha".to_string()),
            ..user
        };
        assert_eq!(named.display_name(), "Asha");
    }
}
