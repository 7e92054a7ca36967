//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use beyond_flavours_core::UserId;

use crate::backend::types::User;

/// Session-stored user identity.
///
/// Mirrors the backend user record; lives in the session from OTP verify
/// until logout, so a page reload keeps the user signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name, when the user has set one.
    pub name: Option<String>,
    /// Optional contact email.
    pub email: Option<String>,
    /// Ten-digit phone number the account is keyed on.
    pub phone_number: String,
}

impl CurrentUser {
    /// First name for the nav greeting.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or("Guest")
    }

    /// Merge a freshly returned backend record into this session record.
    ///
    /// Fields present on `update` win; fields the backend left blank keep
    /// their session value. Used after profile updates so the stored user
    /// never loses data the response omitted.
    #[must_use]
    pub fn merged_with(self, update: User) -> Self {
        Self {
            id: update.id,
            name: update.name.filter(|name| !name.is_empty()).or(self.name),
            email: update.email.filter(|email| !email.is_empty()).or(self.email),
            phone_number: if update.phone_number.is_empty() {
                self.phone_number
            } else {
                update.phone_number
            },
        }
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

/// Session keys for storefront state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart.
    pub const CART: &str = "cart";

    /// Key for queued toast notices.
    pub const TOASTS: &str = "toasts";

    /// Key for the order-submit re-entrancy guard.
    pub const CHECKOUT_IN_FLIGHT: &str = "checkout_in_flight";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session_user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            name: Some("Asha Rao".to_string()),
            email: Some("asha@example.com".to_string()),
            phone_number: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_first_name() {
        assert_eq!(session_user().first_name(), "Asha");

        let anonymous = CurrentUser {
            name: None,
            ..session_user()
        };
        assert_eq!(anonymous.first_name(), "Guest");
    }

    #[test]
    fn test_merged_with_overwrites_fresh_fields() {
        let update = User {
            id: UserId::new(7),
            name: Some("Asha R".to_string()),
            email: None,
            phone_number: "9876543210".to_string(),
        };

        let merged = session_user().merged_with(update);
        assert_eq!(merged.name.as_deref(), Some("Asha R"));
        // Email missing from the response keeps the session value
        assert_eq!(merged.email.as_deref(), Some("asha@example.com"));
    }

    #[test]
    fn test_merged_with_ignores_blank_strings() {
        let update = User {
            id: UserId::new(7),
            name: Some(String::new()),
            email: Some(String::new()),
            phone_number: String::new(),
        };

        let merged = session_user().merged_with(update);
        assert_eq!(merged.name.as_deref(), Some("Asha Rao"));
        assert_eq!(merged.phone_number, "9876543210");
    }
}
