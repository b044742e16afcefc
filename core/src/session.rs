//! Session roles and the token role-marker convention.
//!
//! Tokens are opaque strings. The only structure the client relies on is the
//! literal `admin-` prefix, which marks a token as belonging to the admin role.
//! Nothing is verified client-side; the server remains the authority.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix that marks a token as an admin token.
pub const ADMIN_TOKEN_PREFIX: &str = "admin-";

/// Role a session token is stored under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator: may create and delete events and read stats
    Admin,
    /// Regular user: may register tickets
    User,
}

impl Role {
    /// Every role, in storage order
    pub const ALL: [Self; 2] = [Self::Admin, Self::User];

    /// Key under which the role's token is persisted
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Admin => "adminToken",
            Self::User => "userToken",
        }
    }

    /// Lowercase role name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque session token.
///
/// `Debug` never prints the token body.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Role implied by the token's role marker
    #[must_use]
    pub fn role(&self) -> Role {
        if self.is_admin() {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Whether the token carries the admin role marker
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.starts_with(ADMIN_TOKEN_PREFIX)
    }

    /// Borrow the raw token, e.g. for an `Authorization` header
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({}, <redacted>)", self.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_prefix_marks_admin_role() {
        let token = SessionToken::new("admin-token-1234");
        assert!(token.is_admin());
        assert_eq!(token.role(), Role::Admin);
    }

    #[test]
    fn anything_else_is_a_user_token() {
        for raw in ["user-token-1", "", "Admin-1", "xadmin-1"] {
            let token = SessionToken::new(raw);
            assert_eq!(token.role(), Role::User, "{raw:?}");
        }
    }

    #[test]
    fn storage_keys_match_browser_storage_names() {
        assert_eq!(Role::Admin.storage_key(), "adminToken");
        assert_eq!(Role::User.storage_key(), "userToken");
    }

    #[test]
    fn debug_hides_token_body() {
        let token = SessionToken::new("admin-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("admin"));
    }
}
