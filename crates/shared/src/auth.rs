//! Authentication types for JWT and auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role: "staff" or "customer".
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the claims carry the staff role.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.role == "staff"
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Unique username.
    pub username: String,
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
    /// User full name.
    pub full_name: String,
    /// Requested role; defaults to customer, only "staff" or "customer"
    /// are accepted.
    pub role: Option<String>,
}

/// Login request payload. `username` also matches the user's email.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    /// User password.
    pub password: String,
}

/// Auth response payload returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token.
    pub token: String,
    /// Authenticated user info.
    pub user: UserInfo,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
    /// Role: "staff" or "customer".
    pub role: String,
}

/// Profile update request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// New full name (optional).
    pub full_name: Option<String>,
    /// New email (optional).
    pub email: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password, verified before the change.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_role_helpers() {
        let staff = Claims::new(Uuid::new_v4(), "staff", Utc::now());
        let customer = Claims::new(Uuid::new_v4(), "customer", Utc::now());
        assert!(staff.is_staff());
        assert!(!customer.is_staff());
    }

    #[test]
    fn test_claims_user_id() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "customer", Utc::now());
        assert_eq!(claims.user_id(), id);
    }
}
