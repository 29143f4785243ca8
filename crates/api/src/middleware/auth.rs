//! Authentication middleware and authorization guards for protected routes.
//!
//! The guards are the single place where role and ownership rules live;
//! handlers call them instead of re-implementing the checks inline.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use bankd_shared::{AppError, Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            ApiError(AppError::Unauthorized("Token has expired".to_string())).into_response()
        }
        Err(_) => ApiError(AppError::Unauthorized(
            "Invalid or malformed token".to_string(),
        ))
        .into_response(),
    }
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the authenticated user's claims:
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let user_id = user.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns true if the user carries the staff role.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.0.is_staff()
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}

/// Requires the staff role.
///
/// # Errors
///
/// Returns `Forbidden` for non-staff users.
pub fn require_staff(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(ApiError(AppError::Forbidden(
            "staff role required".to_string(),
        )))
    }
}

/// Requires the customer role.
///
/// # Errors
///
/// Returns `Forbidden` for staff users.
pub fn require_customer(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_staff() {
        Err(ApiError(AppError::Forbidden(
            "customer role required".to_string(),
        )))
    } else {
        Ok(())
    }
}

/// Requires the user to own the resource or carry the staff role.
///
/// # Errors
///
/// Returns `Forbidden` for customers acting on resources they do not own.
pub fn ensure_owner_or_staff(user: &AuthUser, owner_id: Uuid) -> Result<(), ApiError> {
    if user.is_staff() || user.user_id() == owner_id {
        Ok(())
    } else {
        Err(ApiError(AppError::Forbidden(
            "not the owner of this resource".to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims::new(Uuid::new_v4(), role, Utc::now()))
    }

    #[rstest]
    #[case("Bearer abc123", Some("abc123"))]
    #[case("bearer abc123", Some("abc123"))]
    #[case("Basic abc123", None)]
    #[case("abc123", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }

    #[rstest]
    #[case("staff", true)]
    #[case("customer", false)]
    fn test_require_staff(#[case] role: &str, #[case] allowed: bool) {
        assert_eq!(require_staff(&auth_user(role)).is_ok(), allowed);
    }

    #[rstest]
    #[case("customer", true)]
    #[case("staff", false)]
    fn test_require_customer(#[case] role: &str, #[case] allowed: bool) {
        assert_eq!(require_customer(&auth_user(role)).is_ok(), allowed);
    }

    #[test]
    fn test_owner_or_staff_allows_owner() {
        let user = auth_user("customer");
        assert!(ensure_owner_or_staff(&user, user.user_id()).is_ok());
    }

    #[test]
    fn test_owner_or_staff_allows_staff_on_any_resource() {
        let user = auth_user("staff");
        assert!(ensure_owner_or_staff(&user, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_owner_or_staff_rejects_non_owner_customer() {
        let user = auth_user("customer");
        let err = ensure_owner_or_staff(&user, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.0.status_code(), 403);
    }
}
