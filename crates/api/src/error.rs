//! Error translation from repository and domain errors to HTTP responses.
//!
//! Handlers return `Result<_, ApiError>` and rely on the `From` impls here,
//! so every error path renders the same JSON shape with a stable code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use tracing::error;

use bankd_core::application::ApplicationError as WorkflowError;
use bankd_core::auth::PasswordError;
use bankd_core::movement::MovementError;
use bankd_db::repositories::account::AccountError;
use bankd_db::repositories::application::ApplicationError as ApplicationRepoError;
use bankd_shared::{AppError, JwtError};

/// API error wrapping the application error taxonomy.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal causes are logged and never sent to clients.
        let message = if self.0.is_internal() {
            error!(error = %self.0, "internal error");
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({ "error": self.0.error_code(), "message": message })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(classify_db_error(err.sql_err(), &err))
    }
}

/// Maps unique violations to `Conflict`. Check-then-insert races
/// (duplicate username or email, account-number candidates) surface
/// this way instead of through the pre-checks.
fn classify_db_error(sql_err: Option<SqlErr>, err: &DbErr) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("duplicate value for a unique field".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

impl From<MovementError> for ApiError {
    fn from(err: MovementError) -> Self {
        let message = err.to_string();
        Self(match err {
            MovementError::InvalidAmount => AppError::InvalidAmount(message),
            MovementError::AccountInactive => AppError::AccountInactive(message),
            MovementError::InsufficientFunds { .. } => AppError::InsufficientFunds(message),
        })
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self(AppError::NotFound(err.to_string())),
            AccountError::NumberCollision => Self(AppError::Conflict(err.to_string())),
            AccountError::Movement(e) => e.into(),
            AccountError::Database(e) => e.into(),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        Self(match err {
            WorkflowError::AlreadyReviewed { .. } => AppError::AlreadyReviewed(message),
            WorkflowError::MissingFields { .. }
            | WorkflowError::UnknownAccountType(_)
            | WorkflowError::UnknownMovementKind(_)
            | WorkflowError::UnknownKind(_) => AppError::Validation(message),
        })
    }
}

impl From<ApplicationRepoError> for ApiError {
    fn from(err: ApplicationRepoError) -> Self {
        match err {
            ApplicationRepoError::NotFound(_) | ApplicationRepoError::AccountNotFound(_) => {
                Self(AppError::NotFound(err.to_string()))
            }
            ApplicationRepoError::NotOwner => Self(AppError::Forbidden(err.to_string())),
            ApplicationRepoError::Workflow(e) => e.into(),
            ApplicationRepoError::Movement(e) => e.into(),
            ApplicationRepoError::Account(e) => e.into(),
            ApplicationRepoError::Database(e) => e.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_movement_errors_map_to_400_codes() {
        let err: ApiError = MovementError::InsufficientFunds {
            requested: dec!(50),
            available: dec!(30),
        }
        .into();
        assert_eq!(err.0.status_code(), 400);
        assert_eq!(err.0.error_code(), "INSUFFICIENT_FUNDS");

        let err: ApiError = MovementError::AccountInactive.into();
        assert_eq!(err.0.error_code(), "ACCOUNT_INACTIVE");

        let err: ApiError = MovementError::InvalidAmount.into();
        assert_eq!(err.0.error_code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_account_not_found_maps_to_404() {
        let err: ApiError = AccountError::NotFound(Uuid::new_v4()).into();
        assert_eq!(err.0.status_code(), 404);
        assert_eq!(err.0.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_nested_movement_error_unwraps() {
        let err: ApiError = AccountError::Movement(MovementError::InvalidAmount).into();
        assert_eq!(err.0.error_code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_already_reviewed_maps_to_400() {
        let err: ApiError = WorkflowError::AlreadyReviewed {
            status: bankd_core::application::ApplicationStatus::Approved,
        }
        .into();
        assert_eq!(err.0.status_code(), 400);
        assert_eq!(err.0.error_code(), "ALREADY_REVIEWED");
    }

    #[test]
    fn test_not_owner_maps_to_403() {
        let err: ApiError = ApplicationRepoError::NotOwner.into();
        assert_eq!(err.0.status_code(), 403);
        assert_eq!(err.0.error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_db_error_is_internal() {
        let err: ApiError = DbErr::Custom("boom".to_string()).into();
        assert!(err.0.is_internal());
        assert_eq!(err.0.status_code(), 500);
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = DbErr::Custom("duplicate key value".to_string());
        let app = classify_db_error(
            Some(SqlErr::UniqueConstraintViolation(
                "users_username_key".to_string(),
            )),
            &err,
        );
        assert_eq!(app.status_code(), 409);
        assert_eq!(app.error_code(), "CONFLICT");
    }
}
