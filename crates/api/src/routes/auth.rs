//! Authentication routes for register, login, and profile management.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use bankd_core::auth::{hash_password, verify_password};
use bankd_db::{UserRepository, entities::sea_orm_active_enums::UserRole, entities::users};
use bankd_shared::AppError;
use bankd_shared::auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UserInfo,
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the auth routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(profile).put(update_profile))
        .route("/auth/password", put(change_password))
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: user.role.as_str().to_string(),
    }
}

fn non_blank<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError(AppError::Validation(format!(
            "{field} is required"
        ))));
    }
    Ok(trimmed)
}

fn check_password_length(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ))));
    }
    Ok(())
}

/// POST /auth/register - Register a new user and return a token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = non_blank(&payload.username, "username")?;
    let email = non_blank(&payload.email, "email")?;
    let full_name = non_blank(&payload.full_name, "full_name")?;
    check_password_length(&payload.password)?;

    let role_str = payload.role.as_deref().unwrap_or("customer");
    let role = UserRole::parse(role_str).ok_or_else(|| {
        ApiError(AppError::Validation(
            "role must be staff or customer".to_string(),
        ))
    })?;

    let user_repo = UserRepository::new(state.db.clone());

    if user_repo.username_or_email_exists(username, email).await? {
        return Err(ApiError(AppError::Conflict(
            "username or email already registered".to_string(),
        )));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo
        .create(username, email, &password_hash, full_name, role)
        .await?;

    let token = state
        .jwt_service
        .generate_token(user.id, user.role.as_str())?;

    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user_info(&user),
        }),
    ))
}

/// POST /auth/login - Authenticate by username or email.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let invalid =
        || ApiError(AppError::Unauthorized("Invalid username or password".to_string()));

    let user_repo = UserRepository::new(state.db.clone());
    let user = user_repo
        .find_by_username_or_email(payload.username.trim())
        .await?
        .ok_or_else(|| {
            info!(username = %payload.username, "Login attempt for unknown user");
            invalid()
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    let token = state
        .jwt_service
        .generate_token(user.id, user.role.as_str())?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user_info(&user),
    }))
}

/// GET /auth/profile - Return the authenticated user's record.
async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new(state.db.clone());
    let record = user_repo
        .find_by_id(user.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("user not found".to_string())))?;

    Ok(Json(user_info(&record)))
}

/// PUT /auth/profile - Update full name and/or email.
async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new(state.db.clone());
    let record = user_repo
        .find_by_id(user.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("user not found".to_string())))?;

    let email = match payload.email {
        Some(email) => {
            let email = non_blank(&email, "email")?.to_string();
            if user_repo.email_taken_by_other(&email, record.id).await? {
                return Err(ApiError(AppError::Conflict(
                    "email already registered".to_string(),
                )));
            }
            Some(email)
        }
        None => None,
    };

    let full_name = match payload.full_name {
        Some(full_name) => Some(non_blank(&full_name, "full_name")?.to_string()),
        None => None,
    };

    let updated = user_repo.update_profile(record, full_name, email).await?;
    Ok(Json(user_info(&updated)))
}

/// PUT /auth/password - Change the password after verifying the current one.
async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    check_password_length(&payload.new_password)?;

    let user_repo = UserRepository::new(state.db.clone());
    let record = user_repo
        .find_by_id(user.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("user not found".to_string())))?;

    if !verify_password(&payload.current_password, &record.password_hash)? {
        return Err(ApiError(AppError::Unauthorized(
            "current password is incorrect".to_string(),
        )));
    }

    let password_hash = hash_password(&payload.new_password)?;
    user_repo.update_password(record, &password_hash).await?;

    info!(user_id = %user.user_id(), "Password changed");

    Ok(Json(json!({ "message": "Password updated" })))
}
