//! Account routes: listing, direct CRUD, deposits, and withdrawals.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{AuthUser, ensure_owner_or_staff, require_staff};
use bankd_core::account::{AccountStatus, AccountType};
use bankd_core::movement::MovementKind;
use bankd_db::{AccountRepository, TransactionRepository, entities::accounts};
use bankd_shared::AppError;

/// Creates the accounts router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{id}/deposit", post(deposit))
        .route("/accounts/{id}/withdraw", post(withdraw))
        .route("/accounts/{id}/transactions", get(list_transactions))
}

/// Account creation payload.
#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    account_holder_name: String,
    email: String,
    phone: String,
    account_type: String,
    initial_balance: Option<Decimal>,
    /// Staff may open an account on behalf of another user.
    user_id: Option<Uuid>,
}

/// Account update payload. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
struct UpdateAccountRequest {
    account_holder_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    account_type: Option<String>,
    status: Option<String>,
}

/// Deposit/withdraw payload.
#[derive(Debug, Deserialize)]
struct AmountRequest {
    amount: Decimal,
}

fn validation(message: impl Into<String>) -> ApiError {
    ApiError(AppError::Validation(message.into()))
}

async fn find_account(
    repo: &AccountRepository,
    id: Uuid,
) -> Result<accounts::Model, ApiError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("account not found: {id}"))))
}

/// GET /accounts - Staff see every account, customers only their own.
async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new(state.db.clone());
    let accounts = if user.is_staff() {
        repo.list_all().await?
    } else {
        repo.list_for_user(user.user_id()).await?
    };
    Ok(Json(accounts))
}

/// GET /accounts/{id} - Owner or staff.
async fn get_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new(state.db.clone());
    let account = find_account(&repo, id).await?;
    ensure_owner_or_staff(&user, account.user_id)?;
    Ok(Json(account))
}

/// POST /accounts - Open an account, optionally seeded with a deposit.
async fn create_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let holder = payload.account_holder_name.trim();
    let email = payload.email.trim();
    let phone = payload.phone.trim();
    if holder.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(validation(
            "account_holder_name, email, and phone are required",
        ));
    }

    let account_type = AccountType::parse(&payload.account_type)
        .ok_or_else(|| validation(format!("unknown account type: {}", payload.account_type)))?;

    // Customers always own the accounts they create.
    let owner_id = if user.is_staff() {
        payload.user_id.unwrap_or_else(|| user.user_id())
    } else {
        user.user_id()
    };

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .create_account(
            owner_id,
            account_type,
            holder,
            email,
            phone,
            payload.initial_balance.unwrap_or(Decimal::ZERO),
        )
        .await?;

    info!(account_id = %account.id, user_id = %owner_id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "account_id": account.id,
            "account_number": account.account_number,
        })),
    ))
}

/// PUT /accounts/{id} - Staff-only account update.
async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    let account_type = match payload.account_type {
        Some(s) => Some(
            AccountType::parse(&s)
                .ok_or_else(|| validation(format!("unknown account type: {s}")))?,
        ),
        None => None,
    };
    let status = match payload.status {
        Some(s) => Some(
            AccountStatus::parse(&s)
                .ok_or_else(|| validation(format!("unknown account status: {s}")))?,
        ),
        None => None,
    };

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .update(
            id,
            payload.account_holder_name,
            payload.email,
            payload.phone,
            account_type,
            status,
        )
        .await?;

    Ok(Json(account))
}

/// DELETE /accounts/{id} - Staff-only hard delete.
async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    let repo = AccountRepository::new(state.db.clone());
    repo.delete(id).await?;

    info!(account_id = %id, "Account deleted");

    Ok(Json(json!({ "message": "Account deleted" })))
}

/// POST /accounts/{id}/deposit - Owner or staff.
async fn deposit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<impl IntoResponse> {
    apply_movement(&state, &user, id, MovementKind::Deposit, payload.amount).await
}

/// POST /accounts/{id}/withdraw - Owner or staff.
async fn withdraw(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<impl IntoResponse> {
    apply_movement(&state, &user, id, MovementKind::Withdrawal, payload.amount).await
}

async fn apply_movement(
    state: &AppState,
    user: &AuthUser,
    account_id: Uuid,
    kind: MovementKind,
    amount: Decimal,
) -> ApiResult<Json<serde_json::Value>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = find_account(&repo, account_id).await?;
    ensure_owner_or_staff(user, account.user_id)?;

    let outcome = repo
        .apply_movement(account_id, kind, amount, kind.as_str())
        .await?;

    info!(
        account_id = %account_id,
        kind = %kind,
        amount = %amount,
        "Movement applied"
    );

    Ok(Json(json!({
        "new_balance": outcome.account.balance,
        "transaction_id": outcome.record.id,
    })))
}

/// GET /accounts/{id}/transactions - Owner or staff.
async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let account_repo = AccountRepository::new(state.db.clone());
    let account = find_account(&account_repo, id).await?;
    ensure_owner_or_staff(&user, account.user_id)?;

    let repo = TransactionRepository::new(state.db.clone());
    let transactions = repo.list_for_account(id).await?;
    Ok(Json(transactions))
}
