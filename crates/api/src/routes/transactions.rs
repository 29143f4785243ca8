//! Global transaction listing for staff.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::auth::{AuthUser, require_staff};
use bankd_db::{TransactionRepository, entities::transactions};

/// Creates the transactions router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

/// Transaction joined with its account's display fields.
#[derive(Debug, Serialize)]
struct TransactionWithAccount {
    #[serde(flatten)]
    transaction: transactions::Model,
    account_number: Option<String>,
    account_holder_name: Option<String>,
}

/// GET /transactions - Staff-only listing of all movements.
async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    let repo = TransactionRepository::new(state.db.clone());
    let rows = repo.list_all().await?;

    let response: Vec<TransactionWithAccount> = rows
        .into_iter()
        .map(|(transaction, account)| TransactionWithAccount {
            transaction,
            account_number: account.as_ref().map(|a| a.account_number.clone()),
            account_holder_name: account.map(|a| a.account_holder_name),
        })
        .collect();

    Ok(Json(response))
}
