//! Application routes: submission by customers, review by staff.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{AuthUser, require_customer, require_staff};
use bankd_core::application::{
    ApplicationError as WorkflowError, ApplicationKind, ApplicationStatus, ReviewDecision,
    validate_account_opening, validate_movement_request,
};
use bankd_db::repositories::application::{ApplicationPayload, ApplicationView};
use bankd_db::{ApplicationRepository, entities::applications};
use bankd_shared::AppError;

/// Creates the applications router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(list_applications).post(create_application))
        .route("/applications/my-applications", get(my_applications))
        .route("/applications/{id}/approve", put(approve))
        .route("/applications/{id}/reject", put(reject))
}

/// Application submission payload; fields are validated per kind.
#[derive(Debug, Deserialize)]
struct CreateApplicationRequest {
    application_type: String,
    // account_opening fields
    account_type: Option<String>,
    account_holder_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    // transaction fields
    account_id: Option<Uuid>,
    transaction_type: Option<String>,
    amount: Option<Decimal>,
    description: Option<String>,
}

/// Review payload for approve/reject.
#[derive(Debug, Deserialize)]
struct ReviewRequest {
    review_notes: Option<String>,
}

/// Status filter for the staff listing.
#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

/// Application joined with display names for listings.
#[derive(Debug, Serialize)]
struct ApplicationResponse {
    #[serde(flatten)]
    application: applications::Model,
    applicant_name: Option<String>,
    account_number: Option<String>,
    account_holder_name: Option<String>,
    reviewer_name: Option<String>,
}

impl From<ApplicationView> for ApplicationResponse {
    fn from(view: ApplicationView) -> Self {
        Self {
            application: view.application,
            applicant_name: view.applicant_name,
            account_number: view.account_number,
            account_holder_name: view.account_holder_name,
            reviewer_name: view.reviewer_name,
        }
    }
}

/// POST /applications - Customer submits a request for staff review.
async fn create_application(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateApplicationRequest>,
) -> ApiResult<impl IntoResponse> {
    require_customer(&user)?;

    let kind = ApplicationKind::parse(&payload.application_type)
        .ok_or_else(|| WorkflowError::UnknownKind(payload.application_type.clone()))
        .map_err(ApiError::from)?;

    let application_payload = match kind {
        ApplicationKind::AccountOpening => {
            let request = validate_account_opening(
                payload.account_type.as_deref(),
                payload.account_holder_name.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
            )?;
            ApplicationPayload::AccountOpening(request)
        }
        ApplicationKind::Transaction => {
            let request = validate_movement_request(
                payload.account_id,
                payload.transaction_type.as_deref(),
                payload.amount,
            )?;
            ApplicationPayload::Movement(request)
        }
    };

    let repo = ApplicationRepository::new(state.db.clone());
    let application = repo
        .create(user.user_id(), application_payload, payload.description)
        .await?;

    info!(application_id = %application.id, user_id = %user.user_id(), "Application submitted");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "application_id": application.id })),
    ))
}

/// GET /applications - Staff listing, optionally filtered by status.
async fn list_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    let status = match query.status {
        Some(s) => Some(ApplicationStatus::parse(&s).ok_or_else(|| {
            ApiError(AppError::Validation(format!(
                "unknown application status: {s}"
            )))
        })?),
        None => None,
    };

    let repo = ApplicationRepository::new(state.db.clone());
    let views = repo.list_all(status).await?;
    let response: Vec<ApplicationResponse> = views.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// GET /applications/my-applications - Customer's own applications.
async fn my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    require_customer(&user)?;

    let repo = ApplicationRepository::new(state.db.clone());
    let views = repo.list_for_user(user.user_id()).await?;
    let response: Vec<ApplicationResponse> = views.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// PUT /applications/{id}/approve - Staff approves and applies side effects.
async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    review(&state, &user, id, ReviewDecision::Approve, payload.review_notes).await
}

/// PUT /applications/{id}/reject - Staff rejects without side effects.
async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    review(&state, &user, id, ReviewDecision::Reject, payload.review_notes).await
}

async fn review(
    state: &AppState,
    user: &AuthUser,
    application_id: Uuid,
    decision: ReviewDecision,
    review_notes: Option<String>,
) -> ApiResult<Json<applications::Model>> {
    require_staff(user)?;

    let repo = ApplicationRepository::new(state.db.clone());
    let application = repo
        .review(application_id, decision, user.user_id(), review_notes)
        .await?;

    info!(
        application_id = %application_id,
        reviewer_id = %user.user_id(),
        status = ?application.status,
        "Application reviewed"
    );

    Ok(Json(application))
}
