//! Application repository and the review workflow engine.
//!
//! Submission pre-checks movement applications against the current account
//! state so obviously doomed requests fail fast. Approval re-checks inside
//! a database transaction with the account row locked, because the balance
//! may have changed between submission and review.

use bankd_core::application::{
    AccountOpeningRequest, ApplicationError as WorkflowError, ApplicationKind as CoreKind,
    ApplicationStatus as CoreStatus, ApplicationWorkflow, MovementRequest, ReviewDecision,
};
use bankd_core::movement::{self, MovementError, MovementKind};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{accounts, applications, users};
use crate::repositories::account::{AccountError, AccountRepository};

/// Error types for application operations.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Application not found.
    #[error("application not found: {0}")]
    NotFound(Uuid),

    /// Target account not found.
    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    /// The target account belongs to another user.
    #[error("account belongs to another user")]
    NotOwner,

    /// Workflow rule violation.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Movement validation failed.
    #[error(transparent)]
    Movement(#[from] MovementError),

    /// Account operation failed during approval.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Validated payload of a new application.
#[derive(Debug, Clone)]
pub enum ApplicationPayload {
    /// Request to open a new account.
    AccountOpening(AccountOpeningRequest),
    /// Request for a deposit or withdrawal on an existing account.
    Movement(MovementRequest),
}

/// Application row enriched with display context for listings.
#[derive(Debug, Clone)]
pub struct ApplicationView {
    /// The application itself.
    pub application: applications::Model,
    /// Full name of the submitting user.
    pub applicant_name: Option<String>,
    /// Number of the target (or created) account.
    pub account_number: Option<String>,
    /// Holder name of the target (or created) account.
    pub account_holder_name: Option<String>,
    /// Full name of the reviewing staff member.
    pub reviewer_name: Option<String>,
}

/// Application repository for submission, listing, and review.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    db: Arc<DatabaseConnection>,
}

impl ApplicationRepository {
    /// Creates a new application repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds an application by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<applications::Model>, DbErr> {
        applications::Entity::find_by_id(id).one(self.db.as_ref()).await
    }

    /// Submits a new application for the given user.
    ///
    /// Movement applications are pre-checked against the target account:
    /// the account must exist, belong to the submitting user, be active,
    /// and cover the amount for withdrawals.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::AccountNotFound`, `NotOwner`, or
    /// `Movement` when the pre-check fails, or an error if a database
    /// operation fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        payload: ApplicationPayload,
        description: Option<String>,
    ) -> Result<applications::Model, ApplicationError> {
        let now = chrono::Utc::now().into();
        let mut row = applications::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(None),
            transaction_kind: Set(None),
            amount: Set(None),
            account_type: Set(None),
            account_holder_name: Set(None),
            email: Set(None),
            phone: Set(None),
            description: Set(description),
            status: Set(CoreStatus::Pending.into()),
            reviewed_by: Set(None),
            review_notes: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        match payload {
            ApplicationPayload::AccountOpening(request) => {
                row.application_type = Set(CoreKind::AccountOpening.into());
                row.account_type = Set(Some(request.account_type.into()));
                row.account_holder_name = Set(Some(request.account_holder_name));
                row.email = Set(Some(request.email));
                row.phone = Set(Some(request.phone));
            }
            ApplicationPayload::Movement(request) => {
                self.precheck_movement(user_id, &request).await?;
                row.application_type = Set(CoreKind::Transaction.into());
                row.account_id = Set(Some(request.account_id));
                row.transaction_kind = Set(Some(request.kind.into()));
                row.amount = Set(Some(request.amount));
            }
        }

        Ok(row.insert(self.db.as_ref()).await?)
    }

    /// Lists the applications of a single user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ApplicationView>, DbErr> {
        let rows = applications::Entity::find()
            .filter(applications::Column::UserId.eq(user_id))
            .order_by_desc(applications::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        self.attach_context(rows).await
    }

    /// Lists all applications, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
        status: Option<CoreStatus>,
    ) -> Result<Vec<ApplicationView>, DbErr> {
        let mut query = applications::Entity::find();
        if let Some(status) = status {
            let db_status: crate::entities::sea_orm_active_enums::ApplicationStatus =
                status.into();
            query = query.filter(applications::Column::Status.eq(db_status));
        }
        let rows = query
            .order_by_desc(applications::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        self.attach_context(rows).await
    }

    /// Reviews a pending application.
    ///
    /// The application row is locked for the duration so concurrent reviews
    /// of the same application serialize and the loser sees the terminal
    /// status. Approving an account opening creates the account and
    /// backfills `account_id`; approving a movement re-validates and
    /// applies it under the account row lock. All of it commits atomically
    /// with the status change.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the application does not
    /// exist, `Workflow` if it was already reviewed, `Account` or
    /// `Movement` if approval side effects fail, or an error if a database
    /// operation fails.
    pub async fn review(
        &self,
        application_id: Uuid,
        decision: ReviewDecision,
        reviewer_id: Uuid,
        review_notes: Option<String>,
    ) -> Result<applications::Model, ApplicationError> {
        let txn = self.db.begin().await?;

        let application = applications::Entity::find_by_id(application_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ApplicationError::NotFound(application_id))?;

        let current: CoreStatus = application.status.clone().into();
        let action = ApplicationWorkflow::review(current, decision, reviewer_id, review_notes)?;

        let mut created_account_id = None;
        if action.new_status == CoreStatus::Approved {
            match CoreKind::from(application.application_type.clone()) {
                CoreKind::AccountOpening => {
                    let missing = || WorkflowError::MissingFields {
                        kind: CoreKind::AccountOpening,
                        required: "account_type, account_holder_name, email, and phone",
                    };
                    let account_type = application.account_type.clone().ok_or_else(missing)?;
                    let holder = application
                        .account_holder_name
                        .clone()
                        .ok_or_else(missing)?;
                    let email = application.email.clone().ok_or_else(missing)?;
                    let phone = application.phone.clone().ok_or_else(missing)?;

                    let account = AccountRepository::insert_account_in(
                        &txn,
                        application.user_id,
                        account_type.into(),
                        &holder,
                        &email,
                        &phone,
                    )
                    .await?;
                    created_account_id = Some(account.id);
                }
                CoreKind::Transaction => {
                    let missing = || WorkflowError::MissingFields {
                        kind: CoreKind::Transaction,
                        required: "account_id, transaction_type, and amount",
                    };
                    let account_id = application.account_id.ok_or_else(missing)?;
                    let kind: MovementKind =
                        application.transaction_kind.clone().ok_or_else(missing)?.into();
                    let amount = application.amount.ok_or_else(missing)?;
                    let description = application
                        .description
                        .clone()
                        .unwrap_or_else(|| "Approved application".to_string());

                    AccountRepository::apply_movement_in(
                        &txn,
                        account_id,
                        kind,
                        amount,
                        &description,
                    )
                    .await?;
                }
            }
        }

        let mut active: applications::ActiveModel = application.into();
        active.status = Set(action.new_status.into());
        active.reviewed_by = Set(Some(action.reviewed_by));
        active.review_notes = Set(action.review_notes);
        active.reviewed_at = Set(Some(action.reviewed_at.into()));
        if let Some(account_id) = created_account_id {
            active.account_id = Set(Some(account_id));
        }
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Validates a movement application against the current account state.
    async fn precheck_movement(
        &self,
        user_id: Uuid,
        request: &MovementRequest,
    ) -> Result<(), ApplicationError> {
        let account = accounts::Entity::find_by_id(request.account_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ApplicationError::AccountNotFound(request.account_id))?;

        if account.user_id != user_id {
            return Err(ApplicationError::NotOwner);
        }

        movement::validate_movement(
            request.kind,
            request.amount,
            account.balance,
            account.status.into(),
        )?;
        Ok(())
    }

    /// Resolves display context (names and account numbers) for listings.
    async fn attach_context(
        &self,
        rows: Vec<applications::Model>,
    ) -> Result<Vec<ApplicationView>, DbErr> {
        let mut views = Vec::with_capacity(rows.len());
        for application in rows {
            let applicant_name = users::Entity::find_by_id(application.user_id)
                .one(self.db.as_ref())
                .await?
                .map(|u| u.full_name);

            let (account_number, account_holder_name) = match application.account_id {
                Some(account_id) => accounts::Entity::find_by_id(account_id)
                    .one(self.db.as_ref())
                    .await?
                    .map_or((None, None), |a| {
                        (Some(a.account_number), Some(a.account_holder_name))
                    }),
                None => (None, None),
            };

            let reviewer_name = match application.reviewed_by {
                Some(reviewer_id) => users::Entity::find_by_id(reviewer_id)
                    .one(self.db.as_ref())
                    .await?
                    .map(|u| u.full_name),
                None => None,
            };

            views.push(ApplicationView {
                application,
                applicant_name,
                account_number,
                account_holder_name,
                reviewer_name,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
#[path = "application_tests.rs"]
mod tests;
