//! `SeaORM` Entity for the applications table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    AccountType, ApplicationKind, ApplicationStatus, TransactionKind,
};

/// Customer application awaiting staff review.
///
/// Nullable columns are populated per kind: account opening requests carry
/// `account_type`, `account_holder_name`, `email` and `phone`; transaction
/// requests carry `account_id`, `transaction_kind` and `amount`. On approval
/// of an account opening, `account_id` is backfilled with the created account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Submitting customer.
    pub user_id: Uuid,
    /// What is being requested.
    pub application_type: ApplicationKind,
    /// Target (or created) account, when applicable.
    pub account_id: Option<Uuid>,
    /// Requested movement kind for transaction applications.
    pub transaction_kind: Option<TransactionKind>,
    /// Requested movement amount for transaction applications.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub amount: Option<Decimal>,
    /// Requested product type for account opening applications.
    pub account_type: Option<AccountType>,
    /// Holder name for account opening applications.
    pub account_holder_name: Option<String>,
    /// Contact email for account opening applications.
    pub email: Option<String>,
    /// Contact phone for account opening applications.
    pub phone: Option<String>,
    /// Free-form description from the applicant.
    pub description: Option<String>,
    /// Review state.
    pub status: ApplicationStatus,
    /// Staff member who reviewed the application.
    pub reviewed_by: Option<Uuid>,
    /// Notes the reviewer left.
    pub review_notes: Option<String>,
    /// When the review happened.
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Submitting user.
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Applicant,
    /// Reviewing staff member.
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewedBy",
        to = "super::users::Column::Id"
    )]
    Reviewer,
    /// Target account.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
