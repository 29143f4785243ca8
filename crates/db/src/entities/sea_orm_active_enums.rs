//! `SeaORM` active enums mapped to database enum types.
//!
//! Conversions to and from the `bankd_core` domain enums live here so the
//! repositories can hand pure values to the business logic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role enum (`user_role`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Staff member; may act on any account or application.
    #[sea_orm(string_value = "staff")]
    Staff,
    /// Customer; may only act on owned entities.
    #[sea_orm(string_value = "customer")]
    Customer,
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "staff" => Some(Self::Staff),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }
}

/// Account type enum (`account_type`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Savings account.
    #[sea_orm(string_value = "savings")]
    Savings,
    /// Current account.
    #[sea_orm(string_value = "current")]
    Current,
    /// Fixed deposit account.
    #[sea_orm(string_value = "fixed_deposit")]
    FixedDeposit,
}

impl From<bankd_core::account::AccountType> for AccountType {
    fn from(value: bankd_core::account::AccountType) -> Self {
        match value {
            bankd_core::account::AccountType::Savings => Self::Savings,
            bankd_core::account::AccountType::Current => Self::Current,
            bankd_core::account::AccountType::FixedDeposit => Self::FixedDeposit,
        }
    }
}

impl From<AccountType> for bankd_core::account::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Savings => Self::Savings,
            AccountType::Current => Self::Current,
            AccountType::FixedDeposit => Self::FixedDeposit,
        }
    }
}

/// Account status enum (`account_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
pub enum AccountStatus {
    /// Account accepts movements.
    #[sea_orm(string_value = "active")]
    Active,
    /// Account is frozen.
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Account is closed.
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl From<bankd_core::account::AccountStatus> for AccountStatus {
    fn from(value: bankd_core::account::AccountStatus) -> Self {
        match value {
            bankd_core::account::AccountStatus::Active => Self::Active,
            bankd_core::account::AccountStatus::Inactive => Self::Inactive,
            bankd_core::account::AccountStatus::Closed => Self::Closed,
        }
    }
}

impl From<AccountStatus> for bankd_core::account::AccountStatus {
    fn from(value: AccountStatus) -> Self {
        match value {
            AccountStatus::Active => Self::Active,
            AccountStatus::Inactive => Self::Inactive,
            AccountStatus::Closed => Self::Closed,
        }
    }
}

/// Transaction kind enum (`transaction_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Deposit movement.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Withdrawal movement.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<bankd_core::movement::MovementKind> for TransactionKind {
    fn from(value: bankd_core::movement::MovementKind) -> Self {
        match value {
            bankd_core::movement::MovementKind::Deposit => Self::Deposit,
            bankd_core::movement::MovementKind::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<TransactionKind> for bankd_core::movement::MovementKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Deposit => Self::Deposit,
            TransactionKind::Withdrawal => Self::Withdrawal,
        }
    }
}

/// Application kind enum (`application_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "application_kind")]
pub enum ApplicationKind {
    /// Request to open a new account.
    #[sea_orm(string_value = "account_opening")]
    AccountOpening,
    /// Request for a deposit or withdrawal.
    #[sea_orm(string_value = "transaction")]
    Transaction,
}

impl From<bankd_core::application::ApplicationKind> for ApplicationKind {
    fn from(value: bankd_core::application::ApplicationKind) -> Self {
        match value {
            bankd_core::application::ApplicationKind::AccountOpening => Self::AccountOpening,
            bankd_core::application::ApplicationKind::Transaction => Self::Transaction,
        }
    }
}

impl From<ApplicationKind> for bankd_core::application::ApplicationKind {
    fn from(value: ApplicationKind) -> Self {
        match value {
            ApplicationKind::AccountOpening => Self::AccountOpening,
            ApplicationKind::Transaction => Self::Transaction,
        }
    }
}

/// Application status enum (`application_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "application_status")]
pub enum ApplicationStatus {
    /// Awaiting staff review.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved (terminal).
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected (terminal).
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<bankd_core::application::ApplicationStatus> for ApplicationStatus {
    fn from(value: bankd_core::application::ApplicationStatus) -> Self {
        match value {
            bankd_core::application::ApplicationStatus::Pending => Self::Pending,
            bankd_core::application::ApplicationStatus::Approved => Self::Approved,
            bankd_core::application::ApplicationStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ApplicationStatus> for bankd_core::application::ApplicationStatus {
    fn from(value: ApplicationStatus) -> Self {
        match value {
            ApplicationStatus::Pending => Self::Pending,
            ApplicationStatus::Approved => Self::Approved,
            ApplicationStatus::Rejected => Self::Rejected,
        }
    }
}
