//! Application review state machine and payload validation.
//!
//! An application is a customer-submitted request that takes effect only
//! after staff review. The state machine is deliberately small:
//!
//! - pending → approved (terminal)
//! - pending → rejected (terminal)
//!
//! Reviewing a non-pending application always fails.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::account::AccountType;
use crate::movement::MovementKind;

/// Application status in the review workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Awaiting staff review.
    Pending,
    /// Approved by staff (terminal).
    Approved,
    /// Rejected by staff (terminal).
    Rejected,
}

impl ApplicationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    /// Request to open a new account.
    AccountOpening,
    /// Request to deposit into or withdraw from an existing account.
    Transaction,
}

impl ApplicationKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountOpening => "account_opening",
            Self::Transaction => "transaction",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "account_opening" => Some(Self::AccountOpening),
            "transaction" => Some(Self::Transaction),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Staff decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Approve the application and apply its side effects.
    Approve,
    /// Reject the application; no side effects.
    Reject,
}

/// A validated review transition with audit trail information.
#[derive(Debug, Clone)]
pub struct ReviewAction {
    /// The terminal status after the review.
    pub new_status: ApplicationStatus,
    /// The staff member who reviewed the application.
    pub reviewed_by: Uuid,
    /// When the review happened.
    pub reviewed_at: DateTime<Utc>,
    /// Optional notes from the reviewer.
    pub review_notes: Option<String>,
}

/// Errors from the application workflow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    /// The application has already been approved or rejected.
    #[error("application already reviewed (status: {status})")]
    AlreadyReviewed {
        /// The terminal status the application is in.
        status: ApplicationStatus,
    },

    /// A required field for the application kind is missing.
    #[error("{kind} applications require {required}")]
    MissingFields {
        /// The application kind being validated.
        kind: ApplicationKind,
        /// Human-readable list of required fields.
        required: &'static str,
    },

    /// The account type is not recognized.
    #[error("unknown account type: {0}")]
    UnknownAccountType(String),

    /// The transaction kind is not recognized.
    #[error("unknown transaction type: {0}")]
    UnknownMovementKind(String),

    /// The application kind is not recognized.
    #[error("unknown application type: {0}")]
    UnknownKind(String),
}

/// Stateless service validating review transitions.
pub struct ApplicationWorkflow;

impl ApplicationWorkflow {
    /// Validates a review of a pending application.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::AlreadyReviewed` if the application is
    /// not pending.
    pub fn review(
        current_status: ApplicationStatus,
        decision: ReviewDecision,
        reviewed_by: Uuid,
        review_notes: Option<String>,
    ) -> Result<ReviewAction, ApplicationError> {
        match current_status {
            ApplicationStatus::Pending => Ok(ReviewAction {
                new_status: match decision {
                    ReviewDecision::Approve => ApplicationStatus::Approved,
                    ReviewDecision::Reject => ApplicationStatus::Rejected,
                },
                reviewed_by,
                reviewed_at: Utc::now(),
                review_notes,
            }),
            status => Err(ApplicationError::AlreadyReviewed { status }),
        }
    }
}

/// Validated payload for an account-opening application.
#[derive(Debug, Clone)]
pub struct AccountOpeningRequest {
    /// Requested account type.
    pub account_type: AccountType,
    /// Account holder name.
    pub account_holder_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
}

/// Validated payload for a transaction application.
#[derive(Debug, Clone)]
pub struct MovementRequest {
    /// Target account.
    pub account_id: Uuid,
    /// Deposit or withdrawal.
    pub kind: MovementKind,
    /// Requested amount.
    pub amount: Decimal,
}

/// Validates the fields of an account-opening application.
///
/// # Errors
///
/// Returns `ApplicationError::MissingFields` when a field is absent or
/// blank, and `ApplicationError::UnknownAccountType` for an invalid type.
pub fn validate_account_opening(
    account_type: Option<&str>,
    account_holder_name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<AccountOpeningRequest, ApplicationError> {
    let missing = || ApplicationError::MissingFields {
        kind: ApplicationKind::AccountOpening,
        required: "account_type, account_holder_name, email, and phone",
    };

    let account_type_str = non_blank(account_type).ok_or_else(missing)?;
    let account_holder_name = non_blank(account_holder_name).ok_or_else(missing)?;
    let email = non_blank(email).ok_or_else(missing)?;
    let phone = non_blank(phone).ok_or_else(missing)?;

    let account_type = AccountType::parse(account_type_str)
        .ok_or_else(|| ApplicationError::UnknownAccountType(account_type_str.to_string()))?;

    Ok(AccountOpeningRequest {
        account_type,
        account_holder_name: account_holder_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}

/// Validates the fields of a transaction application.
///
/// Balance and ownership checks happen against the store; this only
/// validates shape.
///
/// # Errors
///
/// Returns `ApplicationError::MissingFields` when a field is absent, and
/// `ApplicationError::UnknownMovementKind` for an invalid transaction type.
pub fn validate_movement_request(
    account_id: Option<Uuid>,
    transaction_kind: Option<&str>,
    amount: Option<Decimal>,
) -> Result<MovementRequest, ApplicationError> {
    let missing = || ApplicationError::MissingFields {
        kind: ApplicationKind::Transaction,
        required: "account_id, transaction_type, and amount",
    };

    let account_id = account_id.ok_or_else(missing)?;
    let kind_str = non_blank(transaction_kind).ok_or_else(missing)?;
    let amount = amount.ok_or_else(missing)?;

    let kind = MovementKind::parse(kind_str)
        .ok_or_else(|| ApplicationError::UnknownMovementKind(kind_str.to_string()))?;

    Ok(MovementRequest {
        account_id,
        kind,
        amount,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_approve_pending() {
        let reviewer = Uuid::new_v4();
        let action = ApplicationWorkflow::review(
            ApplicationStatus::Pending,
            ReviewDecision::Approve,
            reviewer,
            Some("Looks good".to_string()),
        )
        .unwrap();

        assert_eq!(action.new_status, ApplicationStatus::Approved);
        assert_eq!(action.reviewed_by, reviewer);
        assert_eq!(action.review_notes.as_deref(), Some("Looks good"));
    }

    #[test]
    fn test_reject_pending() {
        let action = ApplicationWorkflow::review(
            ApplicationStatus::Pending,
            ReviewDecision::Reject,
            Uuid::new_v4(),
            None,
        )
        .unwrap();

        assert_eq!(action.new_status, ApplicationStatus::Rejected);
        assert!(action.review_notes.is_none());
    }

    #[test]
    fn test_review_approved_fails() {
        let result = ApplicationWorkflow::review(
            ApplicationStatus::Approved,
            ReviewDecision::Approve,
            Uuid::new_v4(),
            None,
        );
        assert_eq!(
            result.unwrap_err(),
            ApplicationError::AlreadyReviewed {
                status: ApplicationStatus::Approved
            }
        );
    }

    #[test]
    fn test_review_rejected_fails() {
        let result = ApplicationWorkflow::review(
            ApplicationStatus::Rejected,
            ReviewDecision::Reject,
            Uuid::new_v4(),
            None,
        );
        assert_eq!(
            result.unwrap_err(),
            ApplicationError::AlreadyReviewed {
                status: ApplicationStatus::Rejected
            }
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            ApplicationStatus::parse("PENDING"),
            Some(ApplicationStatus::Pending)
        );
        assert_eq!(ApplicationStatus::parse("unknown"), None);
    }

    #[test]
    fn test_validate_account_opening_ok() {
        let request = validate_account_opening(
            Some("savings"),
            Some("Jane Doe"),
            Some("jane@example.com"),
            Some("555-0100"),
        )
        .unwrap();
        assert_eq!(request.account_type, AccountType::Savings);
        assert_eq!(request.account_holder_name, "Jane Doe");
    }

    #[test]
    fn test_validate_account_opening_missing_field() {
        let result =
            validate_account_opening(Some("savings"), None, Some("jane@example.com"), Some("x"));
        assert!(matches!(
            result,
            Err(ApplicationError::MissingFields {
                kind: ApplicationKind::AccountOpening,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_account_opening_blank_is_missing() {
        let result = validate_account_opening(
            Some("savings"),
            Some("   "),
            Some("jane@example.com"),
            Some("555-0100"),
        );
        assert!(matches!(
            result,
            Err(ApplicationError::MissingFields { .. })
        ));
    }

    #[test]
    fn test_validate_account_opening_bad_type() {
        let result = validate_account_opening(
            Some("checking"),
            Some("Jane Doe"),
            Some("jane@example.com"),
            Some("555-0100"),
        );
        assert_eq!(
            result.unwrap_err(),
            ApplicationError::UnknownAccountType("checking".to_string())
        );
    }

    #[test]
    fn test_validate_movement_request_ok() {
        let account_id = Uuid::new_v4();
        let request =
            validate_movement_request(Some(account_id), Some("Withdrawal"), Some(dec!(50)))
                .unwrap();
        assert_eq!(request.account_id, account_id);
        assert_eq!(request.kind, MovementKind::Withdrawal);
        assert_eq!(request.amount, dec!(50));
    }

    #[test]
    fn test_validate_movement_request_missing() {
        let result = validate_movement_request(None, Some("Deposit"), Some(dec!(50)));
        assert!(matches!(
            result,
            Err(ApplicationError::MissingFields {
                kind: ApplicationKind::Transaction,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_movement_request_bad_kind() {
        let result =
            validate_movement_request(Some(Uuid::new_v4()), Some("transfer"), Some(dec!(50)));
        assert_eq!(
            result.unwrap_err(),
            ApplicationError::UnknownMovementKind("transfer".to_string())
        );
    }
}
