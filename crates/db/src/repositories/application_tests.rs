//! Tests for the application submission and review flows.
//!
//! A mocked Postgres connection exercises the review path: the
//! application row lock, the state machine, and the approval side
//! effects committing atomically with the status change.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use uuid::Uuid;

use bankd_core::application::{
    ApplicationError as WorkflowError, MovementRequest, ReviewDecision,
};
use bankd_core::movement::{MovementError, MovementKind};

use super::{ApplicationError, ApplicationPayload, ApplicationRepository};
use crate::entities::sea_orm_active_enums::{
    AccountStatus, AccountType, ApplicationKind, ApplicationStatus, TransactionKind, UserRole,
};
use crate::entities::{accounts, applications, transactions, users};
use crate::repositories::account::AccountError;

fn account(balance: Decimal, status: AccountStatus) -> accounts::Model {
    let now = Utc::now().into();
    accounts::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        account_number: "ACC1234567890".to_string(),
        account_holder_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "555-0100".to_string(),
        account_type: AccountType::Savings,
        balance,
        status,
        created_at: now,
        updated_at: now,
    }
}

fn pending_movement(
    account_id: Uuid,
    kind: TransactionKind,
    amount: Decimal,
) -> applications::Model {
    applications::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        application_type: ApplicationKind::Transaction,
        account_id: Some(account_id),
        transaction_kind: Some(kind),
        amount: Some(amount),
        account_type: None,
        account_holder_name: None,
        email: None,
        phone: None,
        description: None,
        status: ApplicationStatus::Pending,
        reviewed_by: None,
        review_notes: None,
        reviewed_at: None,
        created_at: Utc::now().into(),
    }
}

fn pending_opening() -> applications::Model {
    applications::Model {
        application_type: ApplicationKind::AccountOpening,
        account_id: None,
        transaction_kind: None,
        amount: None,
        account_type: Some(AccountType::Savings),
        account_holder_name: Some("Jane Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        phone: Some("555-0100".to_string()),
        ..pending_movement(Uuid::new_v4(), TransactionKind::Deposit, Decimal::ONE)
    }
}

fn applicant(full_name: &str) -> users::Model {
    let now = Utc::now().into();
    users::Model {
        id: Uuid::new_v4(),
        username: "jane".to_string(),
        email: "jane@example.com".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        full_name: full_name.to_string(),
        role: UserRole::Customer,
        created_at: now,
        updated_at: now,
    }
}

/// Result row for a `COUNT` query.
fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(count))])
}

#[tokio::test]
async fn test_approving_movement_applies_it_atomically() {
    let target = account(dec!(100), AccountStatus::Active);
    let application = pending_movement(target.id, TransactionKind::Deposit, dec!(25));
    let funded = accounts::Model {
        balance: dec!(125),
        ..target.clone()
    };
    let appended = transactions::Model {
        id: Uuid::new_v4(),
        account_id: target.id,
        kind: TransactionKind::Deposit,
        amount: dec!(25),
        balance_after: dec!(125),
        description: "Approved application".to_string(),
        created_at: target.updated_at,
    };
    let reviewer = Uuid::new_v4();
    let reviewed = applications::Model {
        status: ApplicationStatus::Approved,
        reviewed_by: Some(reviewer),
        reviewed_at: Some(Utc::now().into()),
        ..application.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![application.clone()]])
        .append_query_results([vec![target.clone()]])
        .append_query_results([vec![funded]])
        .append_query_results([vec![appended]])
        .append_query_results([vec![reviewed]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db.clone());
    let updated = repo
        .review(application.id, ReviewDecision::Approve, reviewer, None)
        .await
        .unwrap();

    assert_eq!(updated.status, ApplicationStatus::Approved);
    assert_eq!(updated.reviewed_by, Some(reviewer));

    // Both the application row and the account row were locked, and the
    // movement record landed in the same transaction as the status change.
    drop(repo);
    let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
    assert_eq!(log.matches("FOR UPDATE").count(), 2);
    assert_eq!(log.matches(r#"INSERT INTO \"transactions\""#).count(), 1);
}

#[tokio::test]
async fn test_review_of_reviewed_application_fails() {
    let application = applications::Model {
        status: ApplicationStatus::Approved,
        ..pending_movement(Uuid::new_v4(), TransactionKind::Deposit, dec!(25))
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![application.clone()]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db.clone());
    let err = repo
        .review(application.id, ReviewDecision::Reject, Uuid::new_v4(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Workflow(WorkflowError::AlreadyReviewed { .. })
    ));

    drop(repo);
    let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
    assert!(!log.contains(r#"UPDATE \"applications\""#));
}

#[tokio::test]
async fn test_rejecting_skips_side_effects() {
    let application = pending_movement(Uuid::new_v4(), TransactionKind::Withdrawal, dec!(50));
    let reviewer = Uuid::new_v4();
    let reviewed = applications::Model {
        status: ApplicationStatus::Rejected,
        reviewed_by: Some(reviewer),
        reviewed_at: Some(Utc::now().into()),
        review_notes: Some("Not enough history".to_string()),
        ..application.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![application.clone()]])
        .append_query_results([vec![reviewed]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db.clone());
    let updated = repo
        .review(
            application.id,
            ReviewDecision::Reject,
            reviewer,
            Some("Not enough history".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, ApplicationStatus::Rejected);

    drop(repo);
    let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
    assert!(!log.contains("INSERT"));
    assert!(!log.contains(r#"\"accounts\""#));
}

#[tokio::test]
async fn test_approving_opening_creates_account_and_backfills_id() {
    let application = pending_opening();
    let created = accounts::Model {
        user_id: application.user_id,
        ..account(Decimal::ZERO, AccountStatus::Active)
    };
    let reviewer = Uuid::new_v4();
    let reviewed = applications::Model {
        status: ApplicationStatus::Approved,
        account_id: Some(created.id),
        reviewed_by: Some(reviewer),
        reviewed_at: Some(Utc::now().into()),
        ..application.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![application.clone()]])
        .append_query_results([vec![count_row(0)]])
        .append_query_results([vec![created.clone()]])
        .append_query_results([vec![reviewed]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db.clone());
    let updated = repo
        .review(application.id, ReviewDecision::Approve, reviewer, None)
        .await
        .unwrap();

    assert_eq!(updated.status, ApplicationStatus::Approved);
    assert_eq!(updated.account_id, Some(created.id));

    // The created account's id was written back onto the application row.
    drop(repo);
    let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
    assert_eq!(log.matches(r#"INSERT INTO \"accounts\""#).count(), 1);
    assert!(log.contains(&created.id.to_string()));
}

#[tokio::test]
async fn test_approval_revalidates_balance() {
    let target = account(dec!(30), AccountStatus::Active);
    let application = pending_movement(target.id, TransactionKind::Withdrawal, dec!(50));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![application.clone()]])
        .append_query_results([vec![target]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db.clone());
    let err = repo
        .review(application.id, ReviewDecision::Approve, Uuid::new_v4(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Account(AccountError::Movement(
            MovementError::InsufficientFunds { .. }
        ))
    ));

    // The status change never landed.
    drop(repo);
    let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
    assert!(!log.contains(r#"UPDATE \"applications\""#));
}

#[tokio::test]
async fn test_submission_rejects_non_owner_account() {
    let target = account(dec!(100), AccountStatus::Active);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![target.clone()]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db.clone());
    let payload = ApplicationPayload::Movement(MovementRequest {
        account_id: target.id,
        kind: MovementKind::Deposit,
        amount: dec!(10),
    });
    let err = repo.create(Uuid::new_v4(), payload, None).await.unwrap_err();

    assert!(matches!(err, ApplicationError::NotOwner));

    drop(repo);
    let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
    assert!(!log.contains("INSERT"));
}

#[tokio::test]
async fn test_submission_prechecks_balance() {
    let target = account(dec!(30), AccountStatus::Active);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![target.clone()]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db);
    let payload = ApplicationPayload::Movement(MovementRequest {
        account_id: target.id,
        kind: MovementKind::Withdrawal,
        amount: dec!(50),
    });
    let err = repo
        .create(target.user_id, payload, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Movement(MovementError::InsufficientFunds { .. })
    ));
}

#[tokio::test]
async fn test_listing_joins_account_context() {
    let target = account(dec!(100), AccountStatus::Active);
    let application = pending_movement(target.id, TransactionKind::Deposit, dec!(10));
    let submitter = applicant("Demo Customer");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![application.clone()]])
        .append_query_results([vec![submitter]])
        .append_query_results([vec![target.clone()]])
        .into_connection();
    let db = Arc::new(db);

    let repo = ApplicationRepository::new(db);
    let views = repo.list_for_user(application.user_id).await.unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].applicant_name.as_deref(), Some("Demo Customer"));
    assert_eq!(
        views[0].account_number.as_deref(),
        Some(target.account_number.as_str())
    );
    assert_eq!(
        views[0].account_holder_name.as_deref(),
        Some(target.account_holder_name.as_str())
    );
    assert!(views[0].reviewer_name.is_none());
}
