//! Account repository and the balance mutation path.
//!
//! Every balance change goes through [`AccountRepository::apply_movement_in`]
//! inside a database transaction holding a row lock on the account, so the
//! balance update and the appended transaction record commit or roll back
//! together.

use bankd_core::account::{AccountStatus as CoreAccountStatus, AccountType as CoreAccountType};
use bankd_core::movement::{self, MovementError, MovementKind};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{accounts, transactions};

/// Attempts to find an unused account number before giving up.
const MAX_NUMBER_ATTEMPTS: usize = 8;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("account not found: {0}")]
    NotFound(Uuid),

    /// Could not find an unused account number.
    #[error("could not allocate a unique account number")]
    NumberCollision,

    /// Movement validation failed.
    #[error(transparent)]
    Movement(#[from] MovementError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of an applied movement: the updated account and the transaction
/// record appended for it.
#[derive(Debug, Clone)]
pub struct MovementOutcome {
    /// Account with its new balance.
    pub account: accounts::Model,
    /// The appended movement record.
    pub record: transactions::Model,
}

/// Account repository for CRUD operations and balance movements.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id).one(self.db.as_ref()).await
    }

    /// Lists all accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .order_by_desc(accounts::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Lists the accounts owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_desc(accounts::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Creates an account for a user, optionally seeded with an initial
    /// deposit.
    ///
    /// The account is inserted with a zero balance and the initial deposit
    /// is applied as a regular movement in the same database transaction,
    /// so the opening balance always has a matching transaction record.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial balance is negative, if no unique
    /// account number could be allocated, or if a database operation fails.
    pub async fn create_account(
        &self,
        user_id: Uuid,
        account_type: CoreAccountType,
        account_holder_name: &str,
        email: &str,
        phone: &str,
        initial_balance: Decimal,
    ) -> Result<accounts::Model, AccountError> {
        if initial_balance < Decimal::ZERO {
            return Err(MovementError::InvalidAmount.into());
        }

        let txn = self.db.begin().await?;

        let account = Self::insert_account_in(
            &txn,
            user_id,
            account_type,
            account_holder_name,
            email,
            phone,
        )
        .await?;

        let account = if initial_balance > Decimal::ZERO {
            Self::apply_movement_in(
                &txn,
                account.id,
                MovementKind::Deposit,
                initial_balance,
                "Initial deposit",
            )
            .await?
            .account
        } else {
            account
        };

        txn.commit().await?;
        Ok(account)
    }

    /// Updates an account's contact fields and status. Absent fields are
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account does not exist, or
    /// an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        account_holder_name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        account_type: Option<CoreAccountType>,
        status: Option<CoreAccountStatus>,
    ) -> Result<accounts::Model, AccountError> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(account_holder_name) = account_holder_name {
            active.account_holder_name = Set(account_holder_name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        if let Some(account_type) = account_type {
            active.account_type = Set(account_type.into());
        }
        if let Some(status) = status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes an account and, via cascade, its transaction history.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account does not exist, or
    /// an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        let result = accounts::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id));
        }
        Ok(())
    }

    /// Applies a deposit or withdrawal to an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account does not exist,
    /// `AccountError::Movement` if validation rejects the movement, or an
    /// error if a database operation fails.
    pub async fn apply_movement(
        &self,
        account_id: Uuid,
        kind: MovementKind,
        amount: Decimal,
        description: &str,
    ) -> Result<MovementOutcome, AccountError> {
        let txn = self.db.begin().await?;
        let outcome = Self::apply_movement_in(&txn, account_id, kind, amount, description).await?;
        txn.commit().await?;
        Ok(outcome)
    }

    /// Applies a movement inside an existing database transaction.
    ///
    /// The account row is locked with `SELECT ... FOR UPDATE` so concurrent
    /// movements on the same account serialize, then validation runs
    /// against the locked balance and the update plus the transaction
    /// record insert happen under the same lock.
    pub(crate) async fn apply_movement_in(
        txn: &DatabaseTransaction,
        account_id: Uuid,
        kind: MovementKind,
        amount: Decimal,
        description: &str,
    ) -> Result<MovementOutcome, AccountError> {
        let account = accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let status: CoreAccountStatus = account.status.clone().into();
        let new_balance = movement::validate_movement(kind, amount, account.balance, status)?;

        let now = chrono::Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();
        active.balance = Set(new_balance);
        active.updated_at = Set(now);
        let account = active.update(txn).await?;

        let record = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account.id),
            kind: Set(kind.into()),
            amount: Set(amount),
            balance_after: Set(new_balance),
            description: Set(description.to_string()),
            created_at: Set(now),
        };
        let record = record.insert(txn).await?;

        Ok(MovementOutcome { account, record })
    }

    /// Inserts a new active account with a zero balance inside an existing
    /// database transaction.
    pub(crate) async fn insert_account_in(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        account_type: CoreAccountType,
        account_holder_name: &str,
        email: &str,
        phone: &str,
    ) -> Result<accounts::Model, AccountError> {
        let account_number = Self::generate_unique_number(txn).await?;
        let now = chrono::Utc::now().into();

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_number: Set(account_number),
            account_holder_name: Set(account_holder_name.to_string()),
            email: Set(email.to_string()),
            phone: Set(phone.to_string()),
            account_type: Set(account_type.into()),
            balance: Set(Decimal::ZERO),
            status: Set(CoreAccountStatus::Active.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(txn).await?)
    }

    /// Generates an account number not yet present in the store.
    ///
    /// The random candidate space is large, so a handful of attempts is
    /// enough; the unique index on `account_number` still backstops the
    /// race where two transactions pick the same candidate.
    async fn generate_unique_number(txn: &DatabaseTransaction) -> Result<String, AccountError> {
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let candidate = bankd_core::account::generate_account_number();
            let taken = accounts::Entity::find()
                .filter(accounts::Column::AccountNumber.eq(candidate.as_str()))
                .count(txn)
                .await?;
            if taken == 0 {
                return Ok(candidate);
            }
        }
        Err(AccountError::NumberCollision)
    }
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
