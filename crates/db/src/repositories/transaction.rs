//! Transaction repository for movement history queries.
//!
//! Transaction records are append-only; they are written by the account
//! repository's movement path and only read here.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{accounts, transactions};

/// Transaction repository for read access to movement history.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists all transactions with their accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
    ) -> Result<Vec<(transactions::Model, Option<accounts::Model>)>, DbErr> {
        transactions::Entity::find()
            .find_also_related(accounts::Entity)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Lists the transactions of a single account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }
}
