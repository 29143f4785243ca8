//! Balance movement validation.
//!
//! A movement is a single deposit or withdrawal applied to an account
//! balance together with its appended transaction record. This module holds
//! the pure validation rules; the repository layer wraps them in a scoped
//! database transaction with a row lock on the account.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::account::AccountStatus;

/// Kind of balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// Adds the amount to the balance.
    Deposit,
    /// Subtracts the amount from the balance.
    Withdrawal,
}

impl MovementKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(Self::Deposit),
            "withdrawal" => Some(Self::Withdrawal),
            _ => None,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur when validating a movement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MovementError {
    /// Amount is zero or negative.
    #[error("amount must be greater than 0")]
    InvalidAmount,

    /// Account is not active.
    #[error("account is not active")]
    AccountInactive,

    /// Withdrawal amount exceeds the current balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The requested withdrawal amount.
        requested: Decimal,
        /// The current balance.
        available: Decimal,
    },
}

/// Validates a movement against the current account state and returns the
/// resulting balance.
///
/// Rules:
/// - amount must be strictly positive
/// - the account must be active (both the direct endpoints and the
///   application approval path apply this check)
/// - a withdrawal must not exceed the current balance
///
/// # Errors
///
/// Returns a `MovementError` describing the violated rule.
pub fn validate_movement(
    kind: MovementKind,
    amount: Decimal,
    balance: Decimal,
    status: AccountStatus,
) -> Result<Decimal, MovementError> {
    if amount <= Decimal::ZERO {
        return Err(MovementError::InvalidAmount);
    }

    if !status.accepts_movements() {
        return Err(MovementError::AccountInactive);
    }

    match kind {
        MovementKind::Deposit => Ok(balance + amount),
        MovementKind::Withdrawal => {
            if amount > balance {
                return Err(MovementError::InsufficientFunds {
                    requested: amount,
                    available: balance,
                });
            }
            Ok(balance - amount)
        }
    }
}

/// Returns the signed contribution of a movement to the balance:
/// positive for deposits, negative for withdrawals.
#[must_use]
pub fn signed_amount(kind: MovementKind, amount: Decimal) -> Decimal {
    match kind {
        MovementKind::Deposit => amount,
        MovementKind::Withdrawal => -amount,
    }
}
