//! Account domain types and account-number generation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix for generated account numbers.
pub const ACCOUNT_NUMBER_PREFIX: &str = "ACC";

/// Number of random digits in a generated account number.
const ACCOUNT_NUMBER_DIGITS: usize = 10;

/// Account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Savings account.
    Savings,
    /// Current account.
    Current,
    /// Fixed deposit account.
    FixedDeposit,
}

impl AccountType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Current => "current",
            Self::FixedDeposit => "fixed_deposit",
        }
    }

    /// Parses a type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "savings" => Some(Self::Savings),
            "current" => Some(Self::Current),
            "fixed_deposit" => Some(Self::FixedDeposit),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status.
///
/// Only active accounts accept balance movements; this is enforced
/// uniformly on the direct deposit/withdraw path and the application
/// approval path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account accepts movements.
    Active,
    /// Account is frozen; movements are rejected.
    Inactive,
    /// Account is closed; movements are rejected.
    Closed,
}

impl AccountStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Closed => "closed",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns true if the account accepts balance movements.
    #[must_use]
    pub const fn accepts_movements(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generates a candidate account number: "ACC" plus random digits.
///
/// Uniqueness is NOT guaranteed here; the caller must re-check against the
/// store and retry on collision. A timestamp-derived number would collide
/// under concurrent approvals, so the token is random.
#[must_use]
pub fn generate_account_number() -> String {
    let mut rng = rand::rng();
    let mut number = String::with_capacity(ACCOUNT_NUMBER_PREFIX.len() + ACCOUNT_NUMBER_DIGITS);
    number.push_str(ACCOUNT_NUMBER_PREFIX);
    for _ in 0..ACCOUNT_NUMBER_DIGITS {
        let digit: u8 = rng.random_range(0..10);
        number.push(char::from(b'0' + digit));
    }
    number
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountType::Savings, "savings")]
    #[case(AccountType::Current, "current")]
    #[case(AccountType::FixedDeposit, "fixed_deposit")]
    fn test_account_type_round_trip(#[case] ty: AccountType, #[case] s: &str) {
        assert_eq!(ty.as_str(), s);
        assert_eq!(AccountType::parse(s), Some(ty));
    }

    #[test]
    fn test_account_type_parse_invalid() {
        assert_eq!(AccountType::parse("checking"), None);
    }

    #[rstest]
    #[case(AccountStatus::Active, "active", true)]
    #[case(AccountStatus::Inactive, "inactive", false)]
    #[case(AccountStatus::Closed, "closed", false)]
    fn test_account_status(
        #[case] status: AccountStatus,
        #[case] s: &str,
        #[case] accepts: bool,
    ) {
        assert_eq!(status.as_str(), s);
        assert_eq!(AccountStatus::parse(s), Some(status));
        assert_eq!(status.accepts_movements(), accepts);
    }

    #[test]
    fn test_generate_account_number_shape() {
        let number = generate_account_number();
        assert!(number.starts_with("ACC"));
        assert_eq!(number.len(), 13);
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_account_number_varies() {
        // Random tokens should not repeat across a small sample.
        let numbers: std::collections::HashSet<_> =
            (0..32).map(|_| generate_account_number()).collect();
        assert!(numbers.len() > 1);
    }
}
