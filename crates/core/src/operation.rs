//! # Operation Module
//!
//! A ledger entry recording a single credit or debit against an account.
//! Entries are immutable once created; corrections are modeled as new
//! offsetting entries, never edits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Credit,
    Debit,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Credit => "credit",
            OperationType::Debit => "debit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit" => Some(OperationType::Credit),
            "debit" => Some(OperationType::Debit),
            _ => None,
        }
    }

    /// Balance after applying `amount` in this direction.
    pub fn final_balance(&self, balance: Decimal, amount: Decimal) -> Decimal {
        match self {
            OperationType::Credit => balance + amount,
            OperationType::Debit => balance - amount,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: i64,
    pub account_id: i64,
    /// Always positive; direction is carried by `operation_type`
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_final_balance() {
        assert_eq!(
            OperationType::Credit.final_balance(dec!(150), dec!(10)),
            dec!(160)
        );
        assert_eq!(
            OperationType::Debit.final_balance(dec!(500), dec!(10)),
            dec!(490)
        );
        // The engine rejects this before writing; the arithmetic itself
        // simply goes negative.
        assert_eq!(
            OperationType::Debit.final_balance(dec!(150), dec!(1000)),
            dec!(-850)
        );
    }

    #[test]
    fn test_operation_type_round_trip() {
        assert_eq!(OperationType::from_str("credit"), Some(OperationType::Credit));
        assert_eq!(OperationType::from_str("DEBIT"), Some(OperationType::Debit));
        assert_eq!(OperationType::from_str("transfer"), None);
    }
}
