//! # Account Module
//!
//! An Account holds a non-negative balance and belongs to one or more
//! Owners through the ownership association. Joint accounts (`conjunta`)
//! require at least two distinct owners; every other type exactly one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account type, a closed enum carrying the Brazilian banking labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Individual checking account
    Corrente,
    /// Savings account
    Poupanca,
    /// Payroll account
    Salario,
    /// Joint account, held by two or more owners
    Conjunta,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Corrente => "corrente",
            AccountType::Poupanca => "poupanca",
            AccountType::Salario => "salario",
            AccountType::Conjunta => "conjunta",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "corrente" => Some(AccountType::Corrente),
            "poupanca" => Some(AccountType::Poupanca),
            "salario" => Some(AccountType::Salario),
            "conjunta" => Some(AccountType::Conjunta),
            _ => None,
        }
    }

    /// Whether this type is held jointly by several owners.
    pub fn is_joint(&self) -> bool {
        matches!(self, AccountType::Conjunta)
    }

    /// Joint accounts take >1 distinct owner, every other type exactly 1.
    pub fn accepts_owner_count(&self, distinct_owners: usize) -> bool {
        if self.is_joint() {
            distinct_owners > 1
        } else {
            distinct_owners == 1
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Synthetic identifier assigned at creation
    pub id: i64,
    /// Current balance; never negative after a completed mutation
    pub balance: Decimal,
    /// Stored but not enforced by any balance mutation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_withdrawal_limit: Option<Decimal>,
    /// False means the account is blocked
    pub is_active: bool,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether the account is blocked for gated operations.
    pub fn is_blocked(&self) -> bool {
        !self.is_active
    }
}

/// Input for account creation; identifier and timestamps are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub balance: Decimal,
    pub daily_withdrawal_limit: Option<Decimal>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub is_active: bool,
}
