//! Database schema definitions
//!
//! Row types for sqlx mapping from the SQLite tables. The schema itself is
//! defined in migrations/20260801000000_init.sql; decimal columns are
//! stored as TEXT.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, NaiveDate, Utc};
use contabank_core::{Account, AccountType, Operation, OperationType, Owner};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row type for the `owners` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OwnerRow {
    pub id: i64,
    pub name: String,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type for the `accounts` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub balance: String, // Decimal stored as TEXT
    pub daily_withdrawal_limit: Option<String>,
    pub is_active: bool,
    #[sqlx(rename = "type")]
    pub account_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type for the `operations` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OperationRow {
    pub id: i64,
    pub account_id: i64,
    pub amount: String, // Decimal stored as TEXT
    #[sqlx(rename = "type")]
    pub operation_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// === Conversion implementations ===

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Owner {
            id: row.id,
            name: row.name,
            document_number: row.document_number,
            birth_date: row.birth_date,
        }
    }
}

fn parse_decimal(field: &str, value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| PersistenceError::InvalidDecimal(format!("{field} = {value}")))
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Account> {
        let account_type = AccountType::from_str(&row.account_type).ok_or_else(|| {
            PersistenceError::InvalidEnumValue {
                field: "accounts.type".to_string(),
                value: row.account_type.clone(),
            }
        })?;

        let daily_withdrawal_limit = row
            .daily_withdrawal_limit
            .as_deref()
            .map(|value| parse_decimal("accounts.daily_withdrawal_limit", value))
            .transpose()?;

        Ok(Account {
            id: row.id,
            balance: parse_decimal("accounts.balance", &row.balance)?,
            daily_withdrawal_limit,
            is_active: row.is_active,
            account_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<OperationRow> for Operation {
    type Error = PersistenceError;

    fn try_from(row: OperationRow) -> PersistenceResult<Operation> {
        let operation_type = OperationType::from_str(&row.operation_type).ok_or_else(|| {
            PersistenceError::InvalidEnumValue {
                field: "operations.type".to_string(),
                value: row.operation_type.clone(),
            }
        })?;

        Ok(Operation {
            id: row.id,
            account_id: row.account_id,
            amount: parse_decimal("operations.amount", &row.amount)?,
            operation_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account_row(balance: &str, account_type: &str) -> AccountRow {
        AccountRow {
            id: 1,
            balance: balance.to_string(),
            daily_withdrawal_limit: None,
            is_active: true,
            account_type: account_type.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_row_conversion() {
        let account = Account::try_from(account_row("150.50", "corrente")).unwrap();
        assert_eq!(account.balance, dec!(150.50));
        assert_eq!(account.account_type, AccountType::Corrente);
    }

    #[test]
    fn test_bad_decimal_is_rejected() {
        let result = Account::try_from(account_row("not-a-number", "corrente"));
        assert!(matches!(result, Err(PersistenceError::InvalidDecimal(_))));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = Account::try_from(account_row("0", "checking"));
        assert!(matches!(
            result,
            Err(PersistenceError::InvalidEnumValue { .. })
        ));
    }
}
