//! Request validation
//!
//! Field-level checks run before any service is touched. Failures
//! accumulate so one response reports every rejected field, and accepted
//! payloads come back already normalized (trimmed names, bare-digit
//! document numbers).

use crate::error::FieldError;
use crate::handlers::{CreateAccountRequest, CreateOwnerRequest, StatementQuery};
use chrono::{NaiveDate, Utc};
use contabank_core::{AccountType, Cpf, NewAccount, NewOwner};
use rust_decimal::Decimal;

const OWNER_NAME_MIN: usize = 5;
const OWNER_NAME_MAX: usize = 100;
const ADULT_AGE_YEARS: u32 = 18;

fn is_adult(birth_date: NaiveDate, today: NaiveDate) -> bool {
    today
        .years_since(birth_date)
        .is_some_and(|years| years >= ADULT_AGE_YEARS)
}

/// Validate an owner-creation payload.
pub fn validate_new_owner(payload: &CreateOwnerRequest) -> Result<NewOwner, Vec<FieldError>> {
    let mut details = Vec::new();

    let name = payload.name.trim();
    let name_length = name.chars().count();
    if !(OWNER_NAME_MIN..=OWNER_NAME_MAX).contains(&name_length) {
        details.push(FieldError::new(
            "name",
            format!("name must have {OWNER_NAME_MIN} to {OWNER_NAME_MAX} characters"),
        ));
    }

    let cpf = Cpf::new(&payload.document_number);
    if !cpf.is_valid() {
        details.push(FieldError::new(
            "documentNumber",
            "documentNumber must be a valid CPF",
        ));
    }

    let birth_date = match NaiveDate::parse_from_str(&payload.birth_date, "%Y-%m-%d") {
        Ok(date) => {
            if !is_adult(date, Utc::now().date_naive()) {
                details.push(FieldError::new(
                    "birthDate",
                    "owner must be at least 18 years old",
                ));
            }
            Some(date)
        }
        Err(_) => {
            details.push(FieldError::new(
                "birthDate",
                "birthDate must be a date in YYYY-MM-DD format",
            ));
            None
        }
    };

    match (details.is_empty(), birth_date) {
        (true, Some(birth_date)) => Ok(NewOwner {
            name: name.to_string(),
            document_number: cpf.code().to_string(),
            birth_date,
        }),
        _ => Err(details),
    }
}

/// Validate an account-creation payload. Returns the account input plus
/// the normalized owner document numbers.
pub fn validate_new_account(
    payload: &CreateAccountRequest,
) -> Result<(NewAccount, Vec<String>), Vec<FieldError>> {
    let mut details = Vec::new();

    let account_type = AccountType::from_str(&payload.account_type);
    if account_type.is_none() {
        details.push(FieldError::new(
            "type",
            "type must be one of corrente, poupanca, salario, conjunta",
        ));
    }

    if payload.balance < Decimal::ZERO {
        details.push(FieldError::new(
            "balance",
            "balance must be greater than or equal to zero",
        ));
    }

    if let Some(limit) = payload.daily_withdrawal_limit {
        if limit <= Decimal::ZERO {
            details.push(FieldError::new(
                "dailyWithdrawalLimit",
                "dailyWithdrawalLimit must be greater than zero",
            ));
        }
    }

    let mut document_numbers = Vec::with_capacity(payload.document_numbers.len());
    if payload.document_numbers.is_empty() {
        details.push(FieldError::new(
            "documentNumbers",
            "documentNumbers must have at least one entry",
        ));
    }
    for document_number in &payload.document_numbers {
        let cpf = Cpf::new(document_number);
        if cpf.is_valid() {
            document_numbers.push(cpf.code().to_string());
        } else {
            details.push(FieldError::new(
                "documentNumbers",
                format!("{document_number} is not a valid CPF"),
            ));
        }
    }

    match (details.is_empty(), account_type) {
        (true, Some(account_type)) => Ok((
            NewAccount {
                balance: payload.balance,
                daily_withdrawal_limit: payload.daily_withdrawal_limit,
                account_type,
                is_active: true,
            },
            document_numbers,
        )),
        _ => Err(details),
    }
}

/// Validate a balance-mutation amount.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, Vec<FieldError>> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(vec![FieldError::new(
            "amount",
            "amount must be greater than zero",
        )])
    }
}

/// Validate the statement query. All three parameters are required and
/// must be at least one.
pub fn validate_statement_query(
    query: &StatementQuery,
) -> Result<(u64, u64, u64), Vec<FieldError>> {
    let mut details = Vec::new();

    let mut require_positive = |attribute: &str, value: Option<i64>| -> Option<u64> {
        match value {
            Some(value) if value >= 1 => Some(value as u64),
            Some(_) => {
                details.push(FieldError::new(
                    attribute,
                    format!("{attribute} must be greater than zero"),
                ));
                None
            }
            None => {
                details.push(FieldError::new(attribute, format!("{attribute} is required")));
                None
            }
        }
    };

    let period = require_positive("period", query.period);
    let page = require_positive("page", query.page);
    let items_per_page = require_positive("itemsPerPage", query.items_per_page);

    match (period, page, items_per_page) {
        (Some(period), Some(page), Some(items_per_page)) => Ok((period, page, items_per_page)),
        _ => Err(details),
    }
}
