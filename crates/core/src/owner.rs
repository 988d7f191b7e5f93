//! # Owner Module
//!
//! An Owner is the person behind one or more accounts, identified uniquely
//! by a CPF document number. Owners are immutable after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An account owner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Synthetic identifier assigned at creation
    pub id: i64,
    /// Full name
    pub name: String,
    /// Normalized CPF, globally unique
    pub document_number: String,
    /// Birth date (short ISO-8601, `yyyy-MM-dd`)
    pub birth_date: NaiveDate,
}

/// Input for owner creation; the identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOwner {
    pub name: String,
    pub document_number: String,
    pub birth_date: NaiveDate,
}
