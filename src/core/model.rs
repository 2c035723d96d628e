//! Invoice and verification-log records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bank-account details registered for one invoice number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub beneficiary_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record of one lookup attempt
///
/// `invoice_number` is whatever was asked for; it need not match an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct VerificationLogEntry {
    pub id: i64,
    pub invoice_number: String,
    pub ip_address: String,
    pub verified_at: DateTime<Utc>,
}

/// Sanitized invoice fields, as produced by the creation guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    pub invoice_number: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub beneficiary_name: Option<String>,
}

impl InvoiceInput {
    pub fn new(
        invoice_number: impl Into<String>,
        bank_name: impl Into<String>,
        bank_account_number: impl Into<String>,
        beneficiary_name: Option<String>,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            bank_name: bank_name.into(),
            bank_account_number: bank_account_number.into(),
            beneficiary_name,
        }
    }
}
