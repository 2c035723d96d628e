//! Shared test harness for storage backend testing
//!
//! Provides invoice fixtures and two macros:
//! - `record_store_tests!` validates any `RecordStore` against its contract
//! - `rest_integration_tests!` drives the same store through the HTTP routes
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! record_store_tests!(InMemoryRecordStore::new());
//! rest_integration_tests!(InMemoryRecordStore::new());
//! ```

#![allow(dead_code)]


#[macro_use]
pub mod rest_tests;

use invoice_verify::core::InvoiceInput;
use serde_json::{Value, json};

/// Admin secret used by every REST test server
pub const TEST_ADMIN_KEY: &str = "s3cr3t";

/// Sanitized input with fixed bank details
pub fn invoice_input(number: &str) -> InvoiceInput {
    InvoiceInput::new(number, "First Bank", "0012345678", Some("Acme Ltd".to_string()))
}

/// Sanitized input with distinct bank details
pub fn invoice_input_with(number: &str, bank: &str, account: &str) -> InvoiceInput {
    InvoiceInput::new(number, bank, account, None)
}

/// JSON body accepted by the admin create/update routes
pub fn invoice_body(number: &str) -> Value {
    json!({
        "invoice_number": number,
        "bank_name": "First Bank",
        "bank_account_number": "0012345678",
        "beneficiary_name": "Acme Ltd"
    })
}
