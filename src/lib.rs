//! # invoice-verify
//!
//! Public lookup of the bank-account details registered for an invoice
//! number, plus an admin surface for maintaining those records.
//!
//! ## Features
//!
//! - **Guarded lookups**: invoice numbers are format-checked before they reach storage
//! - **Audit trail**: every well-formed lookup is recorded with the caller's address
//! - **Shared-secret admin**: create, update, delete and list invoices and logs
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_verify::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryRecordStore::new())
//!     .with_admin_key("s3cr3t")
//!     .build()?;
//!
//! // GET /api/verify?invoice_number=INV-001
//! // POST /admin/invoices?key=s3cr3t  {"invoice_number": "INV-001", ...}
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AdminAccess, AdminGate, AdminInvoiceRequest, AdminKeyRequest, FieldError, FieldErrorCode,
        Invoice, InvoiceInput, InvoiceSearch, KeySource, RecordStore, VerificationLogEntry,
        VerifyError, VerifyResult, search_guard, validate_invoice_payload,
    };
    pub use crate::core::validation::{is_valid_invoice_number, sanitize};

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresRecordStore;

    // === Config ===
    pub use crate::config::{AppConfig, ConfigError, LogConfig};

    // === Server ===
    pub use crate::server::{AppState, ClientIp, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
