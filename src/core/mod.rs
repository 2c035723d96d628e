//! Core module: records, storage contract, guards and errors

pub mod auth;
pub mod error;
pub mod guard;
pub mod model;
pub mod store;
pub mod validation;

pub use auth::{AdminAccess, AdminGate, KeySource};
pub use error::{FieldError, FieldErrorCode, VerifyError, VerifyResult};
pub use guard::{
    AdminInvoiceRequest, AdminKeyRequest, InvoiceSearch, search_guard, validate_invoice_payload,
};
pub use model::{Invoice, InvoiceInput, VerificationLogEntry};
pub use store::RecordStore;
