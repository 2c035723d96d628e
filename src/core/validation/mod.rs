//! Input sanitization and format validation
//!
//! Both halves are pure functions. Guards in [`crate::core::guard`] combine
//! them: format checks run on the raw value, sanitization runs afterwards on
//! the value that is handed downstream.

pub mod filters;
pub mod validators;

pub use filters::{MAX_FIELD_LENGTH, sanitize, sanitize_optional, sanitize_value};
pub use validators::{is_non_blank, is_valid_invoice_number, is_valid_invoice_number_value};
