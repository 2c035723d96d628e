//! Format validators for request fields

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::filters::MAX_FIELD_LENGTH;

/// Whitelist for invoice numbers: ASCII letters, digits, `_` and `-`
static INVOICE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("invoice number pattern is valid"));

/// Check the shape of an invoice number.
///
/// The value is trimmed first; the remainder must be 1 to 255 characters drawn
/// only from `[A-Za-z0-9_-]`. Any other character rejects the whole token.
pub fn is_valid_invoice_number(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed.chars().count() <= MAX_FIELD_LENGTH
        && INVOICE_NUMBER_PATTERN.is_match(trimmed)
}

/// Same as [`is_valid_invoice_number`] for untyped input; non-strings fail.
pub fn is_valid_invoice_number_value(value: Option<&Value>) -> bool {
    is_valid_invoice_number(value.and_then(Value::as_str))
}

/// Field is present, a string, and not blank after trimming
pub fn is_non_blank(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}
