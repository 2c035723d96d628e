//! Request guards
//!
//! Guards take raw request fields and either produce sanitized data for the
//! handler or stop the request with a [`VerifyError`]. They never touch the
//! store.
//!
//! Format validation always runs on the raw value; sanitization is a second
//! pass over the already-valid value.

use axum::Form;
use axum::Json;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::core::auth::{ADMIN_KEY_PARAM, AdminGate, KeySource, query_key};
use crate::core::error::{FieldError, VerifyError};
use crate::core::model::InvoiceInput;
use crate::core::validation::{
    is_non_blank, is_valid_invoice_number, is_valid_invoice_number_value, sanitize,
    sanitize_optional, sanitize_value,
};

/// Query parameter read by the search guard
pub const SEARCH_PARAM: &str = "invoice_number";

/// Validate and sanitize the invoice number of a lookup request
pub fn search_guard(raw: Option<&str>) -> Result<String, VerifyError> {
    let Some(raw) = raw else {
        return Err(VerifyError::MissingParameter {
            parameter: SEARCH_PARAM.to_string(),
        });
    };

    if !is_valid_invoice_number(Some(raw)) {
        tracing::debug!("rejected malformed invoice number in lookup");
        return Err(VerifyError::InvalidFormat {
            field: SEARCH_PARAM.to_string(),
        });
    }

    Ok(sanitize(raw))
}

/// Validate and sanitize an invoice body for create or update.
///
/// All rules are checked; the error lists every failing field in order
/// `invoice_number`, `bank_name`, `bank_account_number`.
pub fn validate_invoice_payload(payload: &Value) -> Result<InvoiceInput, VerifyError> {
    let invoice_number = field(payload, "invoice_number");
    let bank_name = field(payload, "bank_name");
    let bank_account_number = field(payload, "bank_account_number");

    let mut errors = Vec::new();

    match invoice_number {
        None => errors.push(FieldError::required("invoice_number")),
        Some(v) if !is_valid_invoice_number_value(Some(v)) => {
            errors.push(FieldError::invalid_format("invoice_number"))
        }
        Some(_) => {}
    }
    if !is_non_blank(bank_name) {
        errors.push(FieldError::required("bank_name"));
    }
    if !is_non_blank(bank_account_number) {
        errors.push(FieldError::required("bank_account_number"));
    }

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "invoice payload failed validation");
        return Err(VerifyError::Validation(errors));
    }

    Ok(InvoiceInput {
        invoice_number: invoice_number.map(sanitize_value).unwrap_or_default(),
        bank_name: bank_name.map(sanitize_value).unwrap_or_default(),
        bank_account_number: bank_account_number.map(sanitize_value).unwrap_or_default(),
        beneficiary_name: sanitize_optional(
            field(payload, "beneficiary_name").and_then(Value::as_str),
        ),
    })
}

/// A body field, treating explicit `null` as absent
fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|v| !v.is_null())
}

/// Extractor running [`search_guard`] on the `invoice_number` query parameter
///
/// # Usage
///
/// ```rust,ignore
/// async fn verify(InvoiceSearch(number): InvoiceSearch) { /* number is sanitized */ }
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceSearch(pub String);

impl<S> FromRequestParts<S> for InvoiceSearch
where
    S: Send + Sync,
{
    type Rejection = VerifyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(mut params)| params.remove(SEARCH_PARAM));

        search_guard(raw.as_deref()).map(InvoiceSearch)
    }
}

/// Extractor for admin routes that carry an invoice body
///
/// Runs the admin gate first (query `key`, else body `key`), then the
/// creation guard. Accepts JSON and URL-encoded form bodies.
#[derive(Debug, Clone)]
pub struct AdminInvoiceRequest {
    pub input: InvoiceInput,
    pub key_source: KeySource,
}

impl<S> FromRequest<S> for AdminInvoiceRequest
where
    S: Send + Sync,
    AdminGate: FromRef<S>,
{
    type Rejection = VerifyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (query_key, payload) = decode_body(req, state, true).await;

        let body_key = payload.as_ref().ok().and_then(|v| body_key(v.as_ref()));
        let key_source = AdminGate::from_ref(state).authorize(query_key.as_deref(), body_key)?;

        let payload = payload
            .map_err(|message| VerifyError::InvalidBody { message })?
            .unwrap_or(Value::Null);
        let input = validate_invoice_payload(&payload)?;

        Ok(Self { input, key_source })
    }
}

/// Extractor for admin routes whose optional body carries only the key
///
/// Like [`AdminAccess`](crate::core::auth::AdminAccess) but also honours a
/// `key` field sent in a JSON or form body, as HTML delete forms do. A
/// request without a `Content-Type` is treated as having no body.
#[derive(Debug, Clone, Copy)]
pub struct AdminKeyRequest {
    pub key_source: KeySource,
}

impl<S> FromRequest<S> for AdminKeyRequest
where
    S: Send + Sync,
    AdminGate: FromRef<S>,
{
    type Rejection = VerifyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (query_key, payload) = decode_body(req, state, false).await;

        let body_key = payload.as_ref().ok().and_then(|v| body_key(v.as_ref()));
        let key_source = AdminGate::from_ref(state).authorize(query_key.as_deref(), body_key)?;
        payload.map_err(|message| VerifyError::InvalidBody { message })?;

        Ok(Self { key_source })
    }
}

fn body_key(payload: Option<&Value>) -> Option<&str> {
    payload
        .and_then(|v| v.get(ADMIN_KEY_PARAM))
        .and_then(Value::as_str)
}

/// Split off the query `key` and decode a form or JSON body.
///
/// With `required == false`, a request without `Content-Type` yields
/// `Ok(None)`. Otherwise anything that is not a form is decoded as JSON, so a
/// missing or wrong content type surfaces as the JSON rejection message.
async fn decode_body<S>(
    req: Request,
    state: &S,
    required: bool,
) -> (Option<String>, Result<Option<Value>, String>)
where
    S: Send + Sync,
{
    let (parts, body) = req.into_parts();
    let query_key = query_key(&parts);
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let req = Request::from_parts(parts, body);

    let payload = match content_type.as_deref() {
        None if !required => Ok(None),
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
            Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map(|Form(fields)| Some(form_to_value(fields)))
                .map_err(|e| e.body_text())
        }
        _ => Json::<Value>::from_request(req, state)
            .await
            .map(|Json(value)| Some(value))
            .map_err(|e| e.body_text()),
    };

    (query_key, payload)
}

fn form_to_value(fields: HashMap<String, String>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
    )
}
