//! HTTP handlers for lookup and admin routes
//!
//! Handlers receive already-guarded input from the extractors in
//! [`crate::core`] and return [`VerifyError`] for every failure.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::client_ip::ClientIp;
use super::state::AppState;
use crate::core::{
    AdminAccess, AdminInvoiceRequest, AdminKeyRequest, Invoice, InvoiceSearch,
    VerificationLogEntry, VerifyError, VerifyResult,
};

/// Health check endpoint handler
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-verify"
    }))
}

/// `GET /api/verify?invoice_number=`
///
/// Every well-formed lookup is written to the verification log before the
/// invoice is fetched, so misses are audited too.
pub async fn verify_invoice(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    InvoiceSearch(invoice_number): InvoiceSearch,
) -> VerifyResult<Json<Value>> {
    state.store.append_log(&invoice_number, &ip).await?;

    let invoice = state
        .store
        .get_by_number(&invoice_number)
        .await?
        .ok_or_else(|| VerifyError::invoice_not_found(&invoice_number))?;

    tracing::debug!(invoice_id = invoice.id, "invoice verified");

    Ok(Json(json!({
        "found": true,
        "invoice": invoice
    })))
}

/// `GET /admin/invoices`
pub async fn list_invoices(
    State(state): State<AppState>,
    _admin: AdminAccess,
) -> VerifyResult<Json<Vec<Invoice>>> {
    Ok(Json(state.store.list_all().await?))
}

/// `POST /admin/invoices`
pub async fn create_invoice(
    State(state): State<AppState>,
    request: AdminInvoiceRequest,
) -> VerifyResult<(StatusCode, Json<Invoice>)> {
    let input = request.input;

    // Early answer for the common case; the store still enforces uniqueness.
    if state.store.exists(&input.invoice_number).await? {
        return Err(VerifyError::ConstraintViolation {
            invoice_number: input.invoice_number,
        });
    }

    let invoice = state.store.create(&input).await?;
    tracing::info!(invoice_id = invoice.id, "invoice created");

    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `GET /admin/invoices/{id}`
pub async fn get_invoice(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path(id): Path<String>,
) -> VerifyResult<Json<Invoice>> {
    let id = parse_id(&id)?;
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| VerifyError::invoice_not_found(id))
}

/// `PUT /admin/invoices/{id}`
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: AdminInvoiceRequest,
) -> VerifyResult<Json<Invoice>> {
    let id = parse_id(&id)?;
    let invoice = state
        .store
        .update(id, &request.input)
        .await?
        .ok_or_else(|| VerifyError::invoice_not_found(id))?;

    tracing::info!(invoice_id = invoice.id, "invoice updated");
    Ok(Json(invoice))
}

/// `DELETE /admin/invoices/{id}`
///
/// The key may come from the query or from a form/JSON body.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _admin: AdminKeyRequest,
) -> VerifyResult<Json<Invoice>> {
    let id = parse_id(&id)?;
    let invoice = state
        .store
        .delete(id)
        .await?
        .ok_or_else(|| VerifyError::invoice_not_found(id))?;

    tracing::info!(invoice_id = invoice.id, "invoice deleted");
    Ok(Json(invoice))
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    limit: Option<String>,
}

/// `GET /admin/logs?limit=`
pub async fn list_logs(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Query(query): Query<LogQuery>,
) -> VerifyResult<Json<Vec<VerificationLogEntry>>> {
    let requested = match query.limit.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.trim().parse::<u32>().map_err(|_| {
            VerifyError::InvalidFormat {
                field: "limit".to_string(),
            }
        })?),
    };
    let limit = state.log_limits.resolve(requested);

    Ok(Json(state.store.list_logs(limit).await?))
}

/// Path ids are parsed after the admin gate has run
fn parse_id(raw: &str) -> VerifyResult<i64> {
    raw.parse().map_err(|_| VerifyError::InvalidFormat {
        field: "id".to_string(),
    })
}
