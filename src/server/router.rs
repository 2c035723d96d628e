//! Route table

use super::handlers::{
    create_invoice, delete_invoice, get_invoice, health_check, list_invoices, list_logs,
    update_invoice, verify_invoice,
};
use super::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build every route of the service
///
/// - GET /health, /healthz - Liveness
/// - GET /api/verify?invoice_number= - Public lookup (logged)
/// - GET, POST /admin/invoices - List / create
/// - GET, PUT, DELETE /admin/invoices/{id} - Read / replace / remove
/// - GET /admin/logs - Recent lookups
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/api/verify", get(verify_invoice))
        .route("/admin/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/admin/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/admin/logs", get(list_logs))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
