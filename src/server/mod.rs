//! HTTP layer: state, extractors, handlers and the server builder
//!
//! Routes:
//! - `/api/verify` for public lookups, each one written to the verification log
//! - `/admin/invoices` and `/admin/logs`, gated by the shared admin secret

pub mod builder;
pub mod client_ip;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use client_ip::ClientIp;
pub use router::build_routes;
pub use state::AppState;
