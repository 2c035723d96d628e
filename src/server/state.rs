//! Shared state handed to every route

use crate::config::LogConfig;
use crate::core::{AdminGate, RecordStore};
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state cloned into each handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub admin: AdminGate,
    pub log_limits: LogConfig,
}

impl FromRef<AppState> for AdminGate {
    fn from_ref(state: &AppState) -> Self {
        state.admin.clone()
    }
}
