//! Admin authorization
//!
//! A single shared secret gates every admin operation. The secret is handed
//! to [`AdminGate`] at construction; nothing here reads process state.
//!
//! Callers may send the secret as the query parameter `key` or as the body
//! field `key`. When both are present the query parameter is the one checked.

use axum::extract::{FromRef, FromRequestParts, Query};
use axum::http::request::Parts;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::VerifyError;

/// Name of the request parameter / body field carrying the admin secret
pub const ADMIN_KEY_PARAM: &str = "key";

/// Where the honoured admin key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Query,
    Body,
}

/// Shared-secret check for admin routes
#[derive(Clone)]
pub struct AdminGate {
    secret: Arc<str>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

impl AdminGate {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check the supplied key(s) against the configured secret.
    ///
    /// The query key wins whenever it is present, even if the body key is the
    /// correct one. Returns the source that was checked.
    pub fn authorize(
        &self,
        query_key: Option<&str>,
        body_key: Option<&str>,
    ) -> Result<KeySource, VerifyError> {
        let (candidate, source) = match (query_key, body_key) {
            (Some(query), body) => {
                if body.is_some_and(|b| b != query) {
                    tracing::debug!("admin key in query and body differ; using query");
                }
                (query, KeySource::Query)
            }
            (None, Some(body)) => (body, KeySource::Body),
            (None, None) => {
                tracing::warn!("admin request without key");
                return Err(VerifyError::AccessDenied);
            }
        };

        if candidate == &*self.secret {
            Ok(source)
        } else {
            tracing::warn!(source = ?source, "admin request with wrong key");
            Err(VerifyError::AccessDenied)
        }
    }
}

/// Read the `key` query parameter without failing on other parameters
pub(crate) fn query_key(parts: &Parts) -> Option<String> {
    Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(mut params)| params.remove(ADMIN_KEY_PARAM))
}

/// Extractor for admin routes without a body
///
/// Only the query parameter is consulted. Routes with a body use
/// [`AdminInvoiceRequest`](crate::core::guard::AdminInvoiceRequest) instead.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl<S> FromRequestParts<S> for AdminAccess
where
    S: Send + Sync,
    AdminGate: FromRef<S>,
{
    type Rejection = VerifyError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AdminGate::from_ref(state);
        gate.authorize(query_key(parts).as_deref(), None)?;
        Ok(AdminAccess)
    }
}
