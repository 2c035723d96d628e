//! Client address resolution for the verification log

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Recorded when no address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Longest address kept, in characters; matches `verification_logs.ip_address`
pub const MAX_CLIENT_IP_LENGTH: usize = 64;

/// Best-effort client address
///
/// Resolution order: first non-empty `X-Forwarded-For` entry, `X-Real-IP`,
/// the socket peer address, then [`UNKNOWN_CLIENT`]. The headers are
/// caller-controlled, so the value is for auditing only and is cut to
/// [`MAX_CLIENT_IP_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').map(str::trim).find(|entry| !entry.is_empty()));

        let real_ip = || {
            headers
                .get(REAL_IP)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let ip = forwarded
            .or_else(real_ip)
            .map(|v| v.chars().take(MAX_CLIENT_IP_LENGTH).collect::<String>())
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

        ClientIp(ip)
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::resolve(&parts.headers, peer))
    }
}
