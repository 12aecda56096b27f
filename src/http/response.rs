//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map gateway failures to HTTP status codes
//! - Strip hop-by-hop headers from forwarded messages
//!
//! # Design Decisions
//! - Routing rejections share one body per status so a malformed path and an
//!   unknown service look the same to the client
//! - Backend timeouts result in 504 Gateway Timeout
//! - Plain-text bodies

use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use thiserror::Error;

use crate::load_balancer::SelectError;
use crate::registry::RegistryError;
use crate::routing::RejectReason;

/// Everything a gateway handler can fail with.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("request rejected: {0}")]
    Rejected(RejectReason),

    #[error("{0}")]
    Unavailable(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream did not answer within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("too many in-flight requests")]
    Overloaded,
}

impl From<SelectError> for GatewayError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::NoInstances(_) => GatewayError::Unavailable(err.to_string()),
            SelectError::Registry(e) => GatewayError::Registry(e),
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Registry(_) | GatewayError::Template(_) | GatewayError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Rejected(reason) => reason.status(),
            GatewayError::Unavailable(_) | GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            GatewayError::BadRequest(msg) | GatewayError::NotFound(msg) | GatewayError::Unavailable(msg) => {
                msg.clone()
            }
            GatewayError::Registry(e) => e.to_string(),
            // Routing and transport details stay in the logs.
            _ => status.canonical_reason().unwrap_or("Error").to_string(),
        };
        (status, body).into_response()
    }
}

/// Headers that describe one connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}
