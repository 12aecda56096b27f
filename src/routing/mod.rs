//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → matcher.rs (split /token/rest, validate token)
//!     → router.rs (namespace.token → selector → node)
//!     → Return: RouteDecision::Forward(target) or RouteDecision::Reject(reason)
//! ```
//!
//! # Design Decisions
//! - A decision is a sum type: a forward always carries a real address
//! - Invalid paths never reach the registry
//! - Every rejection maps to one status code; bodies are uniform

pub mod matcher;
pub mod router;

use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub use router::ServiceRouter;

/// Why a request could not be routed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("malformed path {0:?}")]
    MalformedPath(String),

    #[error("invalid service token {0:?}")]
    InvalidServiceToken(String),

    #[error("no instances available for {0}")]
    NoInstances(String),

    #[error("lookup for {service} failed: {error}")]
    Lookup { service: String, error: String },

    #[error("lookup for {service} timed out after {after:?}")]
    LookupTimeout { service: String, after: Duration },
}

impl RejectReason {
    /// Status returned to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            RejectReason::LookupTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::MalformedPath(_) => "malformed_path",
            RejectReason::InvalidServiceToken(_) => "invalid_token",
            RejectReason::NoInstances(_) => "no_instances",
            RejectReason::Lookup { .. } => "lookup_failed",
            RejectReason::LookupTimeout { .. } => "lookup_timeout",
        }
    }
}

/// Where a routable request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// Fully qualified service name, e.g. `go.micro.web.greeter`.
    pub service: String,
    /// `host:port` of the chosen node.
    pub address: String,
    /// Path to send upstream, prefix stripped.
    pub path: String,
    /// The stripped prefix, e.g. `/greeter`.
    pub base_path: String,
}

impl RouteTarget {
    /// Upstream URI, preserving the original query string.
    pub fn uri(&self, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("http://{}{}?{}", self.address, self.path, q),
            _ => format!("http://{}{}", self.address, self.path),
        }
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Forward(RouteTarget),
    Reject(RejectReason),
}
