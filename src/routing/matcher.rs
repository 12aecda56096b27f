//! Path parsing for service routes.
//!
//! # Responsibilities
//! - Split an inbound path into service token and remainder
//! - Validate the token before any lookup happens
//!
//! # Design Decisions
//! - Pure functions: no I/O, no allocation beyond the result
//! - Token grammar: ASCII letters and digits, inner hyphens allowed

use regex::Regex;
use std::sync::LazyLock;

use crate::routing::RejectReason;

static SERVICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+([A-Za-z0-9-]*[A-Za-z0-9])?$").expect("service token pattern is valid")
});

/// An inbound path split for routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePath<'a> {
    /// First path segment, already validated.
    pub token: &'a str,
    /// Path with the token stripped, always starting with `/`.
    pub rest: String,
}

impl ServicePath<'_> {
    /// The stripped prefix, e.g. `/greeter`.
    pub fn base_path(&self) -> String {
        format!("/{}", self.token)
    }
}

/// Returns true if `token` is usable as the last label of a service name.
pub fn is_service_token(token: &str) -> bool {
    SERVICE_TOKEN.is_match(token)
}

/// Split `/token/rest...` into its parts.
///
/// `/greeter/say/hello` -> token `greeter`, rest `/say/hello`.
pub fn parse_service_path(path: &str) -> Result<ServicePath<'_>, RejectReason> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 2 {
        return Err(RejectReason::MalformedPath(path.to_string()));
    }

    let token = parts[1];
    if !is_service_token(token) {
        return Err(RejectReason::InvalidServiceToken(token.to_string()));
    }

    Ok(ServicePath {
        token,
        rest: format!("/{}", parts[2..].join("/")),
    })
}
