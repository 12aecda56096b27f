//! Service route resolution.
//!
//! # Responsibilities
//! - Turn an inbound path into a routing decision
//! - Resolve `namespace.token` to one live node through the selector
//! - Report every failure as an explicit rejection reason
//!
//! # Design Decisions
//! - Path validation happens before any lookup
//! - Lookup is bounded by a timeout; expiry is its own rejection
//! - One selection per request, no retries

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::load_balancer::{SelectError, Selector};
use crate::routing::matcher::parse_service_path;
use crate::routing::{RejectReason, RouteDecision, RouteTarget};

/// Resolves inbound paths to backend targets.
pub struct ServiceRouter {
    namespace: String,
    selector: Arc<dyn Selector>,
    lookup_timeout: Duration,
}

impl ServiceRouter {
    pub fn new(namespace: impl Into<String>, selector: Arc<dyn Selector>, lookup_timeout: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            selector,
            lookup_timeout,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full service name for a path token.
    pub fn service_name(&self, token: &str) -> String {
        format!("{}.{}", self.namespace, token)
    }

    /// Decide where `path` goes.
    pub async fn route(&self, path: &str) -> RouteDecision {
        let parsed = match parse_service_path(path) {
            Ok(parsed) => parsed,
            Err(reason) => return RouteDecision::Reject(reason),
        };

        let service = self.service_name(parsed.token);

        let node = match timeout(self.lookup_timeout, self.selector.select(&service)).await {
            Ok(Ok(node)) => node,
            Ok(Err(SelectError::NoInstances(name))) => {
                return RouteDecision::Reject(RejectReason::NoInstances(name));
            }
            Ok(Err(SelectError::Registry(e))) => {
                return RouteDecision::Reject(RejectReason::Lookup {
                    service,
                    error: e.to_string(),
                });
            }
            Err(_) => {
                return RouteDecision::Reject(RejectReason::LookupTimeout {
                    service,
                    after: self.lookup_timeout,
                });
            }
        };

        RouteDecision::Forward(RouteTarget {
            base_path: parsed.base_path(),
            path: parsed.rest,
            address: node.address,
            service,
        })
    }
}
