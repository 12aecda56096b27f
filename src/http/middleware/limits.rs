//! In-flight request limit.
//!
//! Requests beyond `max_connections` are turned away with 503 instead of
//! queueing; the permit is held until the handler has produced a response.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::http::response::GatewayError;

/// Shared permit pool for the limit middleware.
#[derive(Debug, Clone)]
pub struct InFlightLimit {
    permits: Arc<Semaphore>,
    max: usize,
}

impl InFlightLimit {
    pub fn new(max: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max)),
            max,
        }
    }

    /// Requests currently being served.
    pub fn in_flight(&self) -> usize {
        self.max - self.permits.available_permits()
    }
}

pub async fn limit_middleware(
    State(limit): State<InFlightLimit>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Ok(_permit) = limit.permits.clone().try_acquire_owned() else {
        tracing::warn!(max = limit.max, path = %request.uri().path(), "In-flight limit reached");
        return GatewayError::Overloaded.into_response();
    };
    next.run(request).await
}
