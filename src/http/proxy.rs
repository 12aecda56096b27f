//! Forwarding of routed requests to backend nodes.
//!
//! Everything not claimed by a dashboard route lands here: the path is
//! routed, then either streamed to the chosen node or answered with the
//! rejection's status.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request, Uri};
use axum::response::{IntoResponse, Response};
use std::net::IpAddr;
use std::time::Instant;
use tokio::time::timeout;

use crate::http::request::{client_ip, request_id};
use crate::http::response::{strip_hop_by_hop, GatewayError};
use crate::http::server::AppState;
use crate::routing::{RouteDecision, RouteTarget};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Fallback handler: route by path, then forward or reject.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let path = request.uri().path().to_string();

    match state.router.route(&path).await {
        RouteDecision::Reject(reason) => {
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                reason = reason.kind(),
                detail = %reason,
                "Request rejected"
            );
            GatewayError::Rejected(reason).into_response()
        }
        RouteDecision::Forward(target) => {
            tracing::debug!(
                request_id = %request_id,
                service = %target.service,
                address = %target.address,
                path = %target.path,
                "Forwarding request"
            );
            match forward(&state, &target, request).await {
                Ok(response) => {
                    tracing::info!(
                        request_id = %request_id,
                        service = %target.service,
                        address = %target.address,
                        status = response.status().as_u16(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Request forwarded"
                    );
                    response
                }
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        service = %target.service,
                        address = %target.address,
                        error = %e,
                        "Upstream error"
                    );
                    e.into_response()
                }
            }
        }
    }
}

/// Rewrite `request` for `target` and stream it there.
async fn forward(state: &AppState, target: &RouteTarget, request: Request<Body>) -> Result<Response, GatewayError> {
    let peer = client_ip(&request);
    let (parts, body) = request.into_parts();

    let uri: Uri = target
        .uri(parts.uri.query())
        .parse()
        .map_err(|e| GatewayError::Upstream(format!("invalid upstream uri: {e}")))?;

    let mut headers = parts.headers;
    rewrite_headers(&mut headers, target, &state.base_path_header, peer)?;

    let mut upstream = Request::new(body);
    *upstream.method_mut() = parts.method;
    *upstream.uri_mut() = uri;
    *upstream.headers_mut() = headers;

    send(state, upstream).await
}

/// Send one request upstream, bounded by the forward timeout.
pub(crate) async fn send(state: &AppState, request: Request<Body>) -> Result<Response, GatewayError> {
    let response = timeout(state.forward_timeout, state.client.request(request))
        .await
        .map_err(|_| GatewayError::UpstreamTimeout(state.forward_timeout))?
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}

fn rewrite_headers(
    headers: &mut HeaderMap,
    target: &RouteTarget,
    base_path_header: &header::HeaderName,
    peer: Option<IpAddr>,
) -> Result<(), GatewayError> {
    strip_hop_by_hop(headers);

    let host = HeaderValue::from_str(&target.address)
        .map_err(|_| GatewayError::Upstream(format!("invalid node address {:?}", target.address)))?;
    headers.insert(header::HOST, host);

    // The token already passed validation, so this cannot fail in practice.
    let base = HeaderValue::from_str(&target.base_path)
        .map_err(|_| GatewayError::Upstream(format!("invalid base path {:?}", target.base_path)))?;
    headers.insert(base_path_header.clone(), base);

    if let Some(ip) = peer {
        let forwarded = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(prior) if !prior.is_empty() => format!("{prior}, {ip}"),
            _ => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&forwarded) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    Ok(())
}
