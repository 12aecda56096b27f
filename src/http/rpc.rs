//! Generic RPC invocation for the call console and terminal.
//!
//! `POST /rpc` with `{service, endpoint, request, address?}` is translated to
//! a JSON-over-HTTP call `POST http://{node}/{Handler}/{Method}` on one node
//! of the service. The backend's status and body are relayed as-is.

use axum::body::Body;
use axum::extract::{FromRequest, State};
use axum::http::{header, HeaderValue, Method, Request, Uri};
use axum::response::Response;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::time::timeout;

use crate::http::proxy::send;
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::http::response::GatewayError;
use crate::http::server::AppState;

/// Body of a `/rpc` call, JSON or form encoded.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RpcRequest {
    pub service: String,
    /// `Handler.Method`, e.g. `Say.Hello`.
    pub endpoint: String,
    /// Either a JSON object or a string holding one.
    pub request: JsonValue,
    /// Call this node instead of selecting one.
    pub address: Option<String>,
}

impl RpcRequest {
    fn validate(&self) -> Result<(), GatewayError> {
        if self.service.trim().is_empty() {
            return Err(GatewayError::BadRequest("missing service".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(GatewayError::BadRequest("missing endpoint".into()));
        }
        Ok(())
    }

    /// The request payload as JSON text.
    fn payload(&self) -> Result<String, GatewayError> {
        match &self.request {
            JsonValue::Null => Ok("{}".to_string()),
            JsonValue::String(s) if s.trim().is_empty() => Ok("{}".to_string()),
            JsonValue::String(s) => {
                let parsed: JsonValue = serde_json::from_str(s)
                    .map_err(|e| GatewayError::BadRequest(format!("request is not valid JSON: {e}")))?;
                Ok(parsed.to_string())
            }
            other => Ok(other.to_string()),
        }
    }
}

/// `Say.Hello` -> `/Say/Hello`.
pub fn endpoint_path(endpoint: &str) -> String {
    format!("/{}", endpoint.trim_matches('.').replace('.', "/"))
}

/// `POST /rpc`
pub async fn rpc_handler(State(state): State<AppState>, request: Request<Body>) -> Result<Response, GatewayError> {
    let request_id = request_id(request.headers()).to_string();
    let call = parse_body(request).await?;
    call.validate()?;
    let payload = call.payload()?;

    let address = match call.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(address) => address.to_string(),
        None => {
            let node = timeout(state.lookup_timeout, state.selector.select(&call.service))
                .await
                .map_err(|_| GatewayError::UpstreamTimeout(state.lookup_timeout))??;
            node.address
        }
    };

    let uri: Uri = format!("http://{}{}", address, endpoint_path(&call.endpoint))
        .parse()
        .map_err(|e| GatewayError::BadRequest(format!("invalid address {address:?}: {e}")))?;

    tracing::info!(
        request_id = %request_id,
        service = %call.service,
        endpoint = %call.endpoint,
        address = %address,
        "RPC call"
    );

    let mut upstream = Request::new(Body::from(payload));
    *upstream.method_mut() = Method::POST;
    *upstream.uri_mut() = uri;
    let headers = upstream.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(X_REQUEST_ID, value);
    }

    send(&state, upstream).await
}

async fn parse_body(request: Request<Body>) -> Result<RpcRequest, GatewayError> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        let Form(call) = Form::<RpcRequest>::from_request(request, &())
            .await
            .map_err(|e| GatewayError::BadRequest(e.body_text()))?;
        Ok(call)
    } else {
        let Json(call) = Json::<RpcRequest>::from_request(request, &())
            .await
            .map_err(|e| GatewayError::BadRequest(e.body_text()))?;
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_path() {
        assert_eq!(endpoint_path("Say.Hello"), "/Say/Hello");
        assert_eq!(endpoint_path("Greeter.Say.Hello"), "/Greeter/Say/Hello");
        assert_eq!(endpoint_path("Ping"), "/Ping");
    }

    #[test]
    fn test_payload_forms() {
        let mut call = RpcRequest {
            service: "go.micro.srv.greeter".into(),
            endpoint: "Say.Hello".into(),
            ..RpcRequest::default()
        };
        assert_eq!(call.payload().unwrap(), "{}");

        call.request = json!({"name": "John"});
        assert_eq!(call.payload().unwrap(), r#"{"name":"John"}"#);

        call.request = json!(r#"{ "name": "John" }"#);
        assert_eq!(call.payload().unwrap(), r#"{"name":"John"}"#);

        call.request = json!("{not json");
        assert!(matches!(call.payload(), Err(GatewayError::BadRequest(_))));
    }

    #[test]
    fn test_validate() {
        let call = RpcRequest {
            endpoint: "Say.Hello".into(),
            ..RpcRequest::default()
        };
        assert!(matches!(call.validate(), Err(GatewayError::BadRequest(m)) if m == "missing service"));

        let call = RpcRequest {
            service: "go.micro.srv.greeter".into(),
            ..RpcRequest::default()
        };
        assert!(matches!(call.validate(), Err(GatewayError::BadRequest(m)) if m == "missing endpoint"));
    }

    #[tokio::test]
    async fn test_parse_form_body() {
        let request = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("service=go.micro.srv.greeter&endpoint=Say.Hello&request=%7B%7D"))
            .unwrap();

        let call = parse_body(request).await.unwrap();
        assert_eq!(call.service, "go.micro.srv.greeter");
        assert_eq!(call.endpoint, "Say.Hello");
        assert_eq!(call.payload().unwrap(), "{}");
    }
}
