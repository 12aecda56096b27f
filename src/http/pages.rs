//! Dashboard pages: web service index, registry browser, call console.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tera::Context;

use crate::http::request::wants_json;
use crate::http::response::GatewayError;
use crate::http::server::AppState;
use crate::registry::{Endpoint, Node, Service};
use crate::render::Renderer;

#[derive(Debug, Serialize)]
struct ServicesBody {
    services: Vec<Service>,
}

#[derive(Debug, Deserialize)]
pub struct RegistryQuery {
    pub service: Option<String>,
}

#[derive(Debug, Serialize)]
struct VersionView {
    version: String,
    metadata: BTreeMap<String, String>,
    nodes: Vec<Node>,
    endpoints: Vec<EndpointView>,
}

#[derive(Debug, Serialize)]
struct EndpointView {
    name: String,
    request: String,
    response: String,
}

#[derive(Debug, Serialize)]
struct ClientService {
    name: String,
    endpoints: Vec<EndpointView>,
}

fn base_context(state: &AppState) -> Context {
    let mut context = Context::new();
    context.insert("server_name", &state.server_name);
    context.insert("namespace", &state.namespace);
    context
}

fn render_page(state: &AppState, template: &str, context: &Context) -> Result<Response, GatewayError> {
    Ok(Html(state.templates.render(template, context)?).into_response())
}

/// Example documents for one endpoint. Request and response share a
/// renderer so message types seen in the request are reused.
fn endpoint_view(service: &str, endpoint: &Endpoint) -> EndpointView {
    let mut renderer = Renderer::new();
    let request = renderer.render(endpoint.request.as_ref());
    let response = renderer.render(endpoint.response.as_ref());

    for warning in renderer.warnings() {
        tracing::warn!(service = %service, endpoint = %endpoint.name, warning = %warning, "Endpoint schema anomaly");
    }

    EndpointView {
        name: endpoint.name.clone(),
        request,
        response,
    }
}

/// Web services under the namespace, with the prefix stripped.
fn web_services(namespace: &str, services: &[Service]) -> Vec<String> {
    let prefix = format!("{namespace}.");
    let mut names: Vec<String> = services
        .iter()
        .filter_map(|s| s.name.strip_prefix(&prefix))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Result<Response, GatewayError> {
    let services = state.directory.list_services().await?;

    let mut context = base_context(&state);
    context.insert("services", &web_services(&state.namespace, &services));
    render_page(&state, "index.html", &context)
}

/// `GET /registry[?service=NAME]`
pub async fn registry(
    State(state): State<AppState>,
    Query(query): Query<RegistryQuery>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let json = wants_json(&headers);

    let Some(name) = query.service.filter(|s| !s.is_empty()) else {
        let services = state.directory.list_services().await?;
        if json {
            return Ok(Json(ServicesBody { services }).into_response());
        }
        let mut context = base_context(&state);
        context.insert("services", &services);
        return render_page(&state, "registry.html", &context);
    };

    let versions = state.directory.get_service(&name).await?;
    if versions.is_empty() {
        return Err(GatewayError::NotFound(format!("service {name} not found")));
    }

    if json {
        return Ok(Json(ServicesBody { services: versions }).into_response());
    }

    let views: Vec<VersionView> = versions
        .into_iter()
        .map(|service| VersionView {
            endpoints: service.endpoints.iter().map(|e| endpoint_view(&name, e)).collect(),
            version: service.version,
            metadata: service.metadata,
            nodes: service.nodes,
        })
        .collect();

    let mut context = base_context(&state);
    context.insert("name", &name);
    context.insert("versions", &views);
    render_page(&state, "service.html", &context)
}

/// `GET /client`
pub async fn client(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, GatewayError> {
    let listed = state.directory.list_services().await?;

    let mut services = Vec::with_capacity(listed.len());
    for entry in &listed {
        match state.directory.get_service(&entry.name).await {
            Ok(mut versions) if !versions.is_empty() => services.push(versions.swap_remove(0)),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(service = %entry.name, error = %e, "Skipping service in call console");
            }
        }
    }

    if wants_json(&headers) {
        return Ok(Json(ServicesBody { services }).into_response());
    }

    let views: Vec<ClientService> = services
        .iter()
        .map(|service| ClientService {
            name: service.name.clone(),
            endpoints: service
                .endpoints
                .iter()
                .map(|e| endpoint_view(&service.name, e))
                .collect(),
        })
        .collect();

    let mut context = base_context(&state);
    context.insert("services", &views);
    render_page(&state, "client.html", &context)
}

/// `GET /terminal`
pub async fn terminal(State(state): State<AppState>) -> Result<Response, GatewayError> {
    render_page(&state, "terminal.html", &base_context(&state))
}

/// `GET /favicon.ico`
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
