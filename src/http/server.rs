//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with dashboard handlers and the proxy fallback
//! - Wire up middleware (request ID, tracing, timeout, in-flight limit)
//! - Bind server to listener
//! - Stop on shutdown broadcast or OS signal, draining in-flight requests

use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::routing::{get, post};
use axum::Router;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tera::Tera;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::middleware::{limit_middleware, InFlightLimit};
use crate::http::request::{request_id, UuidRequestId};
use crate::http::response::GatewayError;
use crate::http::{pages, proxy, rpc, templates};
use crate::lifecycle::shutdown_signal;
use crate::load_balancer::{RegistrySelector, Selector};
use crate::registry::Directory;
use crate::routing::ServiceRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ServiceRouter>,
    pub directory: Arc<dyn Directory>,
    pub selector: Arc<dyn Selector>,
    pub client: Client<HttpConnector, Body>,
    pub templates: Arc<Tera>,
    pub base_path_header: HeaderName,
    pub server_name: String,
    pub namespace: String,
    pub lookup_timeout: Duration,
    pub forward_timeout: Duration,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server over `directory`.
    pub fn new(config: GatewayConfig, directory: Arc<dyn Directory>) -> Result<Self, GatewayError> {
        let selector: Arc<dyn Selector> = Arc::new(RegistrySelector::new(
            directory.clone(),
            config.selector.strategy.build(),
        ));
        Self::with_selector(config, directory, selector)
    }

    /// Create a server with a caller-supplied selector.
    pub fn with_selector(
        config: GatewayConfig,
        directory: Arc<dyn Directory>,
        selector: Arc<dyn Selector>,
    ) -> Result<Self, GatewayError> {
        let base_path_header = HeaderName::from_bytes(config.server.base_path_header.as_bytes())
            .map_err(|e| GatewayError::Config(format!("base_path_header: {e}")))?;

        let router = Arc::new(ServiceRouter::new(
            config.server.namespace.clone(),
            selector.clone(),
            config.timeouts.lookup(),
        ));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            router,
            directory,
            selector,
            client,
            templates: Arc::new(templates::load()?),
            base_path_header,
            server_name: config.server.name.clone(),
            namespace: config.server.namespace.clone(),
            lookup_timeout: config.timeouts.lookup(),
            forward_timeout: config.timeouts.forward(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let limit = InFlightLimit::new(config.server.max_connections);

        Router::new()
            .route("/", get(pages::index))
            .route("/registry", get(pages::registry))
            .route("/client", get(pages::client))
            .route("/terminal", get(pages::terminal))
            .route("/rpc", post(rpc::rpc_handler))
            .route("/favicon.ico", get(pages::favicon))
            .fallback(proxy::proxy_handler)
            .with_state(state)
            .layer(axum::middleware::from_fn_with_state(limit, limit_middleware))
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request.headers()),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            namespace = %self.config.server.namespace,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown broadcast received"),
                    _ = shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
