//! Service gateway library.
//!
//! Path-based reverse proxy over a service directory, plus the dashboard
//! that renders example payloads from endpoint schemas.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod registry;
pub mod render;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteDecision, RouteTarget, ServiceRouter};
