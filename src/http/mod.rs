//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, client address)
//!     → reserved path? pages.rs / rpc.rs
//!     → otherwise proxy.rs
//!         → routing layer decides target
//!         → response.rs (error mapping, hop-by-hop stripping)
//!     → Send to client
//! ```

pub mod middleware;
pub mod pages;
pub mod proxy;
pub mod request;
pub mod response;
pub mod rpc;
pub mod server;
pub mod templates;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::GatewayError;
pub use server::{AppState, HttpServer};
