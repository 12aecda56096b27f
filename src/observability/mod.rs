//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (service, address, request_id)
//!     → tower-http TraceLayer spans per request
//!
//! logging.rs:
//!     → EnvFilter (RUST_LOG or configured level)
//!     → pretty or JSON formatter on stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows from the edge to the backend
//! - No metrics exporter

pub mod logging;

pub use logging::init_logging;
