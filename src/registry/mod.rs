//! Service discovery subsystem.
//!
//! # Data Flow
//! ```text
//! [[services]] config table / hot reload
//!     → memory.rs (MemoryDirectory, atomic swap of the service map)
//!     → Directory trait (list_services / get_service)
//!     → consumers: load_balancer selector, dashboard pages, RPC console
//! ```
//!
//! # Design Decisions
//! - Read-only from the gateway's point of view; storage and consistency
//!   belong to whoever feeds the directory
//! - Lookups are async so a networked registry can slot in behind the trait
//! - Unknown service is an empty result, not an error

pub mod memory;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryDirectory;
pub use types::{Endpoint, Node, Service, Value};

/// Errors returned by a [`Directory`] lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry could not be reached.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// The registry answered with something unusable.
    #[error("registry lookup failed: {0}")]
    Lookup(String),
}

/// Read access to the service registry.
#[async_trait]
pub trait Directory: Send + Sync {
    /// List every known service. Entries carry the name (and version) only.
    async fn list_services(&self) -> Result<Vec<Service>, RegistryError>;

    /// Return every registered version of `name`, with endpoints and nodes.
    async fn get_service(&self, name: &str) -> Result<Vec<Service>, RegistryError>;
}
