//! Instance selection subsystem.
//!
//! # Data Flow
//! ```text
//! Service name (namespace.token)
//!     → selector.rs (ask the Directory for every version of the service)
//!     → pool the nodes of all versions
//!     → Apply strategy:
//!         - round_robin.rs (rotate per service)
//!         - random.rs (uniform pick)
//!     → Return one live Node or SelectError
//! ```
//!
//! # Design Decisions
//! - Strategies are stateless over the node list; per-service state lives
//!   inside the strategy (round-robin counters)
//! - No caching: every selection sees the directory's current snapshot
//! - No instance is an explicit error, never a default address

pub mod random;
pub mod round_robin;
pub mod selector;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{Node, RegistryError};

pub use random::Random;
pub use round_robin::RoundRobin;
pub use selector::RegistrySelector;

/// Errors returned by a [`Selector`].
#[derive(Debug, Error)]
pub enum SelectError {
    /// The service is unknown or has no registered nodes.
    #[error("no instances available for {0}")]
    NoInstances(String),

    /// The directory lookup itself failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Chooses one node out of a service's pool.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Returns the next node for `service`, or `None` if `nodes` is empty.
    fn next_node(&self, service: &str, nodes: &[Node]) -> Option<Node>;
}

/// Turns a service name into one live instance.
#[async_trait]
pub trait Selector: Send + Sync {
    async fn select(&self, service: &str) -> Result<Node, SelectError>;
}

/// Strategy names accepted in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RoundRobin,
    Random,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::RoundRobin => Box::new(RoundRobin::new()),
            StrategyKind::Random => Box::new(Random::new()),
        }
    }
}
