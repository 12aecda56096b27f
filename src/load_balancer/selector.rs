//! Directory-backed selector.

use async_trait::async_trait;
use std::sync::Arc;

use crate::load_balancer::{SelectError, Selector, Strategy};
use crate::registry::{Directory, Node};

/// Looks the service up in a [`Directory`] and applies a [`Strategy`].
pub struct RegistrySelector {
    directory: Arc<dyn Directory>,
    strategy: Box<dyn Strategy>,
}

impl RegistrySelector {
    pub fn new(directory: Arc<dyn Directory>, strategy: Box<dyn Strategy>) -> Self {
        Self {
            directory,
            strategy,
        }
    }
}

#[async_trait]
impl Selector for RegistrySelector {
    async fn select(&self, service: &str) -> Result<Node, SelectError> {
        let versions = self.directory.get_service(service).await?;

        let nodes: Vec<Node> = versions
            .into_iter()
            .flat_map(|s| s.nodes)
            .filter(|n| !n.address.is_empty())
            .collect();

        match self.strategy.next_node(service, &nodes) {
            Some(node) => {
                tracing::debug!(service = %service, address = %node.address, pool = nodes.len(), "Selected node");
                Ok(node)
            }
            None => {
                tracing::debug!(service = %service, "No nodes registered");
                Err(SelectError::NoInstances(service.to_string()))
            }
        }
    }
}
