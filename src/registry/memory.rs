//! Static, hot-swappable directory.

use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::registry::{Directory, RegistryError, Service};

/// Directory backed by an in-memory snapshot.
///
/// Readers load the current snapshot without locking; [`MemoryDirectory::replace`]
/// swaps in a new one atomically (used by config hot reload).
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    /// Service name -> registered versions, in registration order.
    services: ArcSwap<BTreeMap<String, Vec<Service>>>,
}

impl MemoryDirectory {
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services: ArcSwap::from_pointee(Self::index(services)),
        }
    }

    /// Replace the whole registry contents.
    pub fn replace(&self, services: Vec<Service>) {
        let index = Self::index(services);
        tracing::info!(services = index.len(), "Directory contents replaced");
        self.services.store(Arc::new(index));
    }

    /// Number of distinct service names.
    pub fn len(&self) -> usize {
        self.services.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(services: Vec<Service>) -> BTreeMap<String, Vec<Service>> {
        let mut index: BTreeMap<String, Vec<Service>> = BTreeMap::new();
        for service in services {
            index.entry(service.name.clone()).or_default().push(service);
        }
        index
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn list_services(&self) -> Result<Vec<Service>, RegistryError> {
        // BTreeMap keeps this sorted by name
        Ok(self
            .services
            .load()
            .values()
            .filter_map(|versions| versions.first())
            .map(Service::summary)
            .collect())
    }

    async fn get_service(&self, name: &str) -> Result<Vec<Service>, RegistryError> {
        Ok(self
            .services
            .load()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Node;

    fn service(name: &str, version: &str, address: &str) -> Service {
        Service {
            name: name.to_string(),
            version: version.to_string(),
            nodes: vec![Node {
                id: format!("{name}-{version}"),
                address: address.to_string(),
                ..Node::default()
            }],
            ..Service::default()
        }
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_deduplicated() {
        let dir = MemoryDirectory::new(vec![
            service("go.micro.web.greeter", "v2", "10.0.0.6:9000"),
            service("go.micro.srv.greeter", "v1", "10.0.0.7:9000"),
            service("go.micro.web.greeter", "v1", "10.0.0.5:9000"),
        ]);

        let names: Vec<String> = dir
            .list_services()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["go.micro.srv.greeter", "go.micro.web.greeter"]);

        let listed = dir.list_services().await.unwrap();
        assert!(listed.iter().all(|s| s.nodes.is_empty()));
    }

    #[tokio::test]
    async fn test_get_returns_all_versions() {
        let dir = MemoryDirectory::new(vec![
            service("go.micro.web.greeter", "v1", "10.0.0.5:9000"),
            service("go.micro.web.greeter", "v2", "10.0.0.6:9000"),
        ]);

        let versions = dir.get_service("go.micro.web.greeter").await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].nodes[0].address, "10.0.0.6:9000");

        assert!(dir.get_service("go.micro.web.unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_swaps_contents() {
        let dir = MemoryDirectory::new(vec![service("a", "v1", "10.0.0.1:1")]);
        assert_eq!(dir.len(), 1);

        dir.replace(vec![service("b", "v1", "10.0.0.2:2"), service("c", "v1", "10.0.0.3:3")]);

        assert_eq!(dir.len(), 2);
        assert!(dir.get_service("a").await.unwrap().is_empty());
        assert_eq!(dir.get_service("c").await.unwrap().len(), 1);
    }
}
