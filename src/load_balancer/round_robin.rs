//! Round-robin selection strategy.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::Strategy;
use crate::registry::Node;

/// Round-robin selector.
/// Keeps one counter per service name so services rotate independently.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counters: DashMap<String, AtomicUsize>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for RoundRobin {
    fn next_node(&self, service: &str, nodes: &[Node]) -> Option<Node> {
        if nodes.is_empty() {
            return None;
        }

        let count = match self.counters.get(service) {
            Some(counter) => counter.fetch_add(1, Ordering::Relaxed),
            None => self
                .counters
                .entry(service.to_string())
                .or_default()
                .fetch_add(1, Ordering::Relaxed),
        };

        nodes.get(count % nodes.len()).cloned()
    }
}
