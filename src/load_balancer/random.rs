//! Uniform random selection strategy.

use rand::Rng;

use crate::load_balancer::Strategy;
use crate::registry::Node;

#[derive(Debug, Default)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Random {
    fn next_node(&self, _service: &str, nodes: &[Node]) -> Option<Node> {
        if nodes.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..nodes.len());
        nodes.get(index).cloned()
    }
}
