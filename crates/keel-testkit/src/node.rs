//! Mock node resolver

use async_trait::async_trait;
use keel_core::effects::NodeSearchEffects;
use keel_core::Node;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ResolverState {
    nodes: HashMap<String, Node>,
    searches: Vec<String>,
}

/// In-memory resolver that records every key it is asked for
#[derive(Debug, Clone, Default)]
pub struct MockNodeResolver {
    state: Arc<Mutex<ResolverState>>,
}

impl MockNodeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its own name
    pub fn with_node(self, node: Node) -> Self {
        self.insert(node);
        self
    }

    pub fn insert(&self, node: Node) {
        self.state.lock().nodes.insert(node.name.clone(), node);
    }

    /// Keys searched so far, in call order
    pub fn searches(&self) -> Vec<String> {
        self.state.lock().searches.clone()
    }
}

#[async_trait]
impl NodeSearchEffects for MockNodeResolver {
    async fn search(&self, key: &str) -> Option<Node> {
        let mut state = self.state.lock();
        state.searches.push(key.to_string());
        state.nodes.get(key).cloned()
    }
}
