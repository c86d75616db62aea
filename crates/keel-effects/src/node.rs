//! Plain node resolver
//!
//! Every key resolves to a bare node. Useful when node classification happens
//! entirely inside the compiled code and no external directory is consulted.

use async_trait::async_trait;
use keel_core::effects::NodeSearchEffects;
use keel_core::Node;

/// Resolver that knows every node
#[derive(Debug, Clone, Default)]
pub struct PlainNodeResolver {
    environment: Option<String>,
}

impl PlainNodeResolver {
    /// Create a resolver that assigns no environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign every resolved node to `environment`
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

#[async_trait]
impl NodeSearchEffects for PlainNodeResolver {
    async fn search(&self, key: &str) -> Option<Node> {
        if key.is_empty() {
            return None;
        }
        let mut node = Node::new(key);
        node.environment = self.environment.clone();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_any_key() {
        let resolver = PlainNodeResolver::new().with_environment("production");
        let node = resolver.search("web01.example.com").await.unwrap();

        assert_eq!(node.name, "web01.example.com");
        assert_eq!(node.environment.as_deref(), Some("production"));
        assert!(node.parameters.is_empty());
    }

    #[tokio::test]
    async fn test_empty_key_is_unknown() {
        assert!(PlainNodeResolver::new().search("").await.is_none());
    }
}
