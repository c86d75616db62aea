//! Node search effect
//!
//! # Effect Classification
//!
//! - **Category**: External Engine
//! - **Implementation**: embedding application; `keel-effects` ships the plain resolver
//! - **Usage**: `CompilationService::find`, `VersionOracle::version`

use crate::node::Node;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolve an identity key to the node's authoritative record.
///
/// `None` means the node is unknown. The resolver is the source of truth; the
/// service never retries a miss.
#[async_trait]
pub trait NodeSearchEffects: Send + Sync {
    /// Look up a node by key
    async fn search(&self, key: &str) -> Option<Node>;
}

/// Blanket implementation for Arc<T> where T: NodeSearchEffects
#[async_trait]
impl<T: NodeSearchEffects + ?Sized> NodeSearchEffects for Arc<T> {
    async fn search(&self, key: &str) -> Option<Node> {
        (**self).search(key).await
    }
}
