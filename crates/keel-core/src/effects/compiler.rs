//! Compiler effects
//!
//! # Effect Classification
//!
//! - **Category**: External Engine
//! - **Implementation**: embedding application (language/catalog compiler)
//! - **Usage**: `CompilationService` constructs one compiler at startup and
//!   shares it across all requests

use crate::artifact::{ConfigurationArtifact, VersionToken};
use crate::errors::{CompilerFailure, KeelError};
use crate::node::Node;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options handed to a compiler at construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    /// Inline code to compile instead of the compiler's configured sources
    pub code: Option<String>,
}

/// Turn an enriched node into a configuration artifact.
///
/// Implementations must be safe to call concurrently; one instance serves every
/// request for the lifetime of the service.
#[async_trait]
pub trait CompilerEffects: Send + Sync {
    /// Compile a node. The node already carries server facts.
    async fn compile(&self, node: &Node) -> Result<ConfigurationArtifact, CompilerFailure>;

    /// Current configuration version for a node
    async fn configuration_version(&self, node: &Node) -> Result<VersionToken, CompilerFailure>;
}

/// Blanket implementation for Arc<T> where T: CompilerEffects
#[async_trait]
impl<T: CompilerEffects + ?Sized> CompilerEffects for Arc<T> {
    async fn compile(&self, node: &Node) -> Result<ConfigurationArtifact, CompilerFailure> {
        (**self).compile(node).await
    }

    async fn configuration_version(&self, node: &Node) -> Result<VersionToken, CompilerFailure> {
        (**self).configuration_version(node).await
    }
}

/// Build the compiler once when the service starts.
///
/// Construction failures surface from the service builder instead of from the
/// first request.
pub trait CompilerFactory: Send + Sync {
    /// Construct a compiler
    fn create(&self, options: CompilerOptions) -> Result<Arc<dyn CompilerEffects>, KeelError>;
}

impl<F> CompilerFactory for F
where
    F: Fn(CompilerOptions) -> Result<Arc<dyn CompilerEffects>, KeelError> + Send + Sync,
{
    fn create(&self, options: CompilerOptions) -> Result<Arc<dyn CompilerEffects>, KeelError> {
        self(options)
    }
}
