//! Fact provider effect
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `keel-effects` (system and static handlers)
//! - **Usage**: queried only while the fact cache is gathered at startup

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error type for fact lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FactError {
    #[error("Fact {name} is unavailable")]
    Unavailable { name: String },
    #[error("Fact provider failed: {reason}")]
    ProviderFailed { reason: String },
}

impl FactError {
    /// Create an unavailable error
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self::Unavailable { name: name.into() }
    }
}

#[async_trait]
pub trait FactEffects: Send + Sync {
    async fn fact_value(&self, name: &str) -> Result<String, FactError>;
}

/// Blanket implementation for Arc<T> where T: FactEffects
#[async_trait]
impl<T: FactEffects + ?Sized> FactEffects for Arc<T> {
    async fn fact_value(&self, name: &str) -> Result<String, FactError> {
        (**self).fact_value(name).await
    }
}
