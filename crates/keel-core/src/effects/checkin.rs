//! Checkin recording effect
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `keel-effects` (in-memory handler); persistent stores
//!   are supplied by the embedding application
//! - **Usage**: best-effort telemetry from `VersionOracle`; failures are swallowed

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error type for checkin recording.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum CheckinError {
    #[error("Checkin store unavailable")]
    StoreUnavailable,
    #[error("Checkin write failed: {reason}")]
    WriteFailed { reason: String },
}

#[async_trait]
pub trait CheckinEffects: Send + Sync {
    /// Record that `node_name` checked in at `timestamp` (Unix seconds)
    async fn record_checkin(&self, node_name: &str, timestamp: u64) -> Result<(), CheckinError>;
}

/// Blanket implementation for Arc<T> where T: CheckinEffects
#[async_trait]
impl<T: CheckinEffects + ?Sized> CheckinEffects for Arc<T> {
    async fn record_checkin(&self, node_name: &str, timestamp: u64) -> Result<(), CheckinError> {
        (**self).record_checkin(node_name, timestamp).await
    }
}
