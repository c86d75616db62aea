//! Physical time effect
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `keel-effects` (real clock), `keel-testkit` (fixed clock)
//! - **Usage**: local version tokens and checkin timestamps

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current Unix timestamp in seconds.
    async fn current_timestamp(&self) -> u64;
}

/// Blanket implementation for Arc<T> where T: PhysicalTimeEffects
#[async_trait]
impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for Arc<T> {
    async fn current_timestamp(&self) -> u64 {
        (**self).current_timestamp().await
    }
}
