//! Layer 3: Time Effect Handler - Production Only
//!
//! Delegates to the operating system clock.

use async_trait::async_trait;
use keel_core::effects::PhysicalTimeEffects;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Real time handler for production use
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn current_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_current_timestamp() {
        let handler = RealTimeHandler::new();
        let ts = handler.current_timestamp().await;
        // 2020-01-01 00:00:00 UTC
        assert!(ts > 1_577_836_800);
    }
}
