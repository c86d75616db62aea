//! Controllable clock

use async_trait::async_trait;
use keel_core::effects::PhysicalTimeEffects;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::FIXED_NOW_SECS;

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<AtomicU64>,
}

impl MockClock {
    pub fn at(secs: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(secs)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(FIXED_NOW_SECS)
    }
}

#[async_trait]
impl PhysicalTimeEffects for MockClock {
    async fn current_timestamp(&self) -> u64 {
        self.now()
    }
}
