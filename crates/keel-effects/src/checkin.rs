//! In-memory checkin recorder
//!
//! Keeps the latest checkin time per node for the lifetime of the process.

use async_trait::async_trait;
use keel_core::effects::{CheckinEffects, CheckinError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Checkin recorder backed by a process-local map
#[derive(Debug, Default)]
pub struct MemoryCheckinHandler {
    last_checkin: RwLock<HashMap<String, u64>>,
}

impl MemoryCheckinHandler {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest recorded checkin for a node
    pub fn last_checkin(&self, node_name: &str) -> Option<u64> {
        self.last_checkin.read().get(node_name).copied()
    }

    /// Number of nodes that have checked in
    pub fn tracked_nodes(&self) -> usize {
        self.last_checkin.read().len()
    }
}

#[async_trait]
impl CheckinEffects for MemoryCheckinHandler {
    async fn record_checkin(&self, node_name: &str, timestamp: u64) -> Result<(), CheckinError> {
        let mut map = self.last_checkin.write();
        let entry = map.entry(node_name.to_string()).or_insert(timestamp);
        // Out-of-order writes never move a checkin backwards
        if timestamp > *entry {
            *entry = timestamp;
        }
        Ok(())
    }
}
