//! Mock fact provider

use async_trait::async_trait;
use keel_core::effects::{FactEffects, FactError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct FactState {
    facts: HashMap<String, String>,
    calls: HashMap<String, usize>,
}

/// Fact provider answering from a fixed map and counting queries per fact
#[derive(Debug, Clone, Default)]
pub struct MockFactProvider {
    state: Arc<Mutex<FactState>>,
}

impl MockFactProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider knowing `fqdn` and `ipaddress`
    pub fn with_server(fqdn: &str, ipaddress: &str) -> Self {
        Self::new().with_fact("fqdn", fqdn).with_fact("ipaddress", ipaddress)
    }

    pub fn with_fact(self, name: &str, value: &str) -> Self {
        self.state
            .lock()
            .facts
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Number of times `name` was queried
    pub fn calls(&self, name: &str) -> usize {
        self.state.lock().calls.get(name).copied().unwrap_or(0)
    }

    /// Total queries across all facts
    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }
}

#[async_trait]
impl FactEffects for MockFactProvider {
    async fn fact_value(&self, name: &str) -> Result<String, FactError> {
        let mut state = self.state.lock();
        *state.calls.entry(name.to_string()).or_insert(0) += 1;
        state
            .facts
            .get(name)
            .cloned()
            .ok_or_else(|| FactError::unavailable(name))
    }
}
