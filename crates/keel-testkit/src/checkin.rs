//! Mock checkin recorder

use async_trait::async_trait;
use keel_core::effects::{CheckinEffects, CheckinError};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct CheckinState {
    records: Vec<(String, u64)>,
    fail: bool,
}

/// Recorder that keeps every checkin, or fails every write when asked to
#[derive(Debug, Clone, Default)]
pub struct MockCheckinRecorder {
    state: Arc<Mutex<CheckinState>>,
}

impl MockCheckinRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose store is always unavailable
    pub fn failing() -> Self {
        let recorder = Self::default();
        recorder.state.lock().fail = true;
        recorder
    }

    /// Attempted checkins, including failed ones
    pub fn records(&self) -> Vec<(String, u64)> {
        self.state.lock().records.clone()
    }
}

#[async_trait]
impl CheckinEffects for MockCheckinRecorder {
    async fn record_checkin(&self, node_name: &str, timestamp: u64) -> Result<(), CheckinError> {
        let mut state = self.state.lock();
        state.records.push((node_name.to_string(), timestamp));
        if state.fail {
            return Err(CheckinError::StoreUnavailable);
        }
        Ok(())
    }
}
