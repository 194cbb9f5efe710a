//! In-memory store of analysis records for the current service session.
//!
//! Records are immutable once inserted; there is deliberately no persistence
//! and no update path. Restarting the service clears the list.

use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::models::AnalysisRecord;

#[derive(Clone, Default)]
pub struct SessionStore {
    records: Arc<RwLock<Vec<AnalysisRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: AnalysisRecord) {
        self.records
            .write()
            .expect("session lock poisoned")
            .push(record);
    }

    /// Snapshot of every record, in insertion order.
    pub fn list(&self) -> Vec<AnalysisRecord> {
        self.records
            .read()
            .expect("session lock poisoned")
            .clone()
    }

    pub fn get(&self, id: Uuid) -> Option<AnalysisRecord> {
        self.records
            .read()
            .expect("session lock poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Drops every record, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut records = self.records.write().expect("session lock poisoned");
        let removed = records.len();
        records.clear();
        removed
    }
}
