//! In-Memory Record Sink Adapter
//!
//! Keeps committed records in a list. Used in tests and when no database is
//! configured.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::intake::Record;
use crate::ports::{InsertReceipt, RecordSink, SinkError};

#[derive(Debug, Default)]
struct SinkState {
    records: Vec<Record>,
    next_failure: Option<SinkError>,
}

/// In-memory record sink; external ids are 1-based insertion positions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSink {
    state: Arc<RwLock<SinkState>>,
}

impl InMemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next insert fail with `error` (one shot).
    pub async fn fail_next(&self, error: SinkError) {
        self.state.write().await.next_failure = Some(error);
    }

    /// Records inserted so far
    pub async fn records(&self) -> Vec<Record> {
        self.state.read().await.records.clone()
    }
}

#[async_trait]
impl RecordSink for InMemoryRecordSink {
    async fn insert(&self, record: &Record) -> Result<InsertReceipt, SinkError> {
        let mut state = self.state.write().await;
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        state.records.push(record.clone());
        Ok(InsertReceipt {
            external_id: state.records.len().to_string(),
        })
    }
}
