//! CommitAdapter - Hands a confirmed record to the record sink.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::intake::Record;
use crate::ports::RecordSink;

/// Result of one commit attempt.
///
/// Failures are data, not errors: the engine shows `error` to the user and
/// stays in `AwaitingConfirmation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub success: bool,
    pub external_id: Option<String>,
    pub error: Option<String>,
}

impl CommitOutcome {
    pub fn committed(external_id: impl Into<String>) -> Self {
        Self {
            success: true,
            external_id: Some(external_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            external_id: None,
            error: Some(error.into()),
        }
    }
}

/// Translates a frozen record into a single sink insert.
///
/// One attempt per call; there is no retry.
#[derive(Clone)]
pub struct CommitAdapter {
    sink: Arc<dyn RecordSink>,
}

impl CommitAdapter {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    pub async fn commit(&self, record: &Record) -> CommitOutcome {
        match self.sink.insert(record).await {
            Ok(receipt) => {
                info!(
                    record_kind = %record.kind(),
                    record_id = %record.record_id(),
                    external_id = %receipt.external_id,
                    "Record committed"
                );
                CommitOutcome::committed(receipt.external_id)
            }
            Err(e) => {
                error!(
                    record_kind = %record.kind(),
                    record_id = %record.record_id(),
                    error = %e,
                    "Record commit failed"
                );
                CommitOutcome::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordSink;
    use crate::domain::foundation::RecordId;
    use crate::domain::intake::{FieldId, RecordField, RecordKind, TypedValue};
    use crate::ports::SinkError;

    fn record() -> Record {
        Record::new(
            RecordId::new("INC-000007").unwrap(),
            RecordKind::Incident,
            vec![RecordField {
                field: FieldId::new("incident_title"),
                value: TypedValue::Text("VPN outage".to_string()),
            }],
        )
    }

    #[tokio::test]
    async fn success_carries_external_id() {
        let sink = Arc::new(InMemoryRecordSink::new());
        let adapter = CommitAdapter::new(sink.clone());

        let outcome = adapter.commit(&record()).await;

        assert!(outcome.success);
        assert_eq!(outcome.external_id.as_deref(), Some("1"));
        assert_eq!(sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn failure_is_reported_not_raised() {
        let sink = Arc::new(InMemoryRecordSink::new());
        sink.fail_next(SinkError::Unavailable("connection reset".to_string()))
            .await;
        let adapter = CommitAdapter::new(sink.clone());

        let outcome = adapter.commit(&record()).await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Store unavailable: connection reset")
        );
        assert!(sink.records().await.is_empty());
    }
}
