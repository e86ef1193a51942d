//! Record Sink Port - Write boundary for finished records.
//!
//! A sink performs one atomic single-record insert. It either persists the
//! whole record or nothing.

use async_trait::async_trait;

use crate::domain::intake::Record;

/// Errors that can occur while persisting a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Insert rejected: {0}")]
    Rejected(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Acknowledgement of a persisted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertReceipt {
    /// Identifier assigned by the store.
    pub external_id: String,
}

/// Port for persisting finished records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Insert one record
    ///
    /// # Errors
    /// Returns `SinkError` if the write failed; nothing was persisted.
    async fn insert(&self, record: &Record) -> Result<InsertReceipt, SinkError>;
}
