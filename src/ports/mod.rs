//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the intake engine and the outside world. Adapters implement these ports.
//!
//! - `CatalogProvider` - Read-only lookup of dynamic option sets
//! - `RecordSink` - Single-record insert of finished records
//! - `TranscriptSink` - Audit log written at the end of a conversation

mod catalog_provider;
mod record_sink;
mod transcript_sink;

pub use catalog_provider::{CatalogProvider, LookupError};
pub use record_sink::{InsertReceipt, RecordSink, SinkError};
pub use transcript_sink::{TranscriptError, TranscriptSink};
