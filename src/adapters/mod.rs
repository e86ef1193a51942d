//! Adapters - Implementations of the intake ports.
//!
//! - `catalog` / `storage` - In-memory and file adapters
//! - `postgres` - Database-backed sink and catalog provider
//! - `http` - REST API over the intake handlers

pub mod catalog;
pub mod http;
pub mod postgres;
pub mod storage;

pub use catalog::StaticCatalogProvider;
pub use postgres::{PostgresCatalogProvider, PostgresRecordSink};
pub use storage::{FileTranscriptSink, InMemoryRecordSink, InMemoryTranscriptSink};
