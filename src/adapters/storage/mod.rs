//! Storage adapters: in-memory record sink and transcript sinks.

mod file_transcript_sink;
mod in_memory_record_sink;
mod in_memory_transcript_sink;

pub use file_transcript_sink::FileTranscriptSink;
pub use in_memory_record_sink::InMemoryRecordSink;
pub use in_memory_transcript_sink::InMemoryTranscriptSink;
