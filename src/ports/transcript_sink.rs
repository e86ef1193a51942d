//! Transcript Sink Port - Audit log of finished conversations.

use async_trait::async_trait;

use crate::domain::intake::SessionTranscript;

/// Errors that can occur while writing a transcript
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Failed to serialize transcript: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for writing conversation transcripts
///
/// Called once per conversation, when it reaches `Committed` or
/// `Cancelled`. Failures are logged; they never affect the conversation.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn write(&self, transcript: &SessionTranscript) -> Result<(), TranscriptError>;
}
