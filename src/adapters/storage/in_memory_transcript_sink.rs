//! In-Memory Transcript Sink Adapter
//!
//! Collects transcripts in memory. Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::intake::SessionTranscript;
use crate::ports::{TranscriptError, TranscriptSink};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscriptSink {
    written: Arc<RwLock<Vec<SessionTranscript>>>,
}

impl InMemoryTranscriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcripts written so far
    pub async fn written(&self) -> Vec<SessionTranscript> {
        self.written.read().await.clone()
    }
}

#[async_trait]
impl TranscriptSink for InMemoryTranscriptSink {
    async fn write(&self, transcript: &SessionTranscript) -> Result<(), TranscriptError> {
        self.written.write().await.push(transcript.clone());
        Ok(())
    }
}
