//! IntakeSession - One running conversation and its transcript.

use tracing::warn;

use crate::domain::foundation::{IntakeSessionId, Timestamp};
use crate::domain::intake::{CollectedField, ConversationState, SessionTranscript, Transcript};
use crate::ports::TranscriptSink;

/// A conversation owned by exactly one driver (terminal loop or registry slot).
#[derive(Debug, Clone)]
pub struct IntakeSession {
    pub(super) state: ConversationState,
    pub(super) transcript: Transcript,
    /// Prompt most recently shown to the user.
    pub(super) last_prompt: String,
    /// Answers dropped by a cancel, kept for the transcript.
    pub(super) discarded: Vec<CollectedField>,
}

impl IntakeSession {
    pub(super) fn new(state: ConversationState, opening: String) -> Self {
        Self {
            state,
            transcript: Transcript::new(),
            last_prompt: opening,
            discarded: Vec::new(),
        }
    }

    pub fn id(&self) -> &IntakeSessionId {
        self.state.session_id()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn last_prompt(&self) -> &str {
        &self.last_prompt
    }

    /// Moves the transcript entries into a document for the sink.
    ///
    /// A cancelled session reports the answers it had collected.
    pub fn take_transcript(&mut self, now: Timestamp) -> SessionTranscript {
        let discarded = std::mem::take(&mut self.discarded);
        let mut document = SessionTranscript::capture(&self.state, self.transcript.take(), now);
        if document.fields.is_empty() {
            document.fields = discarded;
        }
        document
    }
}

/// Writes the session's transcript; failures are logged and swallowed.
pub async fn flush_transcript(sink: &dyn TranscriptSink, session: &mut IntakeSession) {
    let document = session.take_transcript(Timestamp::now());
    if let Err(e) = sink.write(&document).await {
        warn!(
            session_id = %document.session_id,
            record_id = %document.record_id,
            error = %e,
            "Failed to write intake transcript"
        );
    }
}
