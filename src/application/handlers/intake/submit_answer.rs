//! SubmitAnswerHandler - Command handler for one line of user input.

use std::sync::Arc;

use crate::application::intake::{
    flush_transcript, ConversationEngine, SessionRegistry, SubmitResponse,
};
use crate::domain::foundation::{DomainError, IntakeSessionId, StateMachine};
use crate::ports::TranscriptSink;

/// Command to submit user input to a session.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub session_id: IntakeSessionId,
    pub input: String,
}

/// Handler for submitting input.
///
/// Writes the session transcript when the input ends the conversation.
pub struct SubmitAnswerHandler {
    engine: Arc<ConversationEngine>,
    registry: Arc<SessionRegistry>,
    transcript_sink: Arc<dyn TranscriptSink>,
}

impl SubmitAnswerHandler {
    pub fn new(
        engine: Arc<ConversationEngine>,
        registry: Arc<SessionRegistry>,
        transcript_sink: Arc<dyn TranscriptSink>,
    ) -> Self {
        Self {
            engine,
            registry,
            transcript_sink,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist (or was evicted)
    pub async fn handle(&self, cmd: SubmitAnswerCommand) -> Result<SubmitResponse, DomainError> {
        let handle = self.registry.get(&cmd.session_id).await?;
        let mut session = handle.lock().await;

        let was_terminal = session.state().phase().is_terminal();
        let response = self.engine.submit(&mut session, &cmd.input).await;

        if !was_terminal && response.phase.is_terminal() {
            flush_transcript(self.transcript_sink.as_ref(), &mut session).await;
        }

        Ok(response)
    }
}
