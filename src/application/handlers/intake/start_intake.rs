//! StartIntakeHandler - Command handler for opening an intake session.

use std::sync::Arc;

use crate::application::intake::{ConversationEngine, SessionRegistry};
use crate::domain::foundation::{IntakeSessionId, RecordId};
use crate::domain::intake::{Phase, RecordKind};

/// Command to start collecting a new record.
#[derive(Debug, Clone)]
pub struct StartIntakeCommand {
    pub record_kind: RecordKind,
}

/// Result of starting a session.
#[derive(Debug, Clone)]
pub struct StartIntakeResult {
    pub session_id: IntakeSessionId,
    pub record_id: RecordId,
    /// Greeting followed by the first prompt.
    pub rendered_response: String,
    pub phase: Phase,
    pub step_index: usize,
    pub total_steps: usize,
}

/// Handler for starting intake sessions.
pub struct StartIntakeHandler {
    engine: Arc<ConversationEngine>,
    registry: Arc<SessionRegistry>,
}

impl StartIntakeHandler {
    pub fn new(engine: Arc<ConversationEngine>, registry: Arc<SessionRegistry>) -> Self {
        Self { engine, registry }
    }

    pub async fn handle(&self, cmd: StartIntakeCommand) -> StartIntakeResult {
        let session_id = IntakeSessionId::new();
        let (session, opening) = self.engine.start(session_id, cmd.record_kind).await;

        let result = StartIntakeResult {
            session_id,
            record_id: session.state().record_id().clone(),
            rendered_response: opening,
            phase: session.state().phase(),
            step_index: session.state().current_step_index(),
            total_steps: session.state().total_steps(),
        };

        self.registry.insert(session).await;
        result
    }
}
