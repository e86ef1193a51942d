//! GetProgressHandler - Query handler for a session's progress.

use std::sync::Arc;

use crate::application::intake::SessionRegistry;
use crate::domain::foundation::{DomainError, IntakeSessionId, RecordId};
use crate::domain::intake::{CollectedField, Phase, RecordKind};

/// Query for the progress of one session.
#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub session_id: IntakeSessionId,
}

/// Read model of a session's progress.
#[derive(Debug, Clone)]
pub struct IntakeProgress {
    pub session_id: IntakeSessionId,
    pub record_kind: RecordKind,
    pub record_id: RecordId,
    pub phase: Phase,
    pub step_index: usize,
    pub total_steps: usize,
    pub percentage: u8,
    pub attempts_on_current_step: u32,
    pub collected: Vec<CollectedField>,
    /// Prompt the session is currently waiting on.
    pub current_prompt: String,
    pub external_id: Option<String>,
}

/// Handler for progress queries.
pub struct GetProgressHandler {
    registry: Arc<SessionRegistry>,
}

impl GetProgressHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    pub async fn handle(&self, query: GetProgressQuery) -> Result<IntakeProgress, DomainError> {
        let handle = self.registry.get(&query.session_id).await?;
        let session = handle.lock().await;
        let state = session.state();

        Ok(IntakeProgress {
            session_id: query.session_id,
            record_kind: state.record_kind(),
            record_id: state.record_id().clone(),
            phase: state.phase(),
            step_index: state.current_step_index(),
            total_steps: state.total_steps(),
            percentage: state.progress_percentage(),
            attempts_on_current_step: state.attempts_on_current_step(),
            collected: state.collected_fields().to_vec(),
            current_prompt: session.last_prompt().to_string(),
            external_id: state.external_id().map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryRecordSink, StaticCatalogProvider};
    use crate::application::intake::{CommitAdapter, ConversationEngine};

    #[tokio::test]
    async fn reports_answers_so_far() {
        let registry = Arc::new(SessionRegistry::new());
        let engine = ConversationEngine::new(
            Arc::new(StaticCatalogProvider::new()),
            CommitAdapter::new(Arc::new(InMemoryRecordSink::new())),
        );
        let (mut session, _) = engine
            .start(IntakeSessionId::new(), RecordKind::Incident)
            .await;
        engine.submit(&mut session, "Laptop stolen from car").await;
        let session_id = *session.id();
        registry.insert(session).await;

        let progress = GetProgressHandler::new(registry)
            .handle(GetProgressQuery { session_id })
            .await
            .unwrap();

        assert_eq!(progress.step_index, 1);
        assert_eq!(progress.total_steps, 7);
        assert_eq!(progress.percentage, 14);
        assert_eq!(progress.collected.len(), 1);
        assert!(progress.current_prompt.contains("description"));
    }
}
