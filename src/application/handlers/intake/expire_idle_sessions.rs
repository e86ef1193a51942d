//! ExpireIdleSessionsHandler - Cancels sessions that stopped receiving input.
//!
//! Open sessions idle past the timeout move to `Cancelled` and have their
//! transcript written. Sessions that were already finished and stay idle
//! for another full timeout are dropped from the registry.

use std::sync::Arc;

use tracing::debug;

use crate::application::intake::{flush_transcript, ConversationEngine, SessionRegistry};
use crate::domain::foundation::{IntakeSessionId, StateMachine, Timestamp};
use crate::ports::TranscriptSink;

/// Command to sweep the registry at a point in time.
#[derive(Debug, Clone)]
pub struct ExpireIdleSessionsCommand {
    pub now: Timestamp,
}

/// Sessions touched by one sweep.
#[derive(Debug, Clone, Default)]
pub struct ExpireIdleSessionsResult {
    /// Open sessions moved to `Cancelled`.
    pub expired: Vec<IntakeSessionId>,
    /// Finished sessions removed from the registry.
    pub evicted: Vec<IntakeSessionId>,
}

/// Handler for idle-session sweeps.
pub struct ExpireIdleSessionsHandler {
    engine: Arc<ConversationEngine>,
    registry: Arc<SessionRegistry>,
    transcript_sink: Arc<dyn TranscriptSink>,
    idle_timeout_secs: u64,
}

impl ExpireIdleSessionsHandler {
    /// `idle_timeout_secs == 0` disables expiry.
    pub fn new(
        engine: Arc<ConversationEngine>,
        registry: Arc<SessionRegistry>,
        transcript_sink: Arc<dyn TranscriptSink>,
        idle_timeout_secs: u64,
    ) -> Self {
        Self {
            engine,
            registry,
            transcript_sink,
            idle_timeout_secs,
        }
    }

    pub async fn handle(&self, cmd: ExpireIdleSessionsCommand) -> ExpireIdleSessionsResult {
        let mut result = ExpireIdleSessionsResult::default();
        if self.idle_timeout_secs == 0 {
            return result;
        }

        for (id, handle) in self.registry.handles().await {
            let mut session = handle.lock().await;
            if !session.state().is_idle(&cmd.now, self.idle_timeout_secs) {
                continue;
            }

            if session.state().phase().is_terminal() {
                drop(session);
                self.registry.remove(&id).await;
                result.evicted.push(id);
            } else if self.engine.expire(&mut session, cmd.now) {
                flush_transcript(self.transcript_sink.as_ref(), &mut session).await;
                result.expired.push(id);
            }
        }

        if !result.expired.is_empty() || !result.evicted.is_empty() {
            debug!(
                expired = result.expired.len(),
                evicted = result.evicted.len(),
                "Idle session sweep finished"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryRecordSink, InMemoryTranscriptSink, StaticCatalogProvider};
    use crate::application::intake::CommitAdapter;
    use crate::domain::intake::{Phase, RecordKind};

    struct Fixture {
        engine: Arc<ConversationEngine>,
        registry: Arc<SessionRegistry>,
        transcripts: Arc<InMemoryTranscriptSink>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                engine: Arc::new(ConversationEngine::new(
                    Arc::new(StaticCatalogProvider::new()),
                    CommitAdapter::new(Arc::new(InMemoryRecordSink::new())),
                )),
                registry: Arc::new(SessionRegistry::new()),
                transcripts: Arc::new(InMemoryTranscriptSink::new()),
            }
        }

        fn handler(&self, timeout: u64) -> ExpireIdleSessionsHandler {
            ExpireIdleSessionsHandler::new(
                self.engine.clone(),
                self.registry.clone(),
                self.transcripts.clone(),
                timeout,
            )
        }

        async fn open_session(&self) -> IntakeSessionId {
            let (session, _) = self
                .engine
                .start(IntakeSessionId::new(), RecordKind::Incident)
                .await;
            let id = *session.id();
            self.registry.insert(session).await;
            id
        }
    }

    fn in_secs(secs: u64) -> ExpireIdleSessionsCommand {
        ExpireIdleSessionsCommand {
            now: Timestamp::now().plus_secs(secs),
        }
    }

    #[tokio::test]
    async fn fresh_sessions_are_left_alone() {
        let f = Fixture::new();
        f.open_session().await;
        let result = f.handler(600).handle(in_secs(10)).await;
        assert!(result.expired.is_empty());
    }

    #[tokio::test]
    async fn idle_sessions_are_cancelled_and_logged() {
        let f = Fixture::new();
        let id = f.open_session().await;

        let result = f.handler(600).handle(in_secs(601)).await;

        assert_eq!(result.expired, vec![id]);
        let handle = f.registry.get(&id).await.unwrap();
        assert_eq!(handle.lock().await.state().phase(), Phase::Cancelled);
        assert_eq!(f.transcripts.written().await.len(), 1);
    }

    #[tokio::test]
    async fn finished_sessions_are_evicted_on_a_later_sweep() {
        let f = Fixture::new();
        let id = f.open_session().await;
        let handler = f.handler(600);
        handler.handle(in_secs(601)).await;

        let later = ExpireIdleSessionsCommand {
            now: Timestamp::now().plus_secs(1_300),
        };
        let result = handler.handle(later).await;

        assert_eq!(result.evicted, vec![id]);
        assert!(f.registry.is_empty().await);
    }

    #[tokio::test]
    async fn zero_timeout_disables_expiry() {
        let f = Fixture::new();
        f.open_session().await;
        let result = f.handler(0).handle(in_secs(100_000)).await;
        assert!(result.expired.is_empty());
        assert!(result.evicted.is_empty());
    }
}
