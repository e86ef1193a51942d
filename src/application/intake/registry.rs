//! SessionRegistry - Live intake sessions keyed by id.
//!
//! Each session sits behind its own mutex so inputs for one session are
//! processed strictly one at a time while other sessions proceed
//! independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::session::IntakeSession;
use crate::domain::foundation::{DomainError, ErrorCode, IntakeSessionId};

/// Shared handle to one live session.
pub type SessionHandle = Arc<Mutex<IntakeSession>>;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<IntakeSessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: IntakeSession) -> SessionHandle {
        let id = *session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if no live session has this id
    pub async fn get(&self, id: &IntakeSessionId) -> Result<SessionHandle, DomainError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SessionNotFound, format!("Intake session {} not found", id))
                    .with_detail("session_id", id.to_string())
            })
    }

    pub async fn remove(&self, id: &IntakeSessionId) -> Option<SessionHandle> {
        self.sessions.write().await.remove(id)
    }

    /// Snapshot of all live sessions.
    pub async fn handles(&self) -> Vec<(IntakeSessionId, SessionHandle)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, handle)| (*id, handle.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryRecordSink, StaticCatalogProvider};
    use crate::application::intake::{CommitAdapter, ConversationEngine};
    use crate::domain::intake::RecordKind;

    async fn session() -> IntakeSession {
        let engine = ConversationEngine::new(
            Arc::new(StaticCatalogProvider::new()),
            CommitAdapter::new(Arc::new(InMemoryRecordSink::new())),
        );
        engine.start(IntakeSessionId::new(), RecordKind::Asset).await.0
    }

    #[tokio::test]
    async fn get_returns_inserted_session() {
        let registry = SessionRegistry::new();
        let session = session().await;
        let id = *session.id();
        registry.insert(session).await;

        let handle = registry.get(&id).await.unwrap();
        assert_eq!(handle.lock().await.id(), &id);
    }

    #[tokio::test]
    async fn unknown_id_is_session_not_found() {
        let registry = SessionRegistry::new();
        let err = registry.get(&IntakeSessionId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn remove_forgets_session() {
        let registry = SessionRegistry::new();
        let session = session().await;
        let id = *session.id();
        registry.insert(session).await;

        assert!(registry.remove(&id).await.is_some());
        assert!(registry.is_empty().await);
    }
}
