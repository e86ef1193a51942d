//! Static Catalog Provider Adapter
//!
//! Serves fixed option lists from memory. Used in tests and when no database
//! is configured; failures can be injected to exercise degraded lookups.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::intake::{CatalogOption, CatalogQuery};
use crate::ports::{CatalogProvider, LookupError};

#[derive(Debug, Default)]
struct ProviderState {
    failure: Option<LookupError>,
    queries: usize,
}

/// In-memory catalog provider
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogProvider {
    options: HashMap<CatalogQuery, Vec<CatalogOption>>,
    state: Arc<RwLock<ProviderState>>,
}

impl StaticCatalogProvider {
    /// Provider with every list empty
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, query: CatalogQuery, options: Vec<CatalogOption>) -> Self {
        self.options.insert(query, options);
        self
    }

    /// Fails every lookup until [`recover`](Self::recover) is called
    pub async fn fail_with(&self, error: LookupError) {
        self.state.write().await.failure = Some(error);
    }

    pub async fn recover(&self) {
        self.state.write().await.failure = None;
    }

    /// Number of lookups served or failed so far
    pub async fn query_count(&self) -> usize {
        self.state.read().await.queries
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalogProvider {
    async fn list_options(&self, query: CatalogQuery) -> Result<Vec<CatalogOption>, LookupError> {
        let mut state = self.state.write().await;
        state.queries += 1;
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        Ok(self.options.get(&query).cloned().unwrap_or_default())
    }
}
