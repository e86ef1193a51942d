//! Catalog Provider Port - Read-only source of dynamic option sets.
//!
//! Steps that validate against ids held in the external store (risk
//! categories, registered assets) query this port for the current list.
//! Results are never cached beyond the step that requested them.

use async_trait::async_trait;

use crate::domain::intake::{CatalogOption, CatalogQuery};

/// Errors that can occur while listing catalog options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Catalog store unreachable: {0}")]
    Unreachable(String),

    #[error("Catalog query failed: {0}")]
    QueryFailed(String),
}

/// Port for listing the valid options of a dynamic step
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// List options for a query, ordered as they should be displayed
    ///
    /// # Errors
    /// Returns `LookupError` if the backing store cannot be read. The engine
    /// then accepts any well-formed id and warns the user.
    async fn list_options(&self, query: CatalogQuery) -> Result<Vec<CatalogOption>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_displays_reason() {
        let err = LookupError::Unreachable("connection refused".to_string());
        assert_eq!(err.to_string(), "Catalog store unreachable: connection refused");
    }
}
