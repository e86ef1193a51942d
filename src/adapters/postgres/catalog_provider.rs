//! PostgreSQL implementation of CatalogProvider.
//!
//! Reads the option lists for the risk intake's dynamic id steps.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::intake::{CatalogOption, CatalogQuery};
use crate::ports::{CatalogProvider, LookupError};

/// PostgreSQL implementation of CatalogProvider.
#[derive(Clone)]
pub struct PostgresCatalogProvider {
    pool: PgPool,
}

impl PostgresCatalogProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_sql(query: CatalogQuery) -> &'static str {
    match query {
        CatalogQuery::RiskCategories => {
            "SELECT id::bigint AS id, category_name AS label FROM risk_categories ORDER BY category_name"
        }
        CatalogQuery::InformationAssets => {
            "SELECT id::bigint AS id, asset_name AS label FROM information_assets ORDER BY asset_name"
        }
    }
}

#[async_trait]
impl CatalogProvider for PostgresCatalogProvider {
    async fn list_options(&self, query: CatalogQuery) -> Result<Vec<CatalogOption>, LookupError> {
        let rows = sqlx::query(query_sql(query))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                    LookupError::Unreachable(e.to_string())
                }
                other => LookupError::QueryFailed(other.to_string()),
            })?;

        rows.into_iter()
            .map(|row| {
                let id: i64 = row
                    .try_get("id")
                    .map_err(|e| LookupError::QueryFailed(e.to_string()))?;
                let label: String = row
                    .try_get("label")
                    .map_err(|e| LookupError::QueryFailed(e.to_string()))?;
                Ok(CatalogOption::new(id, label))
            })
            .collect()
    }
}
