//! PostgreSQL implementation of RecordSink.
//!
//! Each committed record becomes one row in `assets`, `incidents` or `risks`,
//! written inside a transaction so a failed insert leaves nothing behind.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::foundation::Timestamp;
use crate::domain::intake::{Record, RecordKind, StepCatalog, TypedValue, Validator};
use crate::ports::{InsertReceipt, RecordSink, SinkError};

/// A bind parameter with the SQL type its column expects.
///
/// NULLs keep their column type so Postgres accepts them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SqlValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Date(Option<NaiveDate>),
    DateTime(Option<NaiveDateTime>),
    Timestamp(DateTime<Utc>),
}

/// Table, columns and values for one record insert.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InsertPlan {
    pub table: &'static str,
    pub columns: Vec<&'static str>,
    pub values: Vec<SqlValue>,
}

impl InsertPlan {
    /// Lays out the insert for `record`, adding the bookkeeping columns
    /// each table carries.
    pub fn for_record(record: &Record, now: &Timestamp) -> Self {
        let (table, id_column) = match record.kind() {
            RecordKind::Asset => ("assets", "asset_id"),
            RecordKind::Incident => ("incidents", "incident_id"),
            RecordKind::Risk => ("risks", "risk_id"),
        };
        let catalog = StepCatalog::for_kind(record.kind());

        let mut columns = vec![id_column];
        let mut values = vec![SqlValue::Text(Some(record.record_id().to_string()))];

        for field in record.fields() {
            let validator = catalog.step_for(field.field).map(|s| s.validator);
            columns.push(field.field.as_str());
            values.push(sql_value(&field.value, validator));
        }

        match record.kind() {
            RecordKind::Asset => {
                columns.push("created_at");
                values.push(SqlValue::Timestamp(*now.as_datetime()));
            }
            RecordKind::Incident => {
                columns.extend(["status", "reported_date", "created_via"]);
                values.extend([
                    SqlValue::Text(Some("Open".to_string())),
                    SqlValue::Timestamp(*now.as_datetime()),
                    SqlValue::Text(Some("chatbot".to_string())),
                ]);
            }
            RecordKind::Risk => {
                columns.push("inherent_risk_score");
                values.push(SqlValue::Integer(record.inherent_risk_score()));
            }
        }

        Self {
            table,
            columns,
            values,
        }
    }

    fn query_builder(&self) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            self.table,
            self.columns.join(", ")
        ));
        let mut separated = builder.separated(", ");
        for value in &self.values {
            match value {
                SqlValue::Text(v) => separated.push_bind(v.clone()),
                SqlValue::Integer(v) => separated.push_bind(*v),
                SqlValue::Date(v) => separated.push_bind(*v),
                SqlValue::DateTime(v) => separated.push_bind(*v),
                SqlValue::Timestamp(v) => separated.push_bind(*v),
            };
        }
        separated.push_unseparated(") RETURNING id::text");
        builder
    }
}

fn sql_value(value: &TypedValue, validator: Option<Validator>) -> SqlValue {
    match value {
        TypedValue::Text(s) => SqlValue::Text(Some(s.clone())),
        TypedValue::Integer(n) => SqlValue::Integer(Some(*n)),
        TypedValue::Date(d) => SqlValue::Date(Some(*d)),
        TypedValue::DateTime(dt) => SqlValue::DateTime(Some(*dt)),
        TypedValue::Unknown => match validator {
            Some(Validator::FlexibleDateTime) => SqlValue::DateTime(None),
            Some(Validator::IsoDate) => SqlValue::Date(None),
            Some(
                Validator::BoundedInteger { .. }
                | Validator::DigitsOnly
                | Validator::DynamicIdLookup(_),
            ) => SqlValue::Integer(None),
            _ => SqlValue::Text(None),
        },
    }
}

/// PostgreSQL implementation of RecordSink.
#[derive(Clone)]
pub struct PostgresRecordSink {
    pool: PgPool,
}

impl PostgresRecordSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSink for PostgresRecordSink {
    async fn insert(&self, record: &Record) -> Result<InsertReceipt, SinkError> {
        let plan = InsertPlan::for_record(record, &Timestamp::now());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SinkError::Unavailable(format!("Failed to start transaction: {}", e)))?;

        let mut builder = plan.query_builder();
        let row = builder
            .build()
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_insert_error(plan.table, e))?;

        let external_id: String = row
            .try_get(0)
            .map_err(|e| SinkError::DatabaseError(format!("Failed to read inserted id: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| SinkError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

        Ok(InsertReceipt { external_id })
    }
}

fn map_insert_error(table: &str, e: sqlx::Error) -> SinkError {
    match e {
        sqlx::Error::Database(db) => {
            SinkError::Rejected(format!("Failed to insert into {}: {}", table, db.message()))
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            SinkError::Unavailable(e.to_string())
        }
        other => SinkError::DatabaseError(format!("Failed to insert into {}: {}", table, other)),
    }
}
