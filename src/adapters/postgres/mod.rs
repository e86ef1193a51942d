//! PostgreSQL adapters - Database implementations of the intake ports.
//!
//! - `PostgresRecordSink` - Inserts committed records
//! - `PostgresCatalogProvider` - Reads risk categories and information assets

mod catalog_provider;
mod record_sink;

pub use catalog_provider::PostgresCatalogProvider;
pub use record_sink::PostgresRecordSink;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[cfg(test)]
mod tests {
    const SCHEMA: &str = include_str!("../../../migrations/20240115000000_create_intake_tables.sql");

    fn column_definition(column: &str) -> &'static str {
        SCHEMA
            .lines()
            .find(|line| line.trim_start().starts_with(&format!("{} VARCHAR", column)))
            .unwrap()
    }

    #[test]
    fn record_id_columns_accept_repeated_ids() {
        for column in ["asset_id", "incident_id", "risk_id"] {
            let definition = column_definition(column);
            assert!(!definition.contains("UNIQUE"), "{}", definition);
        }
    }
}
