//! Catalog provider adapters that need no database.

mod static_catalog_provider;

pub use static_catalog_provider::StaticCatalogProvider;
