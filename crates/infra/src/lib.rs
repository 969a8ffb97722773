//! Infrastructure layer: store adapters, configuration, and the catalog service.

pub mod config;
pub mod product_service;
pub mod store;


pub use config::{ConfigError, DatabaseConfig};
pub use product_service::{CatalogError, CatalogResult, ProductCatalogService};
pub use store::{
    InMemoryProductStore, PostgresProductStore, ProductStore, StoreError, StoreLifecycle,
    StoreResult,
};
