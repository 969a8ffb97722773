use std::sync::Arc;

use catalog_infra::{
    CatalogResult, DatabaseConfig, InMemoryProductStore, PostgresProductStore,
    ProductCatalogService, ProductStore,
};

/// Catalog service as shared by every handler.
pub type AppServices = ProductCatalogService<Arc<dyn ProductStore>>;

/// Services backed by the in-memory store (tests/dev).
pub fn in_memory() -> AppServices {
    let store: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new());
    ProductCatalogService::new(store)
}

/// Services backed by Postgres: opens the pool and makes sure the schema exists.
pub async fn postgres(config: DatabaseConfig) -> CatalogResult<AppServices> {
    let store = Arc::new(PostgresProductStore::new(config));
    let services = ProductCatalogService::new(store.clone() as Arc<dyn ProductStore>);

    services.start().await?;
    store.ensure_schema().await?;

    Ok(services)
}
