use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Product store operation error.
///
/// These are **infrastructure errors** (connectivity, constraints, decoding) as
/// opposed to catalog errors (not found, failed validation). The catalog never
/// interprets them; they travel unchanged to the transport layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store handle has not been opened yet, or was closed.
    #[error("store is not connected")]
    NotConnected,

    #[error("connection failure: {0}")]
    Connection(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Explicit open/close lifecycle of a store handle.
///
/// Every [`ProductStore`] operation issued while the handle is not connected fails
/// with [`StoreError::NotConnected`].
#[async_trait]
pub trait StoreLifecycle: Send + Sync {
    /// Open the underlying connection(s). Idempotent.
    async fn connect(&self) -> StoreResult<()>;

    /// Release the underlying connection(s). Idempotent.
    async fn close(&self);

    fn is_connected(&self) -> bool;
}

/// Persistent product storage.
///
/// ## Availability
///
/// Every read and every mutation below is filtered to `available = true`. The
/// availability predicate is part of the mutation itself (conditional update), so
/// a product that is soft-deleted concurrently can never be updated or removed a
/// second time: those calls return `Ok(None)` instead.
///
/// ## Ordering
///
/// Multi-row reads return products in ascending id order (insertion order).
#[async_trait]
pub trait ProductStore: StoreLifecycle {
    /// Insert a new product with `available = true` and return the stored row.
    async fn insert(&self, fields: NewProduct) -> StoreResult<Product>;

    /// Count products with `available = true`.
    async fn count_available(&self) -> StoreResult<u64>;

    /// Skip `offset` available products, then take up to `limit`.
    async fn fetch_available_page(&self, offset: u64, limit: u64) -> StoreResult<Vec<Product>>;

    async fn find_available(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Apply `patch` where `id` matches and the product is available.
    ///
    /// Returns `None` when no row matched.
    async fn update_available(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>>;

    /// Set `available = false` where `id` matches and the product is still available.
    ///
    /// Returns `None` when no row matched.
    async fn mark_unavailable(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Fetch every available product whose id is in `ids`.
    async fn fetch_available_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>>;
}

#[async_trait]
impl<S> StoreLifecycle for Arc<S>
where
    S: StoreLifecycle + ?Sized,
{
    async fn connect(&self) -> StoreResult<()> {
        (**self).connect().await
    }

    async fn close(&self) {
        (**self).close().await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, fields: NewProduct) -> StoreResult<Product> {
        (**self).insert(fields).await
    }

    async fn count_available(&self) -> StoreResult<u64> {
        (**self).count_available().await
    }

    async fn fetch_available_page(&self, offset: u64, limit: u64) -> StoreResult<Vec<Product>> {
        (**self).fetch_available_page(offset, limit).await
    }

    async fn find_available(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).find_available(id).await
    }

    async fn update_available(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>> {
        (**self).update_available(id, patch).await
    }

    async fn mark_unavailable(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).mark_unavailable(id).await
    }

    async fn fetch_available_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        (**self).fetch_available_by_ids(ids).await
    }
}
