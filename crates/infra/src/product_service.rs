//! Product catalog operations (application-level orchestration).
//!
//! `ProductCatalogService` owns a [`ProductStore`] handle and implements the
//! catalog contract on top of it:
//!
//! ```text
//! create            → insert (available = true)
//! find_all          → count available, fetch one page, assemble meta
//! find_one          → lookup filtered to available
//! update / remove   → conditional mutation (id AND available), NotFound on zero rows
//! validate_products → dedupe ids, fetch available matches, compare cardinality
//! ```
//!
//! The service holds no mutable state of its own; everything lives in the
//! store. Store failures pass through untouched as `CatalogError::Store`.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{info, instrument};

use catalog_core::{PaginatedResult, PaginationRequest};
use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

use crate::store::{ProductStore, StoreError};

/// Message used when batch validation finds fewer products than requested.
pub const PRODUCTS_NOT_FOUND: &str = "Some products were not found";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failure of a catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product does not exist or has been soft-deleted.
    #[error("Product with id {0} not found")]
    NotFound(ProductId),

    /// Batch validation matched fewer available products than unique ids requested.
    ///
    /// `missing` lists the ids without an available product (ascending).
    #[error("{message}")]
    ValidationFailed {
        message: String,
        missing: Vec<ProductId>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Machine-readable status carried across the RPC boundary.
    pub fn status(&self) -> u16 {
        match self {
            CatalogError::NotFound(_) => 404,
            CatalogError::ValidationFailed { .. } => 400,
            CatalogError::Store(_) => 500,
        }
    }
}

/// Catalog service over an explicit store handle.
#[derive(Debug)]
pub struct ProductCatalogService<S> {
    store: S,
}

impl<S> ProductCatalogService<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open the store handle. Idempotent.
    pub async fn start(&self) -> CatalogResult<()> {
        if self.store.is_connected() {
            return Ok(());
        }
        self.store.connect().await?;
        info!("Connected to the database");
        Ok(())
    }

    /// Close the store handle; later operations fail with `StoreError::NotConnected`.
    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("Disconnected from the database");
    }

    #[instrument(skip(self, input), err)]
    pub async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let product = self.store.insert(input).await?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    #[instrument(skip(self), fields(page = pagination.page(), limit = pagination.limit()), err)]
    pub async fn find_all(
        &self,
        pagination: PaginationRequest,
    ) -> CatalogResult<PaginatedResult<Product>> {
        let total = self.store.count_available().await?;
        let data = self
            .store
            .fetch_available_page(pagination.offset(), u64::from(pagination.limit()))
            .await?;

        Ok(PaginatedResult::new(pagination, data, total))
    }

    #[instrument(skip(self), fields(product_id = %id), err(level = "info"))]
    pub async fn find_one(&self, id: ProductId) -> CatalogResult<Product> {
        self.store
            .find_available(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Apply `patch` to an available product.
    ///
    /// The availability check and the write are one conditional statement, so a
    /// concurrent `remove` cannot slip in between them.
    #[instrument(skip(self, patch), fields(product_id = %id), err(level = "info"))]
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> CatalogResult<Product> {
        self.store
            .update_available(id, patch)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Soft delete: flip `available` off and return the product in that state.
    #[instrument(skip(self), fields(product_id = %id), err(level = "info"))]
    pub async fn remove(&self, id: ProductId) -> CatalogResult<Product> {
        let product = self
            .store
            .mark_unavailable(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        info!(product_id = %id, "product marked unavailable");
        Ok(product)
    }

    /// Check that every requested id (after dedup) names an available product.
    ///
    /// Pass/fail is decided by comparing the number of unique ids with the number
    /// of products fetched. Returns one product per unique id, in id order.
    #[instrument(skip(self, ids), fields(requested = ids.len()), err(level = "info"))]
    pub async fn validate_products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let unique: BTreeSet<ProductId> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let wanted: Vec<ProductId> = unique.iter().copied().collect();
        let products = self.store.fetch_available_by_ids(&wanted).await?;

        if products.len() != unique.len() {
            let found: BTreeSet<ProductId> = products.iter().map(|p| p.id).collect();
            let missing: Vec<ProductId> = unique.difference(&found).copied().collect();
            info!(missing = ?missing, "batch validation failed");
            return Err(CatalogError::ValidationFailed {
                message: PRODUCTS_NOT_FOUND.to_string(),
                missing,
            });
        }

        Ok(products)
    }
}
