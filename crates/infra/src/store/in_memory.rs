use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::Entity;
use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

use super::r#trait::{ProductStore, StoreError, StoreLifecycle, StoreResult};

#[derive(Debug, Default)]
struct Rows {
    last_id: i32,
    by_id: BTreeMap<ProductId, Product>,
}

impl Rows {
    fn available(&self) -> impl Iterator<Item = &Product> {
        self.by_id.values().filter(|p| p.is_live())
    }

    fn available_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.by_id.get_mut(&id).filter(|p| p.is_live())
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. Ids come from a sequence starting at 1, and the
/// handle is connected on construction.
#[derive(Debug)]
pub struct InMemoryProductStore {
    rows: RwLock<Rows>,
    connected: AtomicBool,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows::default()),
            connected: AtomicBool::new(true),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Rows>> {
        if !self.is_connected() {
            return Err(StoreError::NotConnected);
        }
        self.rows
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Rows>> {
        if !self.is_connected() {
            return Err(StoreError::NotConnected);
        }
        self.rows
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreLifecycle for InMemoryProductStore {
    async fn connect(&self) -> StoreResult<()> {
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) {
        self.connected.store(false, Ordering::Release);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, fields: NewProduct) -> StoreResult<Product> {
        let mut rows = self.write()?;
        let next = rows
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Constraint("product id sequence exhausted".to_string()))?;
        rows.last_id = next;

        let id = ProductId::from_store(next);
        let product = Product::created(id, fields, Utc::now());
        rows.by_id.insert(id, product.clone());
        Ok(product)
    }

    async fn count_available(&self) -> StoreResult<u64> {
        let rows = self.read()?;
        Ok(rows.available().count() as u64)
    }

    async fn fetch_available_page(&self, offset: u64, limit: u64) -> StoreResult<Vec<Product>> {
        let rows = self.read()?;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.available().skip(offset).take(limit).cloned().collect())
    }

    async fn find_available(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let rows = self.read()?;
        Ok(rows.by_id.get(&id).filter(|p| p.is_live()).cloned())
    }

    async fn update_available(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>> {
        let mut rows = self.write()?;
        Ok(rows.available_mut(id).map(|product| {
            product.apply_patch(&patch, Utc::now());
            product.clone()
        }))
    }

    async fn mark_unavailable(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let mut rows = self.write()?;
        Ok(rows.available_mut(id).map(|product| {
            product.mark_unavailable(Utc::now());
            product.clone()
        }))
    }

    async fn fetch_available_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        let rows = self.read()?;
        Ok(rows
            .available()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}
