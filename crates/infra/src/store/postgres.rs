//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Constraint` |
//! | Database (foreign key violation) | `23503` | `Constraint` |
//! | Database (check constraint violation) | `23514` | `Constraint` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / PoolTimedOut / Io / Tls | N/A | `Connection` |
//! | ColumnDecode / Decode / ColumnNotFound | N/A | `Decode` |
//! | Other | N/A | `Backend` |
//!
//! ## Lifecycle
//!
//! A freshly built store holds no pool. `connect()` opens one with the
//! configured limits, `close()` drains and drops it. Calls made in between
//! fail with `StoreError::NotConnected`.

use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use tracing::{Span, instrument};

use catalog_products::{NewProduct, Product, ProductId, ProductPatch};

use super::r#trait::{ProductStore, StoreError, StoreLifecycle, StoreResult};
use crate::config::DatabaseConfig;

const PRODUCT_COLUMNS: &str = "id, name, price, available, created_at, updated_at";

/// Postgres-backed product store.
///
/// ## Thread Safety
///
/// The SQLx pool is internally reference counted; each call clones the handle
/// out of the lock before awaiting, so no lock is held across a query.
///
/// ## Availability
///
/// Every statement carries `available = TRUE` in its `WHERE` clause, including
/// the `UPDATE`s, so soft-deleted rows can neither be read nor mutated.
#[derive(Debug)]
pub struct PostgresProductStore {
    config: DatabaseConfig,
    pool: RwLock<Option<PgPool>>,
}

impl PostgresProductStore {
    /// Build an unconnected store. Call `connect()` before issuing queries.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    fn pool(&self) -> StoreResult<PgPool> {
        let guard = self
            .pool
            .read()
            .map_err(|_| StoreError::Backend("pool lock poisoned".to_string()))?;
        guard.clone().ok_or(StoreError::NotConnected)
    }

    /// Create the `product` table and its availability index if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product (
                id          SERIAL PRIMARY KEY,
                name        TEXT NOT NULL,
                price       DOUBLE PRECISION NOT NULL,
                available   BOOLEAN NOT NULL DEFAULT TRUE,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| map_sqlx_error("create_table", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS product_available_idx ON product (available)")
            .execute(&pool)
            .await
            .map_err(|e| map_sqlx_error("create_index", e))?;

        Ok(())
    }
}

#[async_trait]
impl StoreLifecycle for PostgresProductStore {
    #[instrument(skip(self), fields(max_connections = self.config.max_connections), err)]
    async fn connect(&self) -> StoreResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.acquire_timeout)
            .connect(&self.config.url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let mut guard = self
            .pool
            .write()
            .map_err(|_| StoreError::Backend("pool lock poisoned".to_string()))?;
        *guard = Some(pool);
        Ok(())
    }

    async fn close(&self) {
        let pool = match self.pool.write() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(pool) = pool {
            pool.close().await;
        }
    }

    fn is_connected(&self) -> bool {
        self.pool
            .read()
            .map(|guard| guard.as_ref().is_some_and(|p| !p.is_closed()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, new_product), fields(product_id = tracing::field::Empty), err)]
    async fn insert(&self, new_product: NewProduct) -> StoreResult<Product> {
        let pool = self.pool()?;

        let row = sqlx::query(&format!(
            "INSERT INTO product (name, price) VALUES ($1, $2) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new_product.name)
        .bind(new_product.price)
        .fetch_one(&pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        let product = product_from_row(&row)?;
        Span::current().record("product_id", product.id.get());
        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn count_available(&self) -> StoreResult<u64> {
        let pool = self.pool()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE available = TRUE")
            .fetch_one(&pool)
            .await
            .map_err(|e| map_sqlx_error("count_available", e))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    #[instrument(skip(self), err)]
    async fn fetch_available_page(&self, offset: u64, limit: u64) -> StoreResult<Vec<Product>> {
        let pool = self.pool()?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE available = TRUE
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_available_page", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_available(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let pool = self.pool()?;

        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1 AND available = TRUE"
        ))
        .bind(id.get())
        .fetch_optional(&pool)
        .await
        .map_err(|e| map_sqlx_error("find_available", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    async fn update_available(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> StoreResult<Option<Product>> {
        let pool = self.pool()?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE product
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                updated_at = NOW()
            WHERE id = $1 AND available = TRUE
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(patch.name)
        .bind(patch.price)
        .fetch_optional(&pool)
        .await
        .map_err(|e| map_sqlx_error("update_available", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn mark_unavailable(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let pool = self.pool()?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE product
            SET available = FALSE, updated_at = NOW()
            WHERE id = $1 AND available = TRUE
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.get())
        .fetch_optional(&pool)
        .await
        .map_err(|e| map_sqlx_error("mark_unavailable", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()), err)]
    async fn fetch_available_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        let pool = self.pool()?;
        let raw: Vec<i32> = ids.iter().map(ProductId::get).collect();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE id = ANY($1) AND available = TRUE
            ORDER BY id ASC
            "#
        ))
        .bind(raw)
        .fetch_all(&pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_available_by_ids", e))?;

        rows.iter().map(product_from_row).collect()
    }
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());

    Ok(Product {
        id: ProductId::from_store(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        available: row.try_get("available").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                // unique, foreign key, check
                Some("23505") | Some("23503") | Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Connection(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Connection(format!("timed out acquiring a connection in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Connection(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Connection(format!("tls error in {}: {}", operation, e)),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => StoreError::Decode(format!("{} in {}", err, operation)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
