//! Product store boundary.
//!
//! This module defines the conventional query interface the catalog needs
//! (insert, filtered count, filtered page, conditional update) without making
//! any storage assumptions, plus an in-memory and a Postgres implementation.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError, StoreLifecycle, StoreResult};
