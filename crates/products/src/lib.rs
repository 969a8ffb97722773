//! Products domain module.
//!
//! This crate contains the catalog's entity and its create/patch shapes,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{NewProduct, Product, ProductId, ProductPatch, MAX_PRICE_DECIMALS};
