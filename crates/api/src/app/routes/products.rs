//! One handler per product message pattern.
//!
//! Each handler decodes its payload, validates it into domain types, calls
//! the catalog service, and encodes the result as JSON.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::app::dto::{
    CreateProductPayload, IdPayload, PaginationPayload, UpdateProductPayload,
    ValidateProductsPayload,
};
use crate::app::errors::{RpcError, RpcResult};
use crate::app::services::AppServices;

pub const CREATE_PRODUCT: &str = "create_product";
pub const FIND_ALL_PRODUCTS: &str = "find_all_products";
pub const FIND_ONE_PRODUCT: &str = "find_one_product";
pub const UPDATE_PRODUCT: &str = "update_product";
pub const DELETE_PRODUCT: &str = "delete_product";
pub const VALIDATE_PRODUCTS: &str = "validate_products";

pub async fn create_product(services: &AppServices, payload: serde_json::Value) -> RpcResult {
    let input = decode::<CreateProductPayload>(CREATE_PRODUCT, payload)?.into_domain()?;
    encode(services.create(input).await?)
}

pub async fn find_all_products(services: &AppServices, payload: serde_json::Value) -> RpcResult {
    let pagination = if payload.is_null() {
        PaginationPayload::default()
    } else {
        decode::<PaginationPayload>(FIND_ALL_PRODUCTS, payload)?
    }
    .into_domain()?;

    encode(services.find_all(pagination).await?)
}

pub async fn find_one_product(services: &AppServices, payload: serde_json::Value) -> RpcResult {
    let id = decode::<IdPayload>(FIND_ONE_PRODUCT, payload)?.into_domain();
    encode(services.find_one(id).await?)
}

pub async fn update_product(services: &AppServices, payload: serde_json::Value) -> RpcResult {
    let (id, patch) = decode::<UpdateProductPayload>(UPDATE_PRODUCT, payload)?.into_domain()?;
    encode(services.update(id, patch).await?)
}

pub async fn delete_product(services: &AppServices, payload: serde_json::Value) -> RpcResult {
    let id = decode::<IdPayload>(DELETE_PRODUCT, payload)?.into_domain();
    encode(services.remove(id).await?)
}

pub async fn validate_products(services: &AppServices, payload: serde_json::Value) -> RpcResult {
    let ids = decode::<ValidateProductsPayload>(VALIDATE_PRODUCTS, payload)?.into_domain();
    encode(services.validate_products(&ids).await?)
}

fn decode<T: DeserializeOwned>(cmd: &str, payload: serde_json::Value) -> Result<T, RpcError> {
    serde_json::from_value(payload)
        .map_err(|e| RpcError::bad_request(format!("invalid payload for {cmd}: {e}")))
}

fn encode<T: Serialize>(value: T) -> RpcResult {
    serde_json::to_value(value)
        .map_err(|e| RpcError::internal(format!("failed to encode response: {e}")))
}
