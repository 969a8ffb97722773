use serde::{Deserialize, Serialize};

use catalog_core::{DomainResult, PaginationRequest};
use catalog_core::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE};
use catalog_products::{NewProduct, ProductId, ProductPatch};

// -------------------------
// Envelope
// -------------------------

/// Incoming RPC message: a pattern name plus its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEnvelope {
    pub cmd: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

// -------------------------
// Payload DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductPayload {
    pub name: String,
    pub price: f64,
}

impl CreateProductPayload {
    pub fn into_domain(self) -> DomainResult<NewProduct> {
        NewProduct::new(self.name, self.price)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationPayload {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationPayload {
    pub fn into_domain(self) -> DomainResult<PaginationRequest> {
        PaginationRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

/// Lookup by id. Any integer is accepted; unknown ids surface as not found.
#[derive(Debug, Deserialize)]
pub struct IdPayload {
    pub id: i32,
}

impl IdPayload {
    pub fn into_domain(self) -> ProductId {
        ProductId::lookup(self.id)
    }
}

/// Update message: the target id travels next to the changed fields.
///
/// Unlike lookups, the target id must be positive.
#[derive(Debug, Deserialize)]
pub struct UpdateProductPayload {
    pub id: i32,
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl UpdateProductPayload {
    /// Split into the target id and a patch that never carries the id.
    pub fn into_domain(self) -> DomainResult<(ProductId, ProductPatch)> {
        let id = ProductId::new(self.id)?;
        let patch = ProductPatch::new(self.name, self.price)?;
        Ok((id, patch))
    }
}

/// Batch validation accepts either a bare id array or `{ "ids": [...] }`.
///
/// Ids are passed through unchecked so that unknown ones are reported by the
/// batch check itself, and an empty list validates to an empty result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValidateProductsPayload {
    Bare(Vec<i32>),
    Wrapped { ids: Vec<i32> },
}

impl ValidateProductsPayload {
    pub fn into_domain(self) -> Vec<ProductId> {
        let raw = match self {
            ValidateProductsPayload::Bare(ids) => ids,
            ValidateProductsPayload::Wrapped { ids } => ids,
        };
        raw.into_iter().map(ProductId::lookup).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pagination_defaults_to_first_page_of_ten() {
        let req = PaginationPayload::default().into_domain().unwrap();
        assert_eq!((req.page(), req.limit()), (1, 10));
    }

    #[test]
    fn pagination_rejects_zero_limit() {
        let payload: PaginationPayload = serde_json::from_value(json!({ "limit": 0 })).unwrap();
        assert!(payload.into_domain().is_err());
    }

    #[test]
    fn pagination_rejects_negative_page_at_decode_time() {
        assert!(serde_json::from_value::<PaginationPayload>(json!({ "page": -1 })).is_err());
    }

    #[test]
    fn update_payload_strips_id_from_patch() {
        let payload: UpdateProductPayload =
            serde_json::from_value(json!({ "id": 4, "name": "New name" })).unwrap();
        let (id, patch) = payload.into_domain().unwrap();
        assert_eq!(id.get(), 4);
        assert_eq!(patch.name.as_deref(), Some("New name"));
        assert_eq!(patch.price, None);
    }

    #[test]
    fn validate_payload_accepts_both_shapes() {
        let bare: ValidateProductsPayload = serde_json::from_value(json!([1, 2, 2])).unwrap();
        let wrapped: ValidateProductsPayload =
            serde_json::from_value(json!({ "ids": [1, 2, 2] })).unwrap();

        let expected: Vec<i32> = vec![1, 2, 2];
        let ids = |p: ValidateProductsPayload| -> Vec<i32> {
            p.into_domain().iter().map(ProductId::get).collect()
        };
        assert_eq!(ids(bare), expected);
        assert_eq!(ids(wrapped), expected);
    }

    #[test]
    fn validate_payload_passes_empty_and_non_positive_ids_through() {
        let empty: ValidateProductsPayload = serde_json::from_value(json!([])).unwrap();
        assert!(empty.into_domain().is_empty());

        let zero: ValidateProductsPayload = serde_json::from_value(json!([1, 0])).unwrap();
        let ids: Vec<i32> = zero.into_domain().iter().map(ProductId::get).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn lookup_payload_keeps_non_positive_ids() {
        let payload: IdPayload = serde_json::from_value(json!({ "id": -4 })).unwrap();
        assert_eq!(payload.into_domain().get(), -4);
    }

    #[test]
    fn update_payload_requires_positive_id() {
        let payload: UpdateProductPayload =
            serde_json::from_value(json!({ "id": 0, "name": "x" })).unwrap();
        assert!(payload.into_domain().is_err());
    }

    #[test]
    fn create_payload_rejects_blank_name() {
        let payload: CreateProductPayload =
            serde_json::from_value(json!({ "name": " ", "price": 1.5 })).unwrap();
        assert!(payload.into_domain().is_err());
    }
}
