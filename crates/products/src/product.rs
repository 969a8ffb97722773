use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, Entity};

/// Maximum number of decimal places accepted for a price.
pub const MAX_PRICE_DECIMALS: usize = 4;

/// Store-assigned product identifier.
///
/// The store's sequence starts at 1. Lookup ids coming from callers are not
/// range-checked: an id the store never assigned simply matches nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Build an identifier from a raw value, rejecting non-positive ids.
    pub fn new(raw: i32) -> DomainResult<Self> {
        if raw < 1 {
            return Err(DomainError::invalid_id(format!(
                "ProductId: {raw} is not a positive integer"
            )));
        }
        Ok(Self(raw))
    }

    /// Wrap a value read back from the store without re-validating it.
    pub fn from_store(raw: i32) -> Self {
        Self(raw)
    }

    /// Wrap a caller-supplied id used only to look a product up.
    pub fn lookup(raw: i32) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A catalog product as persisted by the store.
///
/// `available == false` marks a soft-deleted product: it stays in storage for
/// history but is invisible to every read, update and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a freshly inserted product.
    pub fn created(id: ProductId, fields: NewProduct, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            available: true,
            created_at: at,
            updated_at: at,
        }
    }

    /// Apply a partial update in place. Identity and availability are untouched.
    pub fn apply_patch(&mut self, patch: &ProductPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = at;
    }

    /// Soft delete: flip `available` off, leave every other field as is.
    pub fn mark_unavailable(&mut self, at: DateTime<Utc>) {
        self.available = false;
        self.updated_at = at;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn is_live(&self) -> bool {
        self.available
    }
}

/// Fields supplied by the caller when creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

impl NewProduct {
    /// Build creation fields, checking name and price shape.
    pub fn new(name: impl Into<String>, price: f64) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        validate_price(price)?;
        Ok(Self { name, price })
    }
}

/// Partial update for a product.
///
/// Has no `id` field: identity is immutable, and an id sent alongside the
/// changes is dropped when the patch is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ProductPatch {
    /// Build a patch, checking the shape of every field that is present.
    pub fn new(name: Option<String>, price: Option<f64>) -> DomainResult<Self> {
        if let Some(name) = &name {
            validate_name(name)?;
        }
        if let Some(price) = price {
            validate_price(price)?;
        }
        Ok(Self { name, price })
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() {
        return Err(DomainError::validation("price must be a finite number"));
    }
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    // Display for f64 yields the shortest round-tripping form, so the digits after
    // the point are exactly the decimals the caller sent.
    let rendered = price.to_string();
    let decimals = rendered.split_once('.').map_or(0, |(_, frac)| frac.len());
    if decimals > MAX_PRICE_DECIMALS {
        return Err(DomainError::validation(format!(
            "price cannot have more than {MAX_PRICE_DECIMALS} decimal places"
        )));
    }
    Ok(())
}
