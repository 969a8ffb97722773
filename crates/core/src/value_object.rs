//! Value object trait: equality by value, not identity.
//!
//! Value objects carry no identity; two instances with the same attribute values
//! are interchangeable. In this workspace the pagination request and page
//! metadata are value objects, while `Product` is an entity.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (`PaginationRequest { page: 2, limit: 10 }`
///   equals any other request with the same page and limit)
/// - **Entity**: has identity (two products with the same id are the same product,
///   even if one of them was renamed)
///
/// Value objects are immutable: to "change" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Window {
///     offset: u64,
///     limit: u64,
/// }
///
/// impl ValueObject for Window {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
