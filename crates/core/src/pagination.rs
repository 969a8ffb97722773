//! Page-based pagination primitives.
//!
//! Pages are 1-based. The arithmetic here is the single source of truth for
//! `offset` and `lastPage`; stores only ever see `(offset, limit)`.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// A validated request for one page of results.
///
/// Both `page` and `limit` are guaranteed to be at least 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PaginationRequest {
    page: u32,
    limit: u32,
}

impl PaginationRequest {
    pub fn new(page: u32, limit: u32) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::validation("page must be a positive number"));
        }
        if limit == 0 {
            return Err(DomainError::validation("limit must be a positive number"));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip before the requested page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Last page index for `total` records at this page size.
    ///
    /// Zero when there are no records at all.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ValueObject for PaginationRequest {}

/// Metadata describing where a page sits in the full result set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    /// Count of all matching records (across every page).
    pub total: u64,
    pub last_page: u64,
}

impl ValueObject for PageMeta {}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResult<T> {
    /// Assemble a page from already-fetched rows and the total match count.
    pub fn new(request: PaginationRequest, data: Vec<T>, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta {
                page: request.page(),
                total,
                last_page: request.last_page(total),
            },
        }
    }
}
