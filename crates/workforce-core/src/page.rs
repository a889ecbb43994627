//! Pagination parameters.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::sort::{Sort, SortParam, SortableProperty};

/// Window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

#[derive(Deserialize)]
struct RawPageRequest {
    limit: u32,
    #[serde(default)]
    offset: u64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = DomainError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.limit, raw.offset)
    }
}

impl PageRequest {
    /// Builds a window of `limit` rows after skipping `offset` rows.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `limit` is zero.
    pub fn new(limit: u32, offset: u64) -> Result<Self, DomainError> {
        if limit == 0 {
            return Err(DomainError::Validation(
                "page limit must be greater than zero".into(),
            ));
        }
        Ok(Self { limit, offset })
    }

    /// Page size.
    #[must_use]
    pub fn limit(self) -> u32 {
        self.limit
    }

    /// Rows skipped before the page starts.
    #[must_use]
    pub fn offset(self) -> u64 {
        self.offset
    }
}

/// A sorted page of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<P> {
    /// Row window.
    pub request: PageRequest,
    /// Sort keys; the query default applies when empty.
    pub sort: Sort<P>,
}

impl<P: SortableProperty> Page<P> {
    /// Builds a page from typed parts.
    #[must_use]
    pub fn new(request: PageRequest, sort: Sort<P>) -> Self {
        Self { request, sort }
    }

    /// Builds a page from raw caller input, resolving sort names against `P`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a zero limit and
    /// `DomainError::InvalidSortProperty` for an unknown sort name.
    pub fn parse(limit: u32, offset: u64, sort: &[SortParam]) -> Result<Self, DomainError> {
        Ok(Self {
            request: PageRequest::new(limit, offset)?,
            sort: Sort::parse(sort)?,
        })
    }

    /// Unsorted page (query default ordering).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `limit` is zero.
    pub fn unsorted(limit: u32, offset: u64) -> Result<Self, DomainError> {
        Ok(Self::new(PageRequest::new(limit, offset)?, Sort::default()))
    }

    /// Page size.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.request.limit()
    }

    /// Rows skipped before the page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.request.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_is_rejected() {
        let result = PageRequest::new(0, 0);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_page_request_keeps_window() {
        let request = PageRequest::new(25, 50).unwrap();

        assert_eq!(request.limit(), 25);
        assert_eq!(request.offset(), 50);
    }

    #[test]
    fn test_deserialized_zero_limit_is_rejected() {
        let result = serde_json::from_str::<PageRequest>(r#"{"limit": 0, "offset": 5}"#);

        assert!(result.unwrap_err().to_string().contains("greater than zero"));
    }

    #[test]
    fn test_deserialized_offset_defaults_to_zero() {
        let request: PageRequest = serde_json::from_str(r#"{"limit": 10}"#).unwrap();

        assert_eq!(request, PageRequest::new(10, 0).unwrap());
    }
}
