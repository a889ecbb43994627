//! Route modules organized by bounded context.

use serde::Deserialize;
use workforce_core::sort::SortParam;
use workforce_locations::domain::tree::LocationSearch;

use crate::error::ApiError;

pub mod employees;
pub mod health;
pub mod location_tree;
pub mod locations;

/// Page size when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 20;

/// Pagination, sort and search query string:
/// `?limit=10&offset=20&sort=name:asc,city:desc&search=holm`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u64>,
    /// Comma-separated `property[:direction]` list.
    pub sort: Option<String>,
    /// Substring of a location name or city.
    pub search: Option<String>,
}

impl PageQuery {
    /// Page size, defaulting to [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Rows to skip, defaulting to zero.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    /// Search filter; a blank term means none.
    #[must_use]
    pub fn search(&self) -> Option<LocationSearch> {
        self.search.as_deref().and_then(LocationSearch::new)
    }

    /// Parsed sort keys; property names are resolved later against the
    /// level being queried.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed direction.
    pub fn sort(&self) -> Result<Vec<SortParam>, ApiError> {
        match &self.sort {
            None => Ok(Vec::new()),
            Some(raw) => Ok(SortParam::parse_list(raw)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::sort::SortDirection;

    #[test]
    fn test_empty_query_uses_defaults() {
        let query = PageQuery::default();

        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.offset(), 0);
        assert!(query.sort().unwrap().is_empty());
        assert!(query.search().is_none());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = PageQuery {
            search: Some("  ".to_owned()),
            ..PageQuery::default()
        };

        assert!(query.search().is_none());
    }

    #[test]
    fn test_sort_list_keeps_caller_order() {
        let query = PageQuery {
            sort: Some("employeeCount:desc,name".to_owned()),
            ..PageQuery::default()
        };

        let sort = query.sort().unwrap();

        assert_eq!(sort.len(), 2);
        assert_eq!(sort[0].property, "employeeCount");
        assert_eq!(sort[0].direction, SortDirection::Descending);
        assert_eq!(sort[1].property, "name");
        assert_eq!(sort[1].direction, SortDirection::Ascending);
    }
}
