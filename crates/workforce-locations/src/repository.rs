//! Store traits for the Locations context.

use async_trait::async_trait;
use workforce_core::error::DomainError;
use workforce_core::page::Page;
use workforce_core::repository::{AggregateStore, Transaction};

use crate::domain::location::{CountryCode, LocationData, LocationId};
use crate::domain::tree::{
    CountryNode, CountrySortProperty, LocationNode, LocationSearch, LocationSortProperty,
};

/// Read-side queries behind the location tree.
///
/// Each level is an independent paginated query; the full tree is never
/// materialised. Employee counts are derived from employment data at query
/// time and default to zero for locations without active employees.
///
/// Every count agrees with the unpaginated result of its find under the same
/// `search`.
#[async_trait]
pub trait LocationIndex: Send {
    /// Number of distinct countries having at least one matching location.
    async fn count_countries_with_locations(
        &mut self,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError>;

    /// Number of matching locations in `country`.
    async fn count_locations_in_country(
        &mut self,
        country: &CountryCode,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError>;

    /// One node per country having matching locations, sorted and paginated.
    async fn find_countries(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<CountrySortProperty>,
    ) -> Result<Vec<CountryNode>, DomainError>;

    /// One node per matching location in `country`, sorted and paginated.
    async fn find_locations(
        &mut self,
        country: &CountryCode,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, DomainError>;

    /// Direct node lookup, bypassing country grouping.
    async fn find_location_by_id(
        &mut self,
        id: LocationId,
    ) -> Result<Option<LocationNode>, DomainError>;

    /// Number of matching locations across all countries.
    async fn count_locations(&mut self, search: Option<&LocationSearch>)
    -> Result<i64, DomainError>;

    /// Flat, ungrouped listing with the same projection as `find_locations`.
    async fn list_locations(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, DomainError>;
}

/// A transaction that can reach the location store.
pub trait LocationTransaction: Transaction {
    /// Location store borrowed from this transaction.
    type Locations<'t>: AggregateStore<LocationId, LocationData> + LocationIndex
    where
        Self: 't;

    /// Joins this transaction with the location store.
    fn locations(&mut self) -> Self::Locations<'_>;
}
