//! Query handlers for the Locations context.
//!
//! Tree queries resolve caller sort names against the vocabulary of the level
//! being fetched: country properties at the root, location properties below a
//! country node.

use serde::Serialize;
use workforce_core::error::DomainError;
use workforce_core::page::Page;
use workforce_core::repository::{AggregateStore, Database, Transaction};
use workforce_core::sort::SortParam;

use crate::domain::location::{CountryCode, Location, LocationId};
use crate::domain::tree::{LocationNode, LocationSearch, LocationSortProperty, LocationTreeNode};
use crate::repository::{LocationIndex, LocationTransaction};

/// One fetched level of the location tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeLevel {
    /// Total number of children of the parent, across all pages.
    pub total: i64,
    /// The requested page of children.
    pub nodes: Vec<LocationTreeNode>,
}

/// One page of the flat location listing.
#[derive(Debug, Clone, Serialize)]
pub struct LocationListing {
    /// Total number of locations.
    pub total: i64,
    /// The requested page.
    pub items: Vec<LocationNode>,
}

/// Retrieves a location aggregate by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no location has this id.
pub async fn get_location<D>(db: &D, id: LocationId) -> Result<Location, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let mut tx = db.begin().await?;
    let location = tx.locations().find_by_id(id).await?;
    tx.commit().await?;
    location.ok_or_else(|| DomainError::not_found(id))
}

/// Number of children of `parent` matching `search`; `None` is the invisible
/// tree root.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure.
pub async fn children_count<D>(
    db: &D,
    parent: Option<&LocationTreeNode>,
    search: Option<&LocationSearch>,
) -> Result<i64, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let mut tx = db.begin().await?;
    let count = match parent {
        None => tx.locations().count_countries_with_locations(search).await?,
        Some(LocationTreeNode::Country(node)) => {
            tx.locations()
                .count_locations_in_country(&node.country, search)
                .await?
        }
        Some(LocationTreeNode::Location(_)) => 0,
    };
    tx.commit().await?;
    Ok(count)
}

async fn country_level<T>(
    tx: &mut T,
    search: Option<&LocationSearch>,
    limit: u32,
    offset: u64,
    sort: &[SortParam],
) -> Result<TreeLevel, DomainError>
where
    T: LocationTransaction,
{
    let page = Page::parse(limit, offset, sort)?;
    let mut locations = tx.locations();
    let total = locations.count_countries_with_locations(search).await?;
    let nodes = locations
        .find_countries(search, &page)
        .await?
        .into_iter()
        .map(LocationTreeNode::Country)
        .collect();
    Ok(TreeLevel { total, nodes })
}

async fn location_level<T>(
    tx: &mut T,
    country: &CountryCode,
    search: Option<&LocationSearch>,
    limit: u32,
    offset: u64,
    sort: &[SortParam],
) -> Result<TreeLevel, DomainError>
where
    T: LocationTransaction,
{
    let page = Page::parse(limit, offset, sort)?;
    let mut locations = tx.locations();
    let total = locations.count_locations_in_country(country, search).await?;
    let nodes = locations
        .find_locations(country, search, &page)
        .await?
        .into_iter()
        .map(LocationTreeNode::Location)
        .collect();
    Ok(TreeLevel { total, nodes })
}

/// Fetches one page of children of `parent` together with the total child
/// count, both read in the same transaction and narrowed by `search`.
///
/// # Errors
///
/// Returns `DomainError::InvalidSortProperty` if `sort` names a property the
/// level does not have, and `DomainError::Validation` for a zero `limit`.
#[tracing::instrument(skip(db, parent, sort))]
pub async fn fetch_children<D>(
    db: &D,
    parent: Option<&LocationTreeNode>,
    search: Option<&LocationSearch>,
    limit: u32,
    offset: u64,
    sort: &[SortParam],
) -> Result<TreeLevel, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let mut tx = db.begin().await?;
    let level = match parent {
        None => country_level(&mut tx, search, limit, offset, sort).await?,
        Some(LocationTreeNode::Country(node)) => {
            location_level(&mut tx, &node.country, search, limit, offset, sort).await?
        }
        Some(LocationTreeNode::Location(_)) => TreeLevel {
            total: 0,
            nodes: Vec::new(),
        },
    };
    tx.commit().await?;

    tracing::debug!(total = level.total, fetched = level.nodes.len(), "tree level fetched");
    Ok(level)
}

/// Fetches one page of the locations of `country`, as when expanding its
/// country node.
///
/// # Errors
///
/// Same as [`fetch_children`].
#[tracing::instrument(skip(db, sort), fields(country = %country))]
pub async fn fetch_country_locations<D>(
    db: &D,
    country: &CountryCode,
    search: Option<&LocationSearch>,
    limit: u32,
    offset: u64,
    sort: &[SortParam],
) -> Result<TreeLevel, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let mut tx = db.begin().await?;
    let level = location_level(&mut tx, country, search, limit, offset, sort).await?;
    tx.commit().await?;
    Ok(level)
}

/// Looks up a location node directly by id.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure.
pub async fn find_node<D>(db: &D, id: LocationId) -> Result<Option<LocationNode>, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let mut tx = db.begin().await?;
    let node = tx.locations().find_location_by_id(id).await?;
    tx.commit().await?;
    Ok(node)
}

/// Fetches one page of the flat location listing, narrowed by `search`.
///
/// # Errors
///
/// Returns `DomainError::InvalidSortProperty` for an unknown sort name.
pub async fn list_locations<D>(
    db: &D,
    search: Option<&LocationSearch>,
    limit: u32,
    offset: u64,
    sort: &[SortParam],
) -> Result<LocationListing, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let page = Page::<LocationSortProperty>::parse(limit, offset, sort)?;

    let mut tx = db.begin().await?;
    let mut locations = tx.locations();
    let total = locations.count_locations(search).await?;
    let items = locations.list_locations(search, &page).await?;
    drop(locations);
    tx.commit().await?;

    Ok(LocationListing { total, items })
}
