//! In-memory location tree queries.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use workforce_core::error::DomainError;
use workforce_core::id::Identifier;
use workforce_core::page::Page;
use workforce_core::sort::{OrderTranslator, SortDirection, SortOrder, SortableProperty};
use workforce_locations::domain::location::{CountryCode, LocationData, LocationId};
use workforce_locations::domain::tree::{
    CountryNode, CountrySortProperty, LocationNode, LocationSearch, LocationSortProperty,
};
use workforce_locations::repository::LocationIndex;

use crate::database::Tables;
use crate::store::InMemoryStore;

/// A comparator term. Strings compare by byte order.
pub struct Comparator<N> {
    compare: fn(&N, &N) -> Ordering,
    direction: SortDirection,
}

impl<N> Comparator<N> {
    fn apply(&self, a: &N, b: &N) -> Ordering {
        let ordering = (self.compare)(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Translates tree sort keys into node comparators.
#[derive(Debug)]
pub struct InMemoryOrder;

impl OrderTranslator<CountrySortProperty> for InMemoryOrder {
    type Term = Comparator<CountryNode>;

    fn term(&self, order: SortOrder<CountrySortProperty>) -> Comparator<CountryNode> {
        let compare: fn(&CountryNode, &CountryNode) -> Ordering = match order.property {
            CountrySortProperty::Country => |a, b| a.country.as_str().cmp(b.country.as_str()),
            CountrySortProperty::EmployeeCount => |a, b| a.employee_count.cmp(&b.employee_count),
        };
        Comparator {
            compare,
            direction: order.direction,
        }
    }
}

impl OrderTranslator<LocationSortProperty> for InMemoryOrder {
    type Term = Comparator<LocationNode>;

    fn term(&self, order: SortOrder<LocationSortProperty>) -> Comparator<LocationNode> {
        let compare: fn(&LocationNode, &LocationNode) -> Ordering = match order.property {
            LocationSortProperty::Name => |a, b| a.name.cmp(&b.name),
            LocationSortProperty::LocationType => {
                |a, b| a.location_type.as_str().cmp(b.location_type.as_str())
            }
            LocationSortProperty::City => |a, b| a.address.city.cmp(&b.address.city),
            LocationSortProperty::EmployeeCount => |a, b| a.employee_count.cmp(&b.employee_count),
        };
        Comparator {
            compare,
            direction: order.direction,
        }
    }
}

/// Sorts `nodes` by the page's keys and `tiebreaker`, then cuts the window.
fn sorted_page<N, P>(
    mut nodes: Vec<N>,
    page: &Page<P>,
    tiebreaker: fn(&N, &N) -> Ordering,
) -> Vec<N>
where
    P: SortableProperty,
    InMemoryOrder: OrderTranslator<P, Term = Comparator<N>>,
{
    let terms = InMemoryOrder.terms(&page.sort);
    nodes.sort_by(|a, b| {
        terms
            .iter()
            .map(|term| term.apply(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| tiebreaker(a, b))
    });

    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    nodes.into_iter().skip(offset).take(limit).collect()
}

fn active_counts(tables: &Tables) -> HashMap<i64, i64> {
    let mut counts = HashMap::new();
    for (_, employee) in tables.employees.rows.values() {
        if employee.status.is_active() {
            *counts.entry(employee.location_id.raw()).or_insert(0) += 1;
        }
    }
    counts
}

fn location_nodes(tables: &Tables) -> impl Iterator<Item = LocationNode> + '_ {
    let counts = active_counts(tables);
    tables.locations.rows.iter().map(move |(id, (_, data))| LocationNode {
        id: LocationId::from_raw(*id),
        name: data.name.clone(),
        employee_count: counts.get(id).copied().unwrap_or(0),
        location_type: data.location_type,
        address: data.address.clone(),
    })
}

fn matching_nodes<'a>(
    tables: &'a Tables,
    country: Option<&'a CountryCode>,
    search: Option<&'a LocationSearch>,
) -> impl Iterator<Item = LocationNode> + 'a {
    location_nodes(tables).filter(move |node| {
        country.is_none_or(|country| node.address.country == *country)
            && search.is_none_or(|search| search.matches(&node.name, &node.address.city))
    })
}

fn count(nodes: impl Iterator<Item = LocationNode>) -> i64 {
    i64::try_from(nodes.count()).unwrap_or(i64::MAX)
}

fn by_id(a: &LocationNode, b: &LocationNode) -> Ordering {
    a.id.cmp(&b.id)
}

#[async_trait]
impl LocationIndex for InMemoryStore<'_, LocationId, LocationData> {
    async fn count_countries_with_locations(
        &mut self,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError> {
        let countries: BTreeSet<CountryCode> = matching_nodes(self.tables, None, search)
            .map(|node| node.address.country)
            .collect();
        Ok(i64::try_from(countries.len()).unwrap_or(i64::MAX))
    }

    async fn count_locations_in_country(
        &mut self,
        country: &CountryCode,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError> {
        Ok(count(matching_nodes(self.tables, Some(country), search)))
    }

    async fn find_countries(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<CountrySortProperty>,
    ) -> Result<Vec<CountryNode>, DomainError> {
        let mut totals: BTreeMap<CountryCode, i64> = BTreeMap::new();
        for node in matching_nodes(self.tables, None, search) {
            *totals.entry(node.address.country).or_insert(0) += node.employee_count;
        }
        let nodes: Vec<CountryNode> = totals
            .into_iter()
            .map(|(country, employee_count)| CountryNode {
                country,
                employee_count,
            })
            .collect();
        Ok(sorted_page(nodes, page, |a, b| {
            a.country.as_str().cmp(b.country.as_str())
        }))
    }

    async fn find_locations(
        &mut self,
        country: &CountryCode,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, DomainError> {
        let nodes: Vec<LocationNode> = matching_nodes(self.tables, Some(country), search).collect();
        Ok(sorted_page(nodes, page, by_id))
    }

    async fn find_location_by_id(
        &mut self,
        id: LocationId,
    ) -> Result<Option<LocationNode>, DomainError> {
        Ok(location_nodes(self.tables).find(|node| node.id == id))
    }

    async fn count_locations(
        &mut self,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError> {
        Ok(count(matching_nodes(self.tables, None, search)))
    }

    async fn list_locations(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, DomainError> {
        let nodes: Vec<LocationNode> = matching_nodes(self.tables, None, search).collect();
        Ok(sorted_page(nodes, page, by_id))
    }
}
