//! SQL rendering of sort keys and page windows.
//!
//! Sort keys are only ever rendered from the closed property enums, so no
//! caller-supplied text reaches an `ORDER BY` clause.

use std::fmt;

use sqlx::{Postgres, QueryBuilder};
use workforce_core::page::Page;
use workforce_core::sort::{OrderTranslator, SortDirection, SortOrder, SortableProperty};
use workforce_locations::domain::tree::{CountrySortProperty, LocationSortProperty};

/// Column alias of the derived active-employee count.
pub(crate) const EMPLOYEE_COUNT: &str = "employee_count";

/// One `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    /// Column or alias.
    pub expression: &'static str,
    /// Direction.
    pub direction: SortDirection,
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        write!(f, "{} {direction}", self.expression)
    }
}

/// Translates tree sort keys into `PostgreSQL` order terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgOrderBy;

impl OrderTranslator<CountrySortProperty> for PgOrderBy {
    type Term = OrderTerm;

    fn term(&self, order: SortOrder<CountrySortProperty>) -> OrderTerm {
        let expression = match order.property {
            CountrySortProperty::Country => "l.country_code",
            CountrySortProperty::EmployeeCount => EMPLOYEE_COUNT,
        };
        OrderTerm {
            expression,
            direction: order.direction,
        }
    }
}

impl OrderTranslator<LocationSortProperty> for PgOrderBy {
    type Term = OrderTerm;

    fn term(&self, order: SortOrder<LocationSortProperty>) -> OrderTerm {
        let expression = match order.property {
            LocationSortProperty::Name => "l.name",
            LocationSortProperty::LocationType => "l.location_type",
            LocationSortProperty::City => "l.city",
            LocationSortProperty::EmployeeCount => EMPLOYEE_COUNT,
        };
        OrderTerm {
            expression,
            direction: order.direction,
        }
    }
}

/// Appends `ORDER BY` with the page's keys followed by `tiebreaker`, then the
/// page window.
///
/// The tie-breaker must be unique per row so that consecutive pages never
/// overlap or skip rows.
pub(crate) fn push_sorted_page<P>(
    qb: &mut QueryBuilder<'_, Postgres>,
    page: &Page<P>,
    tiebreaker: &'static str,
) where
    P: SortableProperty,
    PgOrderBy: OrderTranslator<P, Term = OrderTerm>,
{
    qb.push(" ORDER BY ");
    for term in PgOrderBy.terms(&page.sort) {
        qb.push(term).push(", ");
    }
    qb.push(tiebreaker).push(" ASC");

    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    qb.push(" LIMIT ")
        .push_bind(i64::from(page.limit()))
        .push(" OFFSET ")
        .push_bind(offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::page::PageRequest;
    use workforce_core::sort::Sort;

    fn render<P>(page: &Page<P>, tiebreaker: &'static str) -> String
    where
        P: SortableProperty,
        PgOrderBy: OrderTranslator<P, Term = OrderTerm>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1");
        push_sorted_page(&mut qb, page, tiebreaker);
        qb.sql().to_owned()
    }

    #[test]
    fn test_unsorted_country_page_orders_by_code() {
        let page = Page::<CountrySortProperty>::unsorted(10, 0).unwrap();

        assert_eq!(
            render(&page, "l.country_code"),
            "SELECT 1 ORDER BY l.country_code ASC, l.country_code ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_keys_render_in_caller_order_before_tiebreaker() {
        let page = Page::new(
            PageRequest::new(5, 10).unwrap(),
            Sort::new(vec![
                SortOrder::descending(LocationSortProperty::EmployeeCount),
                SortOrder::ascending(LocationSortProperty::City),
            ]),
        );

        assert_eq!(
            render(&page, "l.id"),
            "SELECT 1 ORDER BY employee_count DESC, l.city ASC, l.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_location_type_maps_to_its_column() {
        let term = PgOrderBy.term(SortOrder::ascending(LocationSortProperty::LocationType));

        assert_eq!(term.to_string(), "l.location_type ASC");
    }
}
