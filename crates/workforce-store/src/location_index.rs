//! Location tree queries.
//!
//! Employee counts come from a `LEFT JOIN` on active employees, so locations
//! without any count as zero instead of disappearing from the result.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use workforce_core::error::DomainError;
use workforce_core::id::Identifier;
use workforce_core::page::Page;
use workforce_hr::domain::employee::EmploymentStatus;
use workforce_locations::domain::location::{CountryCode, LocationId};
use workforce_locations::domain::tree::{
    CountryNode, CountrySortProperty, LocationNode, LocationSearch, LocationSortProperty,
};
use workforce_locations::repository::LocationIndex;

use crate::aggregate_store::PgAggregateStore;
use crate::error::{StoreError, parse_column};
use crate::order::{EMPLOYEE_COUNT, push_sorted_page};
use crate::schema::{EMPLOYEES_TABLE, LOCATIONS_TABLE};
use crate::tables::LocationTable;
use crate::tables::location::decode_address;

/// Starts a location projection query. Binds `$1` to the active status.
fn location_projection<'a>() -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT l.id, l.name, l.location_type, l.street, l.postal_code, l.city, l.country_code, \
         COUNT(e.id) AS {EMPLOYEE_COUNT} \
         FROM {LOCATIONS_TABLE} l \
         LEFT JOIN {EMPLOYEES_TABLE} e ON e.location_id = l.id AND e.status = "
    ));
    qb.push_bind(EmploymentStatus::Active.as_str());
    qb
}

/// `ILIKE` pattern matching `term` anywhere, with its wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Appends the `WHERE` clause for a country and a search term, if any.
fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    country: Option<&CountryCode>,
    search: Option<&LocationSearch>,
) {
    let mut keyword = " WHERE ";
    if let Some(country) = country {
        qb.push(keyword)
            .push("l.country_code = ")
            .push_bind(country.as_str().to_owned());
        keyword = " AND ";
    }
    if let Some(search) = search {
        let pattern = like_pattern(search.term());
        qb.push(keyword)
            .push("(l.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR l.city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn decode_country_node(row: &PgRow) -> Result<CountryNode, StoreError> {
    Ok(CountryNode {
        country: parse_column("country_code", row.try_get("country_code")?)?,
        employee_count: row.try_get(EMPLOYEE_COUNT)?,
    })
}

fn decode_location_node(row: &PgRow) -> Result<LocationNode, StoreError> {
    Ok(LocationNode {
        id: LocationId::from_raw(row.try_get("id")?),
        name: row.try_get("name")?,
        employee_count: row.try_get(EMPLOYEE_COUNT)?,
        location_type: parse_column("location_type", row.try_get("location_type")?)?,
        address: decode_address(row)?,
    })
}

impl PgAggregateStore<'_, LocationTable> {
    async fn count(
        &mut self,
        country: Option<&CountryCode>,
        search: Option<&LocationSearch>,
    ) -> Result<i64, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {LOCATIONS_TABLE} l"));
        push_filters(&mut qb, country, search);
        Ok(qb.build_query_scalar().fetch_one(&mut *self.conn).await?)
    }

    async fn count_countries(&mut self, search: Option<&LocationSearch>) -> Result<i64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(DISTINCT l.country_code) FROM {LOCATIONS_TABLE} l"
        ));
        push_filters(&mut qb, None, search);
        Ok(qb.build_query_scalar().fetch_one(&mut *self.conn).await?)
    }

    async fn country_page(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<CountrySortProperty>,
    ) -> Result<Vec<CountryNode>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT l.country_code, COUNT(e.id) AS {EMPLOYEE_COUNT} \
             FROM {LOCATIONS_TABLE} l \
             LEFT JOIN {EMPLOYEES_TABLE} e ON e.location_id = l.id AND e.status = "
        ));
        qb.push_bind(EmploymentStatus::Active.as_str());
        push_filters(&mut qb, None, search);
        qb.push(" GROUP BY l.country_code");
        push_sorted_page(&mut qb, page, "l.country_code");

        let rows = qb.build().fetch_all(&mut *self.conn).await?;
        rows.iter().map(decode_country_node).collect()
    }

    async fn location_page(
        &mut self,
        country: Option<&CountryCode>,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, StoreError> {
        let mut qb = location_projection();
        push_filters(&mut qb, country, search);
        qb.push(" GROUP BY l.id");
        push_sorted_page(&mut qb, page, "l.id");

        let rows = qb.build().fetch_all(&mut *self.conn).await?;
        rows.iter().map(decode_location_node).collect()
    }

    async fn location_node(&mut self, id: LocationId) -> Result<Option<LocationNode>, StoreError> {
        let mut qb = location_projection();
        qb.push(" WHERE l.id = ")
            .push_bind(id.raw())
            .push(" GROUP BY l.id");

        let row = qb.build().fetch_optional(&mut *self.conn).await?;
        row.as_ref().map(decode_location_node).transpose()
    }
}

#[async_trait]
impl LocationIndex for PgAggregateStore<'_, LocationTable> {
    async fn count_countries_with_locations(
        &mut self,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError> {
        Ok(self.count_countries(search).await?)
    }

    async fn count_locations_in_country(
        &mut self,
        country: &CountryCode,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError> {
        Ok(self.count(Some(country), search).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_countries(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<CountrySortProperty>,
    ) -> Result<Vec<CountryNode>, DomainError> {
        Ok(self.country_page(search, page).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_locations(
        &mut self,
        country: &CountryCode,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, DomainError> {
        Ok(self.location_page(Some(country), search, page).await?)
    }

    async fn find_location_by_id(
        &mut self,
        id: LocationId,
    ) -> Result<Option<LocationNode>, DomainError> {
        Ok(self.location_node(id).await?)
    }

    async fn count_locations(
        &mut self,
        search: Option<&LocationSearch>,
    ) -> Result<i64, DomainError> {
        Ok(self.count(None, search).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_locations(
        &mut self,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<Vec<LocationNode>, DomainError> {
        Ok(self.location_page(None, search, page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("holm"), "%holm%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_filters_join_with_and() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM locations l");
        let country = CountryCode::new("SE").unwrap();
        let search = LocationSearch::new("holm").unwrap();

        push_filters(&mut qb, Some(&country), Some(&search));

        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM locations l WHERE l.country_code = $1 \
             AND (l.name ILIKE $2 OR l.city ILIKE $3)"
        );
    }

    #[test]
    fn test_no_filters_leave_query_untouched() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1");

        push_filters(&mut qb, None, None);

        assert_eq!(qb.sql(), "SELECT 1");
    }
}
