//! `locations` and its `location_facilities` child table.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{PgConnection, Postgres, QueryBuilder, Row};
use workforce_core::id::Identifier;
use workforce_locations::domain::facility::{Facilities, LocationFacility};
use workforce_locations::domain::location::{Address, LocationData, LocationId};

use crate::aggregate_store::AggregateTable;
use crate::error::{StoreError, narrow_column, parse_column};
use crate::schema::{LOCATION_FACILITIES_TABLE, LOCATIONS_TABLE};

/// Table mapping of the Location aggregate.
#[derive(Debug, Clone, Copy)]
pub struct LocationTable;

/// Reads the address columns shared by the aggregate and its tree projection.
pub(crate) fn decode_address(row: &PgRow) -> Result<Address, StoreError> {
    Ok(Address {
        street: row.try_get("street")?,
        postal_code: row.try_get("postal_code")?,
        city: row.try_get("city")?,
        country: parse_column("country_code", row.try_get("country_code")?)?,
    })
}

#[async_trait]
impl AggregateTable for LocationTable {
    type Id = LocationId;
    type Data = LocationData;

    const TABLE: &'static str = LOCATIONS_TABLE;
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "location_type",
        "street",
        "postal_code",
        "city",
        "country_code",
    ];

    fn push_values(values: &mut Separated<'_, '_, Postgres, &'static str>, data: &LocationData) {
        values
            .push_bind(data.name.clone())
            .push_bind(data.location_type.as_str())
            .push_bind(data.address.street.clone())
            .push_bind(data.address.postal_code.clone())
            .push_bind(data.address.city.clone())
            .push_bind(data.address.country.as_str().to_owned());
    }

    fn decode(row: &PgRow) -> Result<LocationData, StoreError> {
        Ok(LocationData {
            name: row.try_get("name")?,
            location_type: parse_column("location_type", row.try_get("location_type")?)?,
            address: decode_address(row)?,
            facilities: Facilities::default(),
        })
    }

    async fn load_children(
        conn: &mut PgConnection,
        id: LocationId,
        data: &mut LocationData,
    ) -> Result<(), StoreError> {
        let sql = format!(
            "SELECT kind, amount FROM {LOCATION_FACILITIES_TABLE} WHERE location_id = $1 ORDER BY kind"
        );
        let rows: Vec<(String, Option<i64>)> = sqlx::query_as(&sql)
            .bind(id.raw())
            .fetch_all(&mut *conn)
            .await?;

        for (kind, amount) in rows {
            let kind = parse_column("kind", kind)?;
            let amount = amount.map(|raw| narrow_column("amount", raw)).transpose()?;
            let facility = LocationFacility::from_parts(kind, amount).map_err(|_| {
                StoreError::Corrupt {
                    column: "amount",
                    value: format!("{amount:?}"),
                }
            })?;
            data.facilities.insert(facility);
        }
        Ok(())
    }

    async fn replace_children(
        conn: &mut PgConnection,
        id: LocationId,
        data: &LocationData,
    ) -> Result<(), StoreError> {
        Self::delete_children(&mut *conn, id).await?;
        if data.facilities.is_empty() {
            return Ok(());
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {LOCATION_FACILITIES_TABLE} (location_id, kind, amount) "
        ));
        qb.push_values(data.facilities.iter(), |mut row, facility| {
            row.push_bind(id.raw())
                .push_bind(facility.kind().as_str())
                .push_bind(facility.amount().map(i64::from));
        });
        qb.build().execute(&mut *conn).await?;

        tracing::trace!(location_id = id.raw(), facilities = data.facilities.len(), "facilities replaced");
        Ok(())
    }

    async fn delete_children(conn: &mut PgConnection, id: LocationId) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {LOCATION_FACILITIES_TABLE} WHERE location_id = $1");
        sqlx::query(&sql).bind(id.raw()).execute(&mut *conn).await?;
        Ok(())
    }
}
