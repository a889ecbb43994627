//! `employees` table.

use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, Row};
use workforce_core::id::Identifier;
use workforce_hr::domain::employee::{EmployeeData, EmployeeId};
use workforce_locations::domain::location::LocationId;

use crate::aggregate_store::AggregateTable;
use crate::error::{StoreError, parse_column};
use crate::schema::EMPLOYEES_TABLE;

/// Table mapping of the Employee aggregate. Employees own no child rows.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeTable;

impl AggregateTable for EmployeeTable {
    type Id = EmployeeId;
    type Data = EmployeeData;

    const TABLE: &'static str = EMPLOYEES_TABLE;
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "location_id",
        "status",
        "hired_on",
    ];

    fn push_values(values: &mut Separated<'_, '_, Postgres, &'static str>, data: &EmployeeData) {
        values
            .push_bind(data.first_name.clone())
            .push_bind(data.last_name.clone())
            .push_bind(data.email.clone())
            .push_bind(data.location_id.raw())
            .push_bind(data.status.as_str())
            .push_bind(data.hired_on);
    }

    fn decode(row: &PgRow) -> Result<EmployeeData, StoreError> {
        let hired_on: NaiveDate = row.try_get("hired_on")?;
        Ok(EmployeeData {
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            location_id: LocationId::from_raw(row.try_get("location_id")?),
            status: parse_column("status", row.try_get("status")?)?,
            hired_on,
        })
    }
}
