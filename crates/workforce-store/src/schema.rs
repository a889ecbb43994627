//! Database schema.

use sqlx::migrate::Migrator;

/// Embedded migrations from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Location aggregate table.
pub const LOCATIONS_TABLE: &str = "locations";

/// Facility child rows keyed by `(location_id, kind)`.
pub const LOCATION_FACILITIES_TABLE: &str = "location_facilities";

/// Employee aggregate table.
pub const EMPLOYEES_TABLE: &str = "employees";
