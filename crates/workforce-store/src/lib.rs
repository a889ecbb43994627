//! PostgreSQL persistence for the workforce platform.
//!
//! All aggregate types share one versioned-write implementation,
//! [`PgAggregateStore`], parameterised by an [`AggregateTable`] mapping.

pub mod aggregate_store;
pub mod database;
pub mod error;
pub mod location_index;
pub mod order;
pub mod schema;
pub mod tables;

pub use aggregate_store::{AggregateTable, PgAggregateStore};
pub use database::{PgDatabase, PgTransaction};
pub use error::StoreError;
