//! Shared test doubles for the workforce platform.
//!
//! [`InMemoryDatabase`] implements the same transaction and store traits as
//! the `PostgreSQL` backend, including version checks and the relational
//! constraints handlers rely on, so application code can be tested without a
//! server.

mod database;
mod failing;
mod index;
mod store;

pub use database::{InMemoryDatabase, InMemoryTransaction};
pub use failing::FailingDatabase;
pub use store::InMemoryStore;
