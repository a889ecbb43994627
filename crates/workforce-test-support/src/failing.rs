//! A database that cannot be reached.

use async_trait::async_trait;
use workforce_core::error::DomainError;
use workforce_core::repository::Database;

use crate::database::InMemoryTransaction;

/// A database whose `begin` always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDatabase;

#[async_trait]
impl Database for FailingDatabase {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
