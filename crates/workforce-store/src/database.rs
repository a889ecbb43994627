//! Pool-backed [`Database`] and its transactions.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use workforce_core::error::DomainError;
use workforce_core::repository::{Database, Transaction};
use workforce_hr::repository::EmployeeTransaction;
use workforce_locations::repository::LocationTransaction;

use crate::aggregate_store::PgAggregateStore;
use crate::error::StoreError;
use crate::schema::MIGRATOR;
use crate::tables::{EmployeeTable, LocationTable};

/// PostgreSQL-backed database.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool of at most `max_connections` connections.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the database cannot be reached.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError` if a migration fails or was modified after
    /// being applied.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PgDatabase {
    type Tx = PgTransaction;

    async fn begin(&self) -> Result<PgTransaction, DomainError> {
        let tx = self.pool.begin().await.map_err(StoreError::from)?;
        Ok(PgTransaction { tx })
    }
}

/// An open `PostgreSQL` transaction. Rolled back on drop unless committed.
pub struct PgTransaction {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(StoreError::from)?;
        Ok(())
    }
}

impl LocationTransaction for PgTransaction {
    type Locations<'t>
        = PgAggregateStore<'t, LocationTable>
    where
        Self: 't;

    fn locations(&mut self) -> Self::Locations<'_> {
        PgAggregateStore::new(&mut *self.tx)
    }
}

impl EmployeeTransaction for PgTransaction {
    type Employees<'t>
        = PgAggregateStore<'t, EmployeeTable>
    where
        Self: 't;

    fn employees(&mut self) -> Self::Employees<'_> {
        PgAggregateStore::new(&mut *self.tx)
    }
}
