//! In-memory database with snapshot-based transactions.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use workforce_core::error::DomainError;
use workforce_core::repository::{Database, Transaction};
use workforce_hr::domain::employee::{EmployeeData, EmployeeId};
use workforce_hr::repository::EmployeeTransaction;
use workforce_locations::domain::location::{LocationData, LocationId};
use workforce_locations::repository::LocationTransaction;

use crate::store::InMemoryStore;

/// Rows of one aggregate type: `id -> (version, data)`.
#[derive(Debug, Clone)]
pub struct Table<D> {
    pub(crate) rows: BTreeMap<i64, (i64, D)>,
}

impl<D> Default for Table<D> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

/// All tables of the in-memory database.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub(crate) locations: Table<LocationData>,
    pub(crate) employees: Table<EmployeeData>,
}

/// Identity sequences. Kept outside the snapshot so that, like database
/// sequences, they never go back on rollback.
#[derive(Debug)]
pub struct Sequences {
    pub(crate) locations: AtomicI64,
    pub(crate) employees: AtomicI64,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            locations: AtomicI64::new(1),
            employees: AtomicI64::new(1),
        }
    }
}

impl Sequences {
    pub(crate) fn next(sequence: &AtomicI64) -> i64 {
        sequence.fetch_add(1, Ordering::Relaxed)
    }
}

/// An in-memory [`Database`].
///
/// Transactions are serialised: `begin` waits until the previous transaction
/// has committed or been dropped. Holding two transactions at once from the
/// same task therefore deadlocks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<Mutex<Tables>>,
    sequences: Arc<Sequences>,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    type Tx = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, DomainError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let backup = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            backup: Some(backup),
            sequences: Arc::clone(&self.sequences),
        })
    }
}

/// A transaction over [`InMemoryDatabase`]. Dropping it without `commit`
/// restores the snapshot taken at `begin`.
#[derive(Debug)]
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    backup: Option<Tables>,
    sequences: Arc<Sequences>,
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if let Some(backup) = self.backup.take() {
            *self.guard = backup;
        }
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(mut self) -> Result<(), DomainError> {
        self.backup = None;
        Ok(())
    }
}

impl LocationTransaction for InMemoryTransaction {
    type Locations<'t>
        = InMemoryStore<'t, LocationId, LocationData>
    where
        Self: 't;

    fn locations(&mut self) -> Self::Locations<'_> {
        InMemoryStore::new(&mut self.guard, &self.sequences)
    }
}

impl EmployeeTransaction for InMemoryTransaction {
    type Employees<'t>
        = InMemoryStore<'t, EmployeeId, EmployeeData>
    where
        Self: 't;

    fn employees(&mut self) -> Self::Employees<'_> {
        InMemoryStore::new(&mut self.guard, &self.sequences)
    }
}
