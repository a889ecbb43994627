//! Store traits for the HR context.

use workforce_core::repository::{AggregateStore, Transaction};

use crate::domain::employee::{EmployeeData, EmployeeId};

/// A transaction that can reach the employee store.
pub trait EmployeeTransaction: Transaction {
    /// Employee store borrowed from this transaction.
    type Employees<'t>: AggregateStore<EmployeeId, EmployeeData>
    where
        Self: 't;

    /// Joins this transaction with the employee store.
    fn employees(&mut self) -> Self::Employees<'_>;
}
