//! Query handlers for the HR context.

use workforce_core::error::DomainError;
use workforce_core::repository::{AggregateStore, Database, Transaction};

use crate::domain::employee::{Employee, EmployeeId};
use crate::repository::EmployeeTransaction;

/// Retrieves an employee by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no employee has this id.
pub async fn get_employee<D>(db: &D, id: EmployeeId) -> Result<Employee, DomainError>
where
    D: Database,
    D::Tx: EmployeeTransaction,
{
    let mut tx = db.begin().await?;
    let employee = tx.employees().find_by_id(id).await?;
    tx.commit().await?;
    employee.ok_or_else(|| DomainError::not_found(id))
}
