//! Command handlers for the HR context.

use workforce_core::error::DomainError;
use workforce_core::id::Version;
use workforce_core::repository::{AggregateStore, Database, Transaction};

use crate::domain::employee::{Employee, EmployeeData, EmployeeId, EmploymentStatus};
use crate::repository::EmployeeTransaction;

/// Registers an employee at version 1 and returns it as stored.
///
/// # Errors
///
/// Returns `DomainError::Validation` for invalid data and
/// `DomainError::ConstraintViolation` if the email is taken or the location
/// does not exist.
#[tracing::instrument(skip(db, data), fields(location_id = %data.location_id))]
pub async fn register_employee<D>(db: &D, data: EmployeeData) -> Result<Employee, DomainError>
where
    D: Database,
    D::Tx: EmployeeTransaction,
{
    data.validate()?;

    let mut tx = db.begin().await?;
    let id = tx.employees().insert(data).await?;
    let employee = tx
        .employees()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(id))?;
    tx.commit().await?;

    tracing::info!(employee_id = %id, "employee registered");
    Ok(employee)
}

/// Sets the employment status of an employee the caller read at
/// `expected_version`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the employee does not exist and
/// `DomainError::ConcurrentModification` if it changed after the caller read
/// it.
#[tracing::instrument(skip(db))]
pub async fn change_employment_status<D>(
    db: &D,
    id: EmployeeId,
    expected_version: Version,
    status: EmploymentStatus,
) -> Result<Employee, DomainError>
where
    D: Database,
    D::Tx: EmployeeTransaction,
{
    let mut tx = db.begin().await?;
    let current = tx
        .employees()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(id))?;
    let edited = Employee::new(id, expected_version, current.data.with_status(status));
    let updated = tx.employees().update(edited).await?;
    tx.commit().await?;

    tracing::info!(version = %updated.version, "employment status changed");
    Ok(updated)
}

/// Removes an employee record. Unknown ids succeed.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure.
#[tracing::instrument(skip(db))]
pub async fn remove_employee<D>(db: &D, id: EmployeeId) -> Result<(), DomainError>
where
    D: Database,
    D::Tx: EmployeeTransaction,
{
    let mut tx = db.begin().await?;
    tx.employees().delete_by_id(id).await?;
    tx.commit().await
}
