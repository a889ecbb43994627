//! Command handlers for the Locations context.
//!
//! Each handler runs in exactly one transaction: begin, call the store,
//! commit. Failures drop the transaction, which rolls it back.

use workforce_core::error::DomainError;
use workforce_core::repository::{AggregateStore, Database, Transaction};

use crate::domain::location::{Location, LocationData, LocationId};
use crate::repository::LocationTransaction;

/// Creates a location at version 1 and returns it as stored.
///
/// # Errors
///
/// Returns `DomainError::Validation` for invalid data,
/// `DomainError::ConstraintViolation` if the name is already taken, and
/// `DomainError::Infrastructure` on storage failure.
#[tracing::instrument(skip(db, data), fields(name = %data.name))]
pub async fn create_location<D>(db: &D, data: LocationData) -> Result<Location, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    data.validate()?;

    let mut tx = db.begin().await?;
    let id = tx.locations().insert(data).await?;
    let location = tx
        .locations()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(id))?;
    tx.commit().await?;

    tracing::info!(location_id = %id, "location created");
    Ok(location)
}

/// Saves `location.data` if `location.version` is still current, replacing
/// its facility set, and returns the location at its new version.
///
/// # Errors
///
/// Returns `DomainError::ConcurrentModification` if someone else updated or
/// deleted the location since it was read. The caller decides whether to
/// reload and retry.
#[tracing::instrument(skip(db, location), fields(location_id = %location.id, version = %location.version))]
pub async fn update_location<D>(db: &D, location: Location) -> Result<Location, DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    location.data.validate()?;

    let mut tx = db.begin().await?;
    let updated = match tx.locations().update(location).await {
        Ok(updated) => updated,
        Err(err @ DomainError::ConcurrentModification { .. }) => {
            tracing::warn!(error = %err, "stale location update rejected");
            return Err(err);
        }
        Err(err) => return Err(err),
    };
    tx.commit().await?;

    tracing::info!(version = %updated.version, "location updated");
    Ok(updated)
}

/// Deletes a location together with its facilities. Deleting an unknown id
/// succeeds.
///
/// # Errors
///
/// Returns `DomainError::ConstraintViolation` if employees still reference
/// the location.
#[tracing::instrument(skip(db))]
pub async fn delete_location<D>(db: &D, id: LocationId) -> Result<(), DomainError>
where
    D: Database,
    D::Tx: LocationTransaction,
{
    let mut tx = db.begin().await?;
    tx.locations().delete_by_id(id).await?;
    tx.commit().await?;

    tracing::info!("location deleted");
    Ok(())
}
