//! Generic versioned store over one in-memory table.

use std::marker::PhantomData;
use std::sync::atomic::AtomicI64;

use async_trait::async_trait;
use workforce_core::aggregate::{Aggregate, AggregateData};
use workforce_core::error::DomainError;
use workforce_core::id::{Identifier, Version};
use workforce_core::repository::AggregateStore;
use workforce_hr::domain::employee::{EmployeeData, EmployeeId};
use workforce_locations::domain::location::{LocationData, LocationId};

use crate::database::{Sequences, Table, Tables};

/// Binds an aggregate data type to its table and its relational
/// constraints.
pub trait InMemoryRecord: AggregateData {
    /// Identifier type.
    type Id: Identifier;

    /// The table holding this type.
    fn table(tables: &Tables) -> &Table<Self>;

    /// Mutable access to the table holding this type.
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Identity sequence of the table.
    fn sequence(sequences: &Sequences) -> &AtomicI64;

    /// Checks unique and foreign-key constraints before `data` is written
    /// under `id` (`None` for an insert).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConstraintViolation` if the write would break a
    /// constraint.
    fn check_write(tables: &Tables, id: Option<i64>, data: &Self) -> Result<(), DomainError>;

    /// Checks that no other row still references `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConstraintViolation` if the row is referenced.
    fn check_delete(_tables: &Tables, _id: i64) -> Result<(), DomainError> {
        Ok(())
    }
}

impl InMemoryRecord for LocationData {
    type Id = LocationId;

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.locations
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.locations
    }

    fn sequence(sequences: &Sequences) -> &AtomicI64 {
        &sequences.locations
    }

    fn check_write(tables: &Tables, id: Option<i64>, data: &Self) -> Result<(), DomainError> {
        let taken = tables
            .locations
            .rows
            .iter()
            .any(|(other, (_, row))| Some(*other) != id && row.name == data.name);
        if taken {
            return Err(DomainError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint \"locations_name_key\": {}",
                data.name
            )));
        }
        Ok(())
    }

    fn check_delete(tables: &Tables, id: i64) -> Result<(), DomainError> {
        if tables
            .employees
            .rows
            .values()
            .any(|(_, employee)| employee.location_id.raw() == id)
        {
            return Err(DomainError::ConstraintViolation(format!(
                "location {id} is still referenced from table \"employees\""
            )));
        }
        Ok(())
    }
}

impl InMemoryRecord for EmployeeData {
    type Id = EmployeeId;

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.employees
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.employees
    }

    fn sequence(sequences: &Sequences) -> &AtomicI64 {
        &sequences.employees
    }

    fn check_write(tables: &Tables, id: Option<i64>, data: &Self) -> Result<(), DomainError> {
        if !tables.locations.rows.contains_key(&data.location_id.raw()) {
            return Err(DomainError::ConstraintViolation(format!(
                "location {} does not exist",
                data.location_id
            )));
        }
        let taken = tables
            .employees
            .rows
            .iter()
            .any(|(other, (_, row))| Some(*other) != id && row.email == data.email);
        if taken {
            return Err(DomainError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint \"employees_email_key\": {}",
                data.email
            )));
        }
        Ok(())
    }
}

/// In-memory [`AggregateStore`] bound to an open transaction.
#[derive(Debug)]
pub struct InMemoryStore<'t, I, D> {
    pub(crate) tables: &'t mut Tables,
    sequences: &'t Sequences,
    id: PhantomData<I>,
    data: PhantomData<D>,
}

impl<'t, I, D> InMemoryStore<'t, I, D> {
    pub(crate) fn new(tables: &'t mut Tables, sequences: &'t Sequences) -> Self {
        Self {
            tables,
            sequences,
            id: PhantomData,
            data: PhantomData,
        }
    }
}

#[async_trait]
impl<I, D> AggregateStore<I, D> for InMemoryStore<'_, I, D>
where
    I: Identifier,
    D: InMemoryRecord<Id = I>,
{
    async fn is_empty(&mut self) -> Result<bool, DomainError> {
        Ok(D::table(self.tables).rows.is_empty())
    }

    async fn find_by_id(&mut self, id: I) -> Result<Option<Aggregate<I, D>>, DomainError> {
        Ok(D::table(self.tables)
            .rows
            .get(&id.raw())
            .map(|(version, data)| Aggregate::new(id, Version::new(*version), data.clone())))
    }

    async fn insert(&mut self, data: D) -> Result<I, DomainError> {
        D::check_write(self.tables, None, &data)?;
        let raw = Sequences::next(D::sequence(self.sequences));
        D::table_mut(self.tables)
            .rows
            .insert(raw, (Version::INITIAL.get(), data));
        Ok(I::from_raw(raw))
    }

    async fn update(&mut self, aggregate: Aggregate<I, D>) -> Result<Aggregate<I, D>, DomainError> {
        let raw = aggregate.id.raw();
        let actual = D::table(self.tables).rows.get(&raw).map(|(version, _)| *version);
        if actual != Some(aggregate.version.get()) {
            return Err(DomainError::ConcurrentModification {
                aggregate: I::AGGREGATE,
                id: raw,
                expected: aggregate.version.get(),
                actual,
            });
        }
        D::check_write(self.tables, Some(raw), &aggregate.data)?;

        let version = aggregate.version.next();
        D::table_mut(self.tables)
            .rows
            .insert(raw, (version.get(), aggregate.data.clone()));
        Ok(Aggregate { version, ..aggregate })
    }

    async fn delete_by_id(&mut self, id: I) -> Result<(), DomainError> {
        let raw = id.raw();
        if !D::table(self.tables).rows.contains_key(&raw) {
            return Ok(());
        }
        D::check_delete(self.tables, raw)?;
        D::table_mut(self.tables).rows.remove(&raw);
        Ok(())
    }
}
