//! Transaction boundary and versioned aggregate store abstractions.
//!
//! Store operations are only reachable through a live transaction: a
//! [`Database`] hands out a [`Transaction`], and bounded contexts expose their
//! stores as borrows of that transaction. Nested calls made while handling one
//! request therefore always join the same transaction, and there is no way to
//! reach a store without one.

use async_trait::async_trait;

use crate::aggregate::{Aggregate, AggregateData};
use crate::error::DomainError;
use crate::id::Identifier;

/// An open unit of work. Dropping it without [`commit`](Self::commit) rolls
/// back every write made through it.
#[async_trait]
pub trait Transaction: Send {
    /// Makes all writes of this transaction durable and visible.
    async fn commit(self) -> Result<(), DomainError>;
}

/// Source of transactions.
#[async_trait]
pub trait Database: Send + Sync {
    /// The transaction type this database hands out.
    type Tx: Transaction;

    /// Opens a new transaction.
    async fn begin(&self) -> Result<Self::Tx, DomainError>;
}

/// Versioned CRUD over one aggregate type with optimistic concurrency.
#[async_trait]
pub trait AggregateStore<I, D>: Send
where
    I: Identifier,
    D: AggregateData,
{
    /// Returns true iff no aggregate of this type exists.
    async fn is_empty(&mut self) -> Result<bool, DomainError>;

    /// Returns the current snapshot, or `None` if no such aggregate exists.
    async fn find_by_id(&mut self, id: I) -> Result<Option<Aggregate<I, D>>, DomainError>;

    /// Persists `data` at version 1 under a freshly allocated identifier.
    ///
    /// Identifiers are never reused, even after deletion.
    async fn insert(&mut self, data: D) -> Result<I, DomainError>;

    /// Persists `aggregate.data` if the stored version still equals
    /// `aggregate.version`, returning the aggregate at the next version.
    ///
    /// Fails with `DomainError::ConcurrentModification` when the version
    /// predicate matches no row. Never retries.
    async fn update(&mut self, aggregate: Aggregate<I, D>) -> Result<Aggregate<I, D>, DomainError>;

    /// Removes the aggregate and its owned child rows. Absent ids are a no-op.
    async fn delete_by_id(&mut self, id: I) -> Result<(), DomainError>;
}
