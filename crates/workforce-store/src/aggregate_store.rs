//! Generic versioned aggregate store.
//!
//! Every aggregate table has an `id` identity column, a `version` column and
//! the business columns named by its [`AggregateTable`] mapping. The
//! optimistic write protocol lives here once for all of them:
//!
//! - insert writes `version = 1` and returns the identity value;
//! - update is `UPDATE ... WHERE id = $id AND version = $expected
//!   RETURNING version`; no returned row means someone else won;
//! - every multi-statement operation runs inside a savepoint of the caller's
//!   transaction, so a failed child write never leaves a half-applied
//!   aggregate behind.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder, Row};
use workforce_core::aggregate::{Aggregate, AggregateData};
use workforce_core::error::DomainError;
use workforce_core::id::{Identifier, Version};
use workforce_core::repository::AggregateStore;

use crate::error::StoreError;

/// Mapping between one aggregate type and its table.
#[async_trait]
pub trait AggregateTable: Send + Sync + 'static {
    /// Identifier type.
    type Id: Identifier;
    /// Business data type.
    type Data: AggregateData;

    /// Table name.
    const TABLE: &'static str;

    /// Business columns, in the order [`push_values`](Self::push_values)
    /// binds them. `id` and `version` are managed by the store.
    const COLUMNS: &'static [&'static str];

    /// Binds the business columns of `data`, one bind per column.
    fn push_values(values: &mut Separated<'_, '_, Postgres, &'static str>, data: &Self::Data);

    /// Rebuilds the business data from a row selecting [`COLUMNS`](Self::COLUMNS).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a column is missing or holds an invalid value.
    fn decode(row: &PgRow) -> Result<Self::Data, StoreError>;

    /// Loads owned child rows into `data`.
    async fn load_children(
        _conn: &mut PgConnection,
        _id: Self::Id,
        _data: &mut Self::Data,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    /// Replaces all owned child rows with those in `data`.
    async fn replace_children(
        _conn: &mut PgConnection,
        _id: Self::Id,
        _data: &Self::Data,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    /// Deletes all owned child rows.
    async fn delete_children(_conn: &mut PgConnection, _id: Self::Id) -> Result<(), StoreError> {
        Ok(())
    }
}

/// `PostgreSQL` implementation of [`AggregateStore`] for table `T`, bound to
/// the caller's transaction.
#[derive(Debug)]
pub struct PgAggregateStore<'t, T> {
    pub(crate) conn: &'t mut PgConnection,
    table: PhantomData<T>,
}

impl<'t, T: AggregateTable> PgAggregateStore<'t, T> {
    /// Binds the store to an open transaction's connection.
    #[must_use]
    pub fn new(conn: &'t mut PgConnection) -> Self {
        Self {
            conn,
            table: PhantomData,
        }
    }

    async fn table_is_empty(&mut self) -> Result<bool, StoreError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {})", T::TABLE);
        let exists: bool = sqlx::query_scalar(&sql).fetch_one(&mut *self.conn).await?;
        Ok(!exists)
    }

    async fn fetch(&mut self, id: T::Id) -> Result<Option<Aggregate<T::Id, T::Data>>, StoreError> {
        let sql = format!(
            "SELECT version, {} FROM {} WHERE id = $1",
            T::COLUMNS.join(", "),
            T::TABLE
        );
        let Some(row) = sqlx::query(&sql)
            .bind(id.raw())
            .fetch_optional(&mut *self.conn)
            .await?
        else {
            return Ok(None);
        };

        let version: i64 = row.try_get("version")?;
        let mut data = T::decode(&row)?;
        T::load_children(&mut *self.conn, id, &mut data).await?;

        Ok(Some(Aggregate::new(id, Version::new(version), data)))
    }

    async fn insert_row(&mut self, data: T::Data) -> Result<T::Id, StoreError> {
        let mut savepoint = self.conn.begin().await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} (version, {}) VALUES (",
            T::TABLE,
            T::COLUMNS.join(", ")
        ));
        qb.push_bind(Version::INITIAL.get()).push(", ");
        T::push_values(&mut qb.separated(", "), &data);
        qb.push(") RETURNING id");

        let raw: i64 = qb.build_query_scalar().fetch_one(&mut *savepoint).await?;
        let id = T::Id::from_raw(raw);
        T::replace_children(&mut *savepoint, id, &data).await?;
        savepoint.commit().await?;

        tracing::debug!(table = T::TABLE, id = raw, "aggregate inserted");
        Ok(id)
    }

    async fn update_row(
        &mut self,
        aggregate: Aggregate<T::Id, T::Data>,
    ) -> Result<Aggregate<T::Id, T::Data>, StoreError> {
        let mut savepoint = self.conn.begin().await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} SET version = version + 1, ({}) = ROW(",
            T::TABLE,
            T::COLUMNS.join(", ")
        ));
        T::push_values(&mut qb.separated(", "), &aggregate.data);
        qb.push(") WHERE id = ")
            .push_bind(aggregate.id.raw())
            .push(" AND version = ")
            .push_bind(aggregate.version.get())
            .push(" RETURNING version");

        let written: Option<i64> = qb
            .build_query_scalar()
            .fetch_optional(&mut *savepoint)
            .await?;
        let Some(written) = written else {
            let sql = format!("SELECT version FROM {} WHERE id = $1", T::TABLE);
            let actual: Option<i64> = sqlx::query_scalar(&sql)
                .bind(aggregate.id.raw())
                .fetch_optional(&mut *savepoint)
                .await?;
            return Err(StoreError::ConcurrentModification {
                aggregate: T::Id::AGGREGATE,
                id: aggregate.id.raw(),
                expected: aggregate.version.get(),
                actual,
            });
        };

        T::replace_children(&mut *savepoint, aggregate.id, &aggregate.data).await?;
        savepoint.commit().await?;

        tracing::debug!(table = T::TABLE, id = aggregate.id.raw(), version = written, "aggregate updated");
        Ok(Aggregate {
            version: Version::new(written),
            ..aggregate
        })
    }

    async fn delete_row(&mut self, id: T::Id) -> Result<(), StoreError> {
        let mut savepoint = self.conn.begin().await?;

        T::delete_children(&mut *savepoint, id).await?;
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let deleted = sqlx::query(&sql)
            .bind(id.raw())
            .execute(&mut *savepoint)
            .await?
            .rows_affected();
        savepoint.commit().await?;

        tracing::debug!(table = T::TABLE, id = id.raw(), deleted, "aggregate deleted");
        Ok(())
    }
}

#[async_trait]
impl<'t, T: AggregateTable> AggregateStore<T::Id, T::Data> for PgAggregateStore<'t, T> {
    async fn is_empty(&mut self) -> Result<bool, DomainError> {
        Ok(self.table_is_empty().await?)
    }

    async fn find_by_id(
        &mut self,
        id: T::Id,
    ) -> Result<Option<Aggregate<T::Id, T::Data>>, DomainError> {
        Ok(self.fetch(id).await?)
    }

    async fn insert(&mut self, data: T::Data) -> Result<T::Id, DomainError> {
        Ok(self.insert_row(data).await?)
    }

    async fn update(
        &mut self,
        aggregate: Aggregate<T::Id, T::Data>,
    ) -> Result<Aggregate<T::Id, T::Data>, DomainError> {
        Ok(self.update_row(aggregate).await?)
    }

    async fn delete_by_id(&mut self, id: T::Id) -> Result<(), DomainError> {
        Ok(self.delete_row(id).await?)
    }
}
