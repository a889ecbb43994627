//! Aggregate root abstraction.

use serde::{Deserialize, Serialize};

use crate::id::{Identifier, Version};

/// Capability every persisted aggregate root exposes to the store.
pub trait AggregateRoot: Send + Sync {
    /// The identifier type of this aggregate.
    type Id: Identifier;

    /// Returns the aggregate identifier.
    fn id(&self) -> Self::Id;

    /// Returns the version this instance was read or written at.
    fn version(&self) -> Version;
}

/// Immutable business snapshot carried by an aggregate root.
///
/// Data carries no identity and no version; those belong to [`Aggregate`].
pub trait AggregateData: Clone + std::fmt::Debug + Send + Sync + 'static {}

impl<T> AggregateData for T where T: Clone + std::fmt::Debug + Send + Sync + 'static {}

/// An aggregate instance: identifier, version and data snapshot.
///
/// Two instances with the same `id` but different `version` are the same
/// logical entity at different points in time. Only the instance holding the
/// currently stored version can be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate<I, D> {
    /// Aggregate identifier.
    pub id: I,
    /// Version at which this snapshot was observed.
    pub version: Version,
    /// Business attributes.
    pub data: D,
}

impl<I, D> Aggregate<I, D>
where
    I: Identifier,
    D: AggregateData,
{
    /// Assembles an aggregate from its parts.
    #[must_use]
    pub fn new(id: I, version: Version, data: D) -> Self {
        Self { id, version, data }
    }

    /// Returns a copy carrying `data`, keeping identity and the observed
    /// version so the store can check it on update.
    #[must_use]
    pub fn with_data(self, data: D) -> Self {
        Self { data, ..self }
    }
}

impl<I, D> AggregateRoot for Aggregate<I, D>
where
    I: Identifier,
    D: AggregateData,
{
    type Id = I;

    fn id(&self) -> I {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}
