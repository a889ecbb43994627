//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was required but does not exist.
    ///
    /// Store lookups report absence as `None`; handlers raise this only when
    /// the caller cannot proceed without the aggregate.
    #[error("{aggregate} {id} not found")]
    NotFound {
        /// Aggregate type name.
        aggregate: &'static str,
        /// Raw identifier that was looked up.
        id: i64,
    },

    /// The version predicate of an update matched no row.
    #[error(
        "concurrent modification of {aggregate} {id}: expected version {expected}, found {}",
        describe_version(.actual)
    )]
    ConcurrentModification {
        /// Aggregate type name.
        aggregate: &'static str,
        /// Raw identifier of the aggregate.
        id: i64,
        /// Version the caller held.
        expected: i64,
        /// Version found in storage, `None` if the row is gone.
        actual: Option<i64>,
    },

    /// A uniqueness, foreign-key, not-null or check constraint was violated.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The caller named a sort property the query does not know.
    #[error("invalid sort property {property:?} for {level}")]
    InvalidSortProperty {
        /// The unrecognised property name.
        property: String,
        /// The query (or tree level) it was given to.
        level: &'static str,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

fn describe_version(version: &Option<i64>) -> String {
    match version {
        Some(v) => v.to_string(),
        None => "no row".to_owned(),
    }
}

impl DomainError {
    /// Builds a `NotFound` error for an identifier.
    #[must_use]
    pub fn not_found<I: crate::id::Identifier>(id: I) -> Self {
        Self::NotFound {
            aggregate: I::AGGREGATE,
            id: id.raw(),
        }
    }
}
