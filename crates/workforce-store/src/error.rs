//! Store error type and its mapping onto `DomainError`.

use sqlx::error::ErrorKind;
use thiserror::Error;
use workforce_core::error::DomainError;

/// Error type for `PostgreSQL` store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query execution or transaction failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A column held a value the domain cannot represent.
    #[error("invalid {column} value {value:?} read back from storage")]
    Corrupt {
        /// Column name.
        column: &'static str,
        /// Raw value found.
        value: String,
    },

    /// The version predicate of an update matched no row.
    #[error("version predicate matched no row for {aggregate} {id}")]
    ConcurrentModification {
        /// Aggregate type name.
        aggregate: &'static str,
        /// Raw identifier.
        id: i64,
        /// Version the caller held.
        expected: i64,
        /// Version currently stored, `None` if the row is gone.
        actual: Option<i64>,
    },
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConcurrentModification {
                aggregate,
                id,
                expected,
                actual,
            } => Self::ConcurrentModification {
                aggregate,
                id,
                expected,
                actual,
            },
            StoreError::Database(sqlx::Error::Database(db)) => match db.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => Self::ConstraintViolation(db.message().to_owned()),
                _ => Self::Infrastructure(format!("database error: {db}")),
            },
            other => Self::Infrastructure(other.to_string()),
        }
    }
}

/// Parses a text column into a domain value.
pub(crate) fn parse_column<T>(column: &'static str, value: String) -> Result<T, StoreError>
where
    T: std::str::FromStr,
{
    value
        .parse()
        .map_err(|_| StoreError::Corrupt { column, value })
}

/// Narrows a `BIGINT` column into `u32`.
pub(crate) fn narrow_column(column: &'static str, value: i64) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt {
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrent_modification_keeps_versions() {
        let err: DomainError = StoreError::ConcurrentModification {
            aggregate: "location",
            id: 5,
            expected: 1,
            actual: Some(2),
        }
        .into();

        match err {
            DomainError::ConcurrentModification {
                aggregate,
                id,
                expected,
                actual,
            } => {
                assert_eq!(aggregate, "location");
                assert_eq!(id, 5);
                assert_eq!(expected, 1);
                assert_eq!(actual, Some(2));
            }
            other => panic!("expected ConcurrentModification, got {other:?}"),
        }
    }

    #[test]
    fn test_non_database_errors_are_infrastructure() {
        let err: DomainError = StoreError::Database(sqlx::Error::PoolTimedOut).into();

        assert!(matches!(err, DomainError::Infrastructure(_)));
    }

    #[test]
    fn test_corrupt_column_is_infrastructure() {
        let err: DomainError = parse_column::<i32>("amount", "lots".to_owned())
            .unwrap_err()
            .into();

        match err {
            DomainError::Infrastructure(msg) => assert!(msg.contains("amount")),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
    }

    #[test]
    fn test_narrow_column_rejects_negative() {
        assert!(narrow_column("amount", -1).is_err());
        assert_eq!(narrow_column("amount", 7).unwrap(), 7);
    }
}
