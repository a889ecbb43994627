//! Strongly typed identifiers and aggregate versions.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Numeric identifier of one aggregate type.
///
/// Identifiers are allocated by the store from a monotonic sequence and are
/// never reused, even after the aggregate they named has been deleted.
pub trait Identifier:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Human-readable aggregate type name (used in errors and logs).
    const AGGREGATE: &'static str;

    /// Wraps a raw value read back from storage.
    fn from_raw(raw: i64) -> Self;

    /// Returns the raw value for storage.
    fn raw(self) -> i64;
}

/// Declares an opaque identifier newtype over `i64`.
///
/// ```
/// workforce_core::identifier!(
///     /// Identifier of a widget.
///     WidgetId, "widget"
/// );
/// use workforce_core::id::Identifier;
/// assert_eq!(WidgetId::from_raw(7).raw(), 7);
/// ```
#[macro_export]
macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $aggregate:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $crate::id::Identifier for $name {
            const AGGREGATE: &'static str = $aggregate;

            fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            fn raw(self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Optimistic concurrency version of one aggregate instance.
///
/// Starts at [`Version::INITIAL`] on insert and grows by exactly one per
/// successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Version of a freshly inserted aggregate.
    pub const INITIAL: Self = Self(1);

    /// Wraps a version read back from storage or supplied by a caller.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns the version a successful update produces.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::identifier!(
        /// Identifier used only by these tests.
        SampleId,
        "sample"
    );

    #[test]
    fn test_identifier_round_trips_raw_value() {
        let id = SampleId::from_raw(42);

        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(SampleId::AGGREGATE, "sample");
    }

    #[test]
    fn test_identifier_compares_by_value() {
        assert_eq!(SampleId::from_raw(3), SampleId::from_raw(3));
        assert!(SampleId::from_raw(3) < SampleId::from_raw(4));
    }

    #[test]
    fn test_identifier_serializes_transparently() {
        let json = serde_json::to_value(SampleId::from_raw(9)).unwrap();

        assert_eq!(json, serde_json::json!(9));
    }

    #[test]
    fn test_version_starts_at_one_and_increments_by_one() {
        let v = Version::INITIAL;

        assert_eq!(v.get(), 1);
        assert_eq!(v.next().get(), 2);
        assert_eq!(v.next().next(), Version::new(3));
    }
}
