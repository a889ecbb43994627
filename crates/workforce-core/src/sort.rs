//! Sortable query vocabulary.
//!
//! Callers name sort keys through a [`SortableProperty`] enum (or its string
//! name) and a [`SortDirection`]. Each backend implements an
//! [`OrderTranslator`] that maps those pairs onto its native ordering terms,
//! so the vocabulary stays independent of physical columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(alias = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(DomainError::Validation(format!(
                "invalid sort direction {other:?}, expected asc or desc"
            ))),
        }
    }
}

/// A closed set of named sort keys for one query.
pub trait SortableProperty: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Name of the query (or tree level) this vocabulary belongs to.
    const LEVEL: &'static str;

    /// Every property, in declaration order.
    const ALL: &'static [Self];

    /// Key applied ascending when the caller supplies no sort.
    const DEFAULT: Self;

    /// The caller-facing property name.
    fn name(self) -> &'static str;

    /// Resolves a caller-facing property name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSortProperty` if no property has that name.
    fn parse(name: &str) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .copied()
            .find(|property| property.name() == name)
            .ok_or_else(|| DomainError::InvalidSortProperty {
                property: name.to_owned(),
                level: Self::LEVEL,
            })
    }
}

/// One typed sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder<P> {
    /// The property to order by.
    pub property: P,
    /// Ascending or descending.
    pub direction: SortDirection,
}

impl<P: SortableProperty> SortOrder<P> {
    /// Ascending order on `property`.
    #[must_use]
    pub fn ascending(property: P) -> Self {
        Self {
            property,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on `property`.
    #[must_use]
    pub fn descending(property: P) -> Self {
        Self {
            property,
            direction: SortDirection::Descending,
        }
    }
}

/// A raw, untyped sort key as received from a caller (`name:asc`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParam {
    /// Property name, resolved later against a [`SortableProperty`] set.
    pub property: String,
    /// Direction of the key.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortParam {
    /// Parses a comma separated list such as `name:asc,city:desc`.
    ///
    /// Blank input yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a direction is malformed.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, DomainError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<Self>)
            .collect()
    }
}

impl FromStr for SortParam {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (property, direction) = match s.split_once(':') {
            Some((property, direction)) => (property, direction.parse()?),
            None => (s, SortDirection::Ascending),
        };
        Ok(Self {
            property: property.trim().to_owned(),
            direction,
        })
    }
}

/// Ordered list of sort keys, applied left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort<P> {
    orders: Vec<SortOrder<P>>,
}

impl<P: SortableProperty> Default for Sort<P> {
    fn default() -> Self {
        Self { orders: Vec::new() }
    }
}

impl<P: SortableProperty> Sort<P> {
    /// Builds a sort from typed keys.
    #[must_use]
    pub fn new(orders: Vec<SortOrder<P>>) -> Self {
        Self { orders }
    }

    /// Single-key sort.
    #[must_use]
    pub fn by(property: P, direction: SortDirection) -> Self {
        Self::new(vec![SortOrder {
            property,
            direction,
        }])
    }

    /// Resolves raw caller keys against this vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSortProperty` for the first unknown name.
    pub fn parse(params: &[SortParam]) -> Result<Self, DomainError> {
        let orders = params
            .iter()
            .map(|param| {
                Ok(SortOrder {
                    property: P::parse(&param.property)?,
                    direction: param.direction,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self { orders })
    }

    /// Keys supplied by the caller (possibly empty).
    #[must_use]
    pub fn orders(&self) -> &[SortOrder<P>] {
        &self.orders
    }

    /// Keys the query applies: the caller's, or the vocabulary default.
    #[must_use]
    pub fn effective(&self) -> Vec<SortOrder<P>> {
        if self.orders.is_empty() {
            vec![SortOrder::ascending(P::DEFAULT)]
        } else {
            self.orders.clone()
        }
    }
}

/// Maps typed sort keys onto backend ordering terms.
pub trait OrderTranslator<P: SortableProperty> {
    /// A backend ordering term (an SQL fragment, a comparator, ...).
    type Term;

    /// Translates a single key.
    fn term(&self, order: SortOrder<P>) -> Self::Term;

    /// Translates the effective keys of `sort`, primary key first.
    fn terms(&self, sort: &Sort<P>) -> Vec<Self::Term> {
        sort.effective()
            .into_iter()
            .map(|order| self.term(order))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fruit {
        Name,
        Weight,
    }

    impl SortableProperty for Fruit {
        const LEVEL: &'static str = "fruits";
        const ALL: &'static [Self] = &[Self::Name, Self::Weight];
        const DEFAULT: Self = Self::Name;

        fn name(self) -> &'static str {
            match self {
                Self::Name => "name",
                Self::Weight => "weight",
            }
        }
    }

    struct Labels;

    impl OrderTranslator<Fruit> for Labels {
        type Term = String;

        fn term(&self, order: SortOrder<Fruit>) -> String {
            let dir = match order.direction {
                SortDirection::Ascending => "+",
                SortDirection::Descending => "-",
            };
            format!("{dir}{}", order.property.name())
        }
    }

    #[test]
    fn test_parse_resolves_known_names_in_order() {
        let params = SortParam::parse_list("weight:desc, name").unwrap();

        let sort = Sort::<Fruit>::parse(&params).unwrap();

        assert_eq!(
            sort.orders(),
            &[
                SortOrder::descending(Fruit::Weight),
                SortOrder::ascending(Fruit::Name)
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_property() {
        let params = SortParam::parse_list("colour:asc").unwrap();

        let result = Sort::<Fruit>::parse(&params);

        match result {
            Err(DomainError::InvalidSortProperty { property, level }) => {
                assert_eq!(property, "colour");
                assert_eq!(level, "fruits");
            }
            other => panic!("expected InvalidSortProperty, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_rejects_bad_direction() {
        let result = SortParam::parse_list("name:sideways");

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_parse_list_of_blank_input_is_empty() {
        assert!(SortParam::parse_list("  ").unwrap().is_empty());
    }

    #[test]
    fn test_terms_apply_left_to_right() {
        let sort = Sort::new(vec![
            SortOrder::descending(Fruit::Weight),
            SortOrder::ascending(Fruit::Name),
        ]);

        assert_eq!(Labels.terms(&sort), vec!["-weight", "+name"]);
    }

    #[test]
    fn test_terms_fall_back_to_default_when_unsorted() {
        assert_eq!(Labels.terms(&Sort::default()), vec!["+name"]);
    }

    #[test]
    fn test_direction_accepts_long_and_short_forms() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!(
            "descending".parse::<SortDirection>().unwrap(),
            SortDirection::Descending
        );
    }
}
