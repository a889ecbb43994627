//! Location tree projections.
//!
//! The tree has two levels: synthetic country nodes at the root and location
//! nodes below them. Nodes are computed per query and never persisted.
//! Employee counts only include employees whose status is active.

use serde::{Deserialize, Serialize};
use workforce_core::sort::SortableProperty;

use super::location::{Address, CountryCode, LocationId, LocationType};

/// Root-level grouping node, one per country that has locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryNode {
    /// The country.
    pub country: CountryCode,
    /// Active employees across all locations in the country.
    pub employee_count: i64,
}

/// Leaf node projecting one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    /// The location.
    pub id: LocationId,
    /// Location name.
    pub name: String,
    /// Active employees at this location.
    pub employee_count: i64,
    /// Location usage.
    pub location_type: LocationType,
    /// Postal address.
    pub address: Address,
}

/// A node of the location tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum LocationTreeNode {
    /// Country grouping node.
    Country(CountryNode),
    /// Location leaf node.
    Location(LocationNode),
}

impl LocationTreeNode {
    /// Active employees under this node.
    #[must_use]
    pub fn employee_count(&self) -> i64 {
        match self {
            Self::Country(node) => node.employee_count,
            Self::Location(node) => node.employee_count,
        }
    }

    /// True for nodes that can have children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        matches!(self, Self::Country(_))
    }
}

/// Case-insensitive substring filter on location name or city.
///
/// At the root level a country is kept when at least one of its locations
/// matches, and its employee count only covers the matching locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSearch {
    term: String,
}

impl LocationSearch {
    /// Builds a filter from caller input. A blank term means no filter.
    #[must_use]
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_owned(),
        })
    }

    /// The trimmed search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// True if `name` or `city` contains the term, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str, city: &str) -> bool {
        let needle = self.term.to_lowercase();
        name.to_lowercase().contains(&needle) || city.to_lowercase().contains(&needle)
    }
}

/// Sort keys of the root (country) level.
///
/// `Country` orders by ISO code, not by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySortProperty {
    /// ISO-3166 code.
    Country,
    /// Active employee count.
    EmployeeCount,
}

impl SortableProperty for CountrySortProperty {
    const LEVEL: &'static str = "countries";
    const ALL: &'static [Self] = &[Self::Country, Self::EmployeeCount];
    const DEFAULT: Self = Self::Country;

    fn name(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::EmployeeCount => "employeeCount",
        }
    }
}

/// Sort keys of location listings (tree leaves and the flat list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSortProperty {
    /// Location name.
    Name,
    /// Location usage.
    LocationType,
    /// Address city.
    City,
    /// Active employee count.
    EmployeeCount,
}

impl SortableProperty for LocationSortProperty {
    const LEVEL: &'static str = "locations";
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::LocationType,
        Self::City,
        Self::EmployeeCount,
    ];
    const DEFAULT: Self = Self::Name;

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::LocationType => "locationType",
            Self::City => "city",
            Self::EmployeeCount => "employeeCount",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::error::DomainError;

    #[test]
    fn test_every_property_parses_from_its_name() {
        for property in CountrySortProperty::ALL {
            assert_eq!(CountrySortProperty::parse(property.name()).unwrap(), *property);
        }
        for property in LocationSortProperty::ALL {
            assert_eq!(LocationSortProperty::parse(property.name()).unwrap(), *property);
        }
    }

    #[test]
    fn test_location_property_is_not_valid_at_country_level() {
        let result = CountrySortProperty::parse("name");

        assert!(matches!(
            result,
            Err(DomainError::InvalidSortProperty { level: "countries", .. })
        ));
    }

    #[test]
    fn test_only_country_nodes_have_children() {
        let country = LocationTreeNode::Country(CountryNode {
            country: CountryCode::new("SE").unwrap(),
            employee_count: 3,
        });

        assert!(country.has_children());
        assert_eq!(country.employee_count(), 3);
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        assert_eq!(LocationSearch::new("   "), None);
        assert_eq!(LocationSearch::new(" holm ").unwrap().term(), "holm");
    }

    #[test]
    fn test_search_matches_name_or_city_ignoring_case() {
        let search = LocationSearch::new("HOLM").unwrap();

        assert!(search.matches("Stockholm HQ", "Stockholm"));
        assert!(search.matches("Nordic Hub", "Holmestrand"));
        assert!(!search.matches("Oslo Office", "Oslo"));
    }

    #[test]
    fn test_tree_node_serializes_with_node_tag() {
        let node = LocationTreeNode::Country(CountryNode {
            country: CountryCode::new("SE").unwrap(),
            employee_count: 0,
        });

        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"node": "country", "country": "SE", "employee_count": 0})
        );
    }
}
