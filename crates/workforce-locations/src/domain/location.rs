//! The Location aggregate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use workforce_core::aggregate::Aggregate;
use workforce_core::error::DomainError;

use super::facility::Facilities;

workforce_core::identifier!(
    /// Identifier of a location.
    LocationId,
    "location"
);

/// A persisted location: identifier, version and [`LocationData`].
pub type Location = Aggregate<LocationId, LocationData>;

/// ISO-3166 alpha-2 country code, e.g. `FI`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parses a two-letter code, upper-casing it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless the input is two ASCII letters.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::Validation(format!(
                "invalid country code {code:?}, expected two letters"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// The upper-case code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

impl FromStr for CountryCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a location is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Company headquarters.
    Headquarters,
    /// Regular office.
    Office,
    /// Storage or logistics site.
    Warehouse,
    /// Rented desks in a shared space.
    Coworking,
}

impl LocationType {
    /// Storage name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headquarters => "headquarters",
            Self::Office => "office",
            Self::Warehouse => "warehouse",
            Self::Coworking => "coworking",
        }
    }
}

impl FromStr for LocationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "headquarters" => Ok(Self::Headquarters),
            "office" => Ok(Self::Office),
            "warehouse" => Ok(Self::Warehouse),
            "coworking" => Ok(Self::Coworking),
            other => Err(DomainError::Validation(format!(
                "unknown location type {other:?}"
            ))),
        }
    }
}

/// Postal address of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// Postal code, kept verbatim.
    pub postal_code: String,
    /// City name.
    pub city: String,
    /// Country the location belongs to in the tree.
    pub country: CountryCode,
}

/// Business attributes of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    /// Display name, unique across locations.
    pub name: String,
    /// Location usage.
    pub location_type: LocationType,
    /// Postal address.
    pub address: Address,
    /// Facilities, at most one per kind.
    #[serde(default)]
    pub facilities: Facilities,
}

impl LocationData {
    /// Checks the attributes a store cannot enforce on its own.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank name, street or city, or
    /// an invalid facility.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("name", &self.name),
            ("street", &self.address.street),
            ("city", &self.address.city),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "location {field} must not be blank"
                )));
            }
        }
        self.facilities.validate()
    }
}
