//! Location facilities.
//!
//! Facilities are owned by their location and keyed by kind: a location has
//! at most one facility of each [`FacilityKind`]. Stores replace the whole set
//! on every location update rather than diffing it.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use workforce_core::error::DomainError;

/// Discriminant of a [`LocationFacility`], used as the child row key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    /// Step-free access.
    AccessibleOffice,
    /// Rentable floor area.
    FloorSpace,
    /// Unassigned desks.
    HotDesks,
    /// Shared kitchen.
    Kitchen,
    /// Phone/meeting booths.
    MeetingBooths,
    /// Parking.
    ParkingSlots,
}

impl FacilityKind {
    /// Every kind, in key order.
    pub const ALL: [Self; 6] = [
        Self::AccessibleOffice,
        Self::FloorSpace,
        Self::HotDesks,
        Self::Kitchen,
        Self::MeetingBooths,
        Self::ParkingSlots,
    ];

    /// Storage name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessibleOffice => "accessible_office",
            Self::FloorSpace => "floor_space",
            Self::HotDesks => "hot_desks",
            Self::Kitchen => "kitchen",
            Self::MeetingBooths => "meeting_booths",
            Self::ParkingSlots => "parking_slots",
        }
    }
}

impl FromStr for FacilityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown facility kind {s:?}")))
    }
}

/// A facility available at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationFacility {
    /// Step-free access.
    AccessibleOffice,
    /// Rentable floor area.
    FloorSpace {
        /// Area in square meters.
        square_meters: u32,
    },
    /// Unassigned desks.
    HotDesks {
        /// Number of desks.
        count: u32,
    },
    /// Shared kitchen.
    Kitchen,
    /// Phone/meeting booths.
    MeetingBooths {
        /// Number of booths.
        count: u32,
    },
    /// Parking.
    ParkingSlots {
        /// Number of slots.
        count: u32,
    },
}

impl LocationFacility {
    /// The kind of this facility.
    #[must_use]
    pub fn kind(&self) -> FacilityKind {
        match self {
            Self::AccessibleOffice => FacilityKind::AccessibleOffice,
            Self::FloorSpace { .. } => FacilityKind::FloorSpace,
            Self::HotDesks { .. } => FacilityKind::HotDesks,
            Self::Kitchen => FacilityKind::Kitchen,
            Self::MeetingBooths { .. } => FacilityKind::MeetingBooths,
            Self::ParkingSlots { .. } => FacilityKind::ParkingSlots,
        }
    }

    /// The numeric payload, if the kind carries one.
    #[must_use]
    pub fn amount(&self) -> Option<u32> {
        match *self {
            Self::AccessibleOffice | Self::Kitchen => None,
            Self::FloorSpace { square_meters } => Some(square_meters),
            Self::HotDesks { count }
            | Self::MeetingBooths { count }
            | Self::ParkingSlots { count } => Some(count),
        }
    }

    /// Rebuilds a facility from its child-row columns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is missing for a
    /// counted kind or present for a plain one.
    pub fn from_parts(kind: FacilityKind, amount: Option<u32>) -> Result<Self, DomainError> {
        let facility = match (kind, amount) {
            (FacilityKind::AccessibleOffice, None) => Self::AccessibleOffice,
            (FacilityKind::Kitchen, None) => Self::Kitchen,
            (FacilityKind::FloorSpace, Some(square_meters)) => Self::FloorSpace { square_meters },
            (FacilityKind::HotDesks, Some(count)) => Self::HotDesks { count },
            (FacilityKind::MeetingBooths, Some(count)) => Self::MeetingBooths { count },
            (FacilityKind::ParkingSlots, Some(count)) => Self::ParkingSlots { count },
            (kind, amount) => {
                return Err(DomainError::Validation(format!(
                    "facility {} cannot have amount {amount:?}",
                    kind.as_str()
                )));
            }
        };
        Ok(facility)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.amount() == Some(0) {
            return Err(DomainError::Validation(format!(
                "facility {} must have a positive amount",
                self.kind().as_str()
            )));
        }
        Ok(())
    }
}

/// The facility set of one location, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LocationFacility>", into = "Vec<LocationFacility>")]
pub struct Facilities(BTreeMap<FacilityKind, LocationFacility>);

impl Facilities {
    /// Adds `facility`, replacing any facility of the same kind.
    pub fn insert(&mut self, facility: LocationFacility) -> Option<LocationFacility> {
        self.0.insert(facility.kind(), facility)
    }

    /// Returns the facility of `kind`, if present.
    #[must_use]
    pub fn get(&self, kind: FacilityKind) -> Option<&LocationFacility> {
        self.0.get(&kind)
    }

    /// Number of facilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the location has no facilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Facilities in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &LocationFacility> {
        self.0.values()
    }

    /// Checks every facility's payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a zero amount.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.iter().try_for_each(LocationFacility::validate)
    }
}

impl TryFrom<Vec<LocationFacility>> for Facilities {
    type Error = DomainError;

    fn try_from(value: Vec<LocationFacility>) -> Result<Self, Self::Error> {
        let mut facilities = Self::default();
        for facility in value {
            if facilities.insert(facility).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate facility {}",
                    facility.kind().as_str()
                )));
            }
        }
        Ok(facilities)
    }
}

impl From<Facilities> for Vec<LocationFacility> {
    fn from(value: Facilities) -> Self {
        value.0.into_values().collect()
    }
}

impl FromIterator<LocationFacility> for Facilities {
    fn from_iter<T: IntoIterator<Item = LocationFacility>>(iter: T) -> Self {
        let mut facilities = Self::default();
        for facility in iter {
            facilities.insert(facility);
        }
        facilities
    }
}
