//! The Employee aggregate.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use workforce_core::aggregate::Aggregate;
use workforce_core::error::DomainError;
use workforce_locations::domain::location::LocationId;

workforce_core::identifier!(
    /// Identifier of an employee.
    EmployeeId,
    "employee"
);

/// A persisted employee.
pub type Employee = Aggregate<EmployeeId, EmployeeData>;

/// Employment status. Only `Active` employees count toward location totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently working.
    Active,
    /// Temporarily away (parental leave, sabbatical, ...).
    OnLeave,
    /// Employment ended.
    Terminated,
}

impl EmploymentStatus {
    /// Storage name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Terminated => "terminated",
        }
    }

    /// True if the employee counts toward location head counts.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for EmploymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "on_leave" => Ok(Self::OnLeave),
            "terminated" => Ok(Self::Terminated),
            other => Err(DomainError::Validation(format!(
                "unknown employment status {other:?}"
            ))),
        }
    }
}

/// Business attributes of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Work email, unique across employees.
    pub email: String,
    /// Location the employee works at.
    pub location_id: LocationId,
    /// Employment status.
    pub status: EmploymentStatus,
    /// First working day.
    pub hired_on: NaiveDate,
}

impl EmployeeData {
    /// Checks the attributes a store cannot enforce on its own.
    ///
    /// Email syntax is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank name or email.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "employee {field} must not be blank"
                )));
            }
        }
        Ok(())
    }

    /// Returns a copy with `status` applied.
    #[must_use]
    pub fn with_status(self, status: EmploymentStatus) -> Self {
        Self { status, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::id::Identifier;

    fn employee() -> EmployeeData {
        EmployeeData {
            first_name: "Aino".to_owned(),
            last_name: "Virtanen".to_owned(),
            email: "aino.virtanen@example.com".to_owned(),
            location_id: LocationId::from_raw(1),
            status: EmploymentStatus::Active,
            hired_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_only_active_status_counts() {
        assert!(EmploymentStatus::Active.is_active());
        assert!(!EmploymentStatus::OnLeave.is_active());
        assert!(!EmploymentStatus::Terminated.is_active());
    }

    #[test]
    fn test_status_storage_names_parse_back() {
        for status in [
            EmploymentStatus::Active,
            EmploymentStatus::OnLeave,
            EmploymentStatus::Terminated,
        ] {
            assert_eq!(status.as_str().parse::<EmploymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_validate_rejects_blank_email() {
        let mut data = employee();
        data.email = String::new();

        assert!(matches!(data.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_with_status_keeps_other_fields() {
        let data = employee().with_status(EmploymentStatus::OnLeave);

        assert_eq!(data.status, EmploymentStatus::OnLeave);
        assert_eq!(data.last_name, "Virtanen");
    }

    #[test]
    fn test_deserializes_snake_case_status() {
        let json = serde_json::json!({
            "first_name": "Aino",
            "last_name": "Virtanen",
            "email": "aino@example.com",
            "location_id": 4,
            "status": "on_leave",
            "hired_on": "2024-03-01"
        });

        let data: EmployeeData = serde_json::from_value(json).unwrap();

        assert_eq!(data.status, EmploymentStatus::OnLeave);
        assert_eq!(data.location_id, LocationId::from_raw(4));
    }
}
