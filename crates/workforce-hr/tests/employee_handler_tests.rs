//! Employee handlers and their effect on location tree counts.

use chrono::NaiveDate;
use workforce_core::error::DomainError;
use workforce_core::id::{Identifier, Version};
use workforce_core::page::Page;
use workforce_core::repository::Database;
use workforce_hr::application::command_handlers::{
    change_employment_status, register_employee, remove_employee,
};
use workforce_hr::application::query_handlers::get_employee;
use workforce_hr::domain::employee::{EmployeeData, EmployeeId, EmploymentStatus};
use workforce_locations::application::command_handlers::{create_location, delete_location};
use workforce_locations::application::query_handlers::{fetch_children, find_node};
use workforce_locations::domain::facility::Facilities;
use workforce_locations::domain::location::{
    Address, CountryCode, LocationData, LocationId, LocationType,
};
use workforce_locations::domain::tree::LocationTreeNode;
use workforce_locations::repository::{LocationIndex, LocationTransaction};
use workforce_test_support::InMemoryDatabase;

fn location(name: &str, country: &str) -> LocationData {
    LocationData {
        name: name.to_owned(),
        location_type: LocationType::Office,
        address: Address {
            street: "Kungsgatan 2".to_owned(),
            postal_code: "11143".to_owned(),
            city: "Stockholm".to_owned(),
            country: CountryCode::new(country).unwrap(),
        },
        facilities: Facilities::default(),
    }
}

fn employee(email: &str, location_id: LocationId, status: EmploymentStatus) -> EmployeeData {
    EmployeeData {
        first_name: "Sara".to_owned(),
        last_name: "Lind".to_owned(),
        email: email.to_owned(),
        location_id,
        status,
        hired_on: NaiveDate::from_ymd_opt(2022, 8, 15).unwrap(),
    }
}

async fn location_id(db: &InMemoryDatabase, name: &str, country: &str) -> LocationId {
    create_location(db, location(name, country)).await.unwrap().id
}

#[tokio::test]
async fn test_register_employee_starts_at_version_one() {
    // Arrange
    let db = InMemoryDatabase::new();
    let site = location_id(&db, "Stockholm", "SE").await;

    // Act
    let registered = register_employee(&db, employee("sara@example.com", site, EmploymentStatus::Active))
        .await
        .unwrap();

    // Assert
    assert_eq!(registered.version, Version::INITIAL);
    assert_eq!(get_employee(&db, registered.id).await.unwrap(), registered);
}

#[tokio::test]
async fn test_register_employee_at_unknown_location_is_a_constraint_violation() {
    let db = InMemoryDatabase::new();

    let result = register_employee(
        &db,
        employee("sara@example.com", LocationId::from_raw(99), EmploymentStatus::Active),
    )
    .await;

    assert!(matches!(result, Err(DomainError::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_register_employee_rejects_duplicate_email() {
    let db = InMemoryDatabase::new();
    let site = location_id(&db, "Stockholm", "SE").await;
    register_employee(&db, employee("sara@example.com", site, EmploymentStatus::Active))
        .await
        .unwrap();

    let result =
        register_employee(&db, employee("sara@example.com", site, EmploymentStatus::OnLeave)).await;

    assert!(matches!(result, Err(DomainError::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_status_change_with_stale_version_is_rejected() {
    // Arrange
    let db = InMemoryDatabase::new();
    let site = location_id(&db, "Stockholm", "SE").await;
    let registered = register_employee(&db, employee("sara@example.com", site, EmploymentStatus::Active))
        .await
        .unwrap();
    let on_leave = change_employment_status(&db, registered.id, Version::INITIAL, EmploymentStatus::OnLeave)
        .await
        .unwrap();

    // Act
    let result =
        change_employment_status(&db, registered.id, Version::INITIAL, EmploymentStatus::Terminated)
            .await;

    // Assert
    assert_eq!(on_leave.version, Version::new(2));
    assert!(matches!(
        result,
        Err(DomainError::ConcurrentModification {
            aggregate: "employee",
            expected: 1,
            actual: Some(2),
            ..
        })
    ));
    let stored = get_employee(&db, registered.id).await.unwrap();
    assert_eq!(stored.data.status, EmploymentStatus::OnLeave);
}

#[tokio::test]
async fn test_status_change_of_unknown_employee_is_not_found() {
    let db = InMemoryDatabase::new();

    let result = change_employment_status(
        &db,
        EmployeeId::from_raw(7),
        Version::INITIAL,
        EmploymentStatus::Active,
    )
    .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            aggregate: "employee",
            id: 7
        })
    ));
}

#[tokio::test]
async fn test_tree_counts_only_active_employees() {
    // Arrange
    let db = InMemoryDatabase::new();
    let stockholm = location_id(&db, "Stockholm", "SE").await;
    let uppsala = location_id(&db, "Uppsala", "SE").await;
    let oslo = location_id(&db, "Oslo", "NO").await;
    for (email, site, status) in [
        ("a@example.com", stockholm, EmploymentStatus::Active),
        ("b@example.com", stockholm, EmploymentStatus::Active),
        ("c@example.com", stockholm, EmploymentStatus::OnLeave),
        ("d@example.com", uppsala, EmploymentStatus::Active),
        ("e@example.com", oslo, EmploymentStatus::Terminated),
    ] {
        register_employee(&db, employee(email, site, status)).await.unwrap();
    }

    // Act
    let root = fetch_children(&db, None, None, 10, 0, &[]).await.unwrap();

    // Assert
    let counts: Vec<(String, i64)> = root
        .nodes
        .iter()
        .map(|node| match node {
            LocationTreeNode::Country(node) => (node.country.to_string(), node.employee_count),
            LocationTreeNode::Location(node) => (node.name.clone(), node.employee_count),
        })
        .collect();
    assert_eq!(counts, [("NO".to_owned(), 0), ("SE".to_owned(), 3)]);
    assert_eq!(find_node(&db, stockholm).await.unwrap().unwrap().employee_count, 2);
    assert_eq!(find_node(&db, uppsala).await.unwrap().unwrap().employee_count, 1);
    assert_eq!(find_node(&db, oslo).await.unwrap().unwrap().employee_count, 0);
}

#[tokio::test]
async fn test_status_change_moves_tree_counts() {
    // Arrange
    let db = InMemoryDatabase::new();
    let site = location_id(&db, "Stockholm", "SE").await;
    let registered = register_employee(&db, employee("sara@example.com", site, EmploymentStatus::Active))
        .await
        .unwrap();

    // Act
    change_employment_status(&db, registered.id, registered.version, EmploymentStatus::Terminated)
        .await
        .unwrap();

    // Assert
    let mut tx = db.begin().await.unwrap();
    let nodes = tx
        .locations()
        .find_locations(&CountryCode::new("SE").unwrap(), None, &Page::unsorted(10, 0).unwrap())
        .await
        .unwrap();
    assert_eq!(nodes[0].employee_count, 0);
}

#[tokio::test]
async fn test_location_with_employees_cannot_be_deleted() {
    // Arrange
    let db = InMemoryDatabase::new();
    let site = location_id(&db, "Stockholm", "SE").await;
    let registered = register_employee(&db, employee("sara@example.com", site, EmploymentStatus::Active))
        .await
        .unwrap();

    // Act
    let blocked = delete_location(&db, site).await;
    remove_employee(&db, registered.id).await.unwrap();
    let allowed = delete_location(&db, site).await;

    // Assert
    assert!(matches!(blocked, Err(DomainError::ConstraintViolation(_))));
    assert!(allowed.is_ok());
    assert!(find_node(&db, site).await.unwrap().is_none());
}
