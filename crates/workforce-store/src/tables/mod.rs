//! Per-aggregate table mappings.

pub mod employee;
pub mod location;

pub use employee::EmployeeTable;
pub use location::LocationTable;
