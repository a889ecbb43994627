//! HR records bounded context.
//!
//! Responsible for employees and their employment at a location. Active
//! employments feed the employee counts of the location tree.

pub mod application;
pub mod domain;
pub mod repository;
