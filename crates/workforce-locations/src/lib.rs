//! Locations bounded context.
//!
//! Responsible for office locations, their facilities, and the two-level
//! country → location tree used to browse them.

pub mod application;
pub mod domain;
pub mod repository;
