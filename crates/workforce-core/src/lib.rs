//! Shared aggregate persistence abstractions for the workforce platform.
//!
//! This crate defines the identifier and version primitives, the aggregate
//! root shape, the sortable query vocabulary and the store traits that all
//! bounded contexts depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod page;
pub mod repository;
pub mod sort;
