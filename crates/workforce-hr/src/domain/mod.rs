//! Domain layer for the HR context.

pub mod employee;
