//! Application layer for the HR context.

pub mod command_handlers;
pub mod query_handlers;
