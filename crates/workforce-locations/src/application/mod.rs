//! Application layer for the Locations context.

pub mod command_handlers;
pub mod expansion;
pub mod query_handlers;
