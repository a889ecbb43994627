//! Domain layer for the Locations context.

pub mod facility;
pub mod location;
pub mod tree;
