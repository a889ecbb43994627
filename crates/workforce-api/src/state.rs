//! Shared application state.

use workforce_store::PgDatabase;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Transaction source for every handler.
    pub db: PgDatabase,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgDatabase) -> Self {
        Self { db }
    }
}
