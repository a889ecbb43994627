//! Per-session expansion state of country nodes.

use std::collections::HashMap;

use workforce_core::error::DomainError;
use workforce_core::page::Page;
use workforce_core::repository::{Database, Transaction};

use crate::domain::location::CountryCode;
use crate::domain::tree::{LocationNode, LocationSearch, LocationSortProperty};
use crate::repository::{LocationIndex, LocationTransaction};

/// Expansion state of one country node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpansionState {
    /// Children not loaded.
    #[default]
    Collapsed,
    /// Children are being fetched.
    Expanding,
    /// Children loaded; holds the last fetched page.
    Expanded(Vec<LocationNode>),
}

impl ExpansionState {
    /// Loaded children; empty unless expanded.
    #[must_use]
    pub fn nodes(&self) -> &[LocationNode] {
        match self {
            Self::Expanded(nodes) => nodes,
            Self::Collapsed | Self::Expanding => &[],
        }
    }
}

/// Expansion state of the country nodes one caller is browsing.
///
/// Owned by a single session; nothing here is shared between callers.
#[derive(Debug, Default)]
pub struct TreeExpansion {
    states: HashMap<CountryCode, ExpansionState>,
}

impl TreeExpansion {
    /// Creates an all-collapsed tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `country`.
    #[must_use]
    pub fn state(&self, country: &CountryCode) -> &ExpansionState {
        static COLLAPSED: ExpansionState = ExpansionState::Collapsed;
        self.states.get(country).unwrap_or(&COLLAPSED)
    }

    /// Expands `country`, fetching `page` of its locations matching `search`.
    ///
    /// Re-expanding an expanded country fetches again and replaces the
    /// cached page. On failure the country falls back to collapsed.
    ///
    /// # Errors
    ///
    /// Propagates any store error from the fetch.
    pub async fn expand<D>(
        &mut self,
        db: &D,
        country: &CountryCode,
        search: Option<&LocationSearch>,
        page: &Page<LocationSortProperty>,
    ) -> Result<&[LocationNode], DomainError>
    where
        D: Database,
        D::Tx: LocationTransaction,
    {
        self.states.insert(country.clone(), ExpansionState::Expanding);

        let fetched = async {
            let mut tx = db.begin().await?;
            let nodes = tx.locations().find_locations(country, search, page).await?;
            tx.commit().await?;
            Ok::<_, DomainError>(nodes)
        }
        .await;

        let nodes = match fetched {
            Ok(nodes) => nodes,
            Err(err) => {
                self.states.remove(country);
                return Err(err);
            }
        };
        let state = self.states.entry(country.clone()).or_default();
        *state = ExpansionState::Expanded(nodes);
        Ok(state.nodes())
    }

    /// Collapses `country`, dropping its cached page.
    pub fn collapse(&mut self, country: &CountryCode) {
        self.states.remove(country);
    }

    /// Countries currently expanded.
    pub fn expanded(&self) -> impl Iterator<Item = &CountryCode> {
        self.states
            .iter()
            .filter(|(_, state)| matches!(state, ExpansionState::Expanded(_)))
            .map(|(country, _)| country)
    }
}
