//! Flow and map-initialization states, search tickets and outcomes.

use crate::search::SearchRequest;

/// Where the flow is in its lifecycle.
///
/// `Idle → Locating → {LocatedAnchor, LocationFailed}`, then
/// `LocatedAnchor → Searching → {MarkersDisplayed, SearchFailed, NoResults}`.
/// Every search terminal state can go back to `Searching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Locating,
    LocatedAnchor,
    LocationFailed,
    Searching,
    MarkersDisplayed,
    SearchFailed,
    NoResults,
}

/// Guard against constructing the map surface more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initializing,
    Ready,
    /// Torn down; the surface is gone and will not be rebuilt
    Released,
}

/// Proof that a search was started, tagged with its generation.
///
/// Hand it back to [`LocationFlow::apply`](super::LocationFlow::apply) with
/// the collaborator's result.
#[derive(Debug, Clone)]
#[must_use]
pub struct SearchTicket {
    pub(super) generation: u64,
    pub(super) request: SearchRequest,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }
}

/// What applying a search result did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Previous search markers replaced by this many new ones
    Displayed { markers: usize },
    NoResults,
    Failed,
    /// Superseded or torn down; nothing changed
    Discarded,
}
