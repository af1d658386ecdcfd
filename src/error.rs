//! Error taxonomy for the location flow and its collaborators.

use thiserror::Error;

/// Why the one-shot location request produced no coordinate
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location request timed out")]
    Timeout,
    #[error("location unsupported: {0}")]
    Unsupported(String),
    #[error("location unavailable: {0}")]
    Other(String),
}

/// Failure of a place-search request
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("search request timed out")]
    Timeout,
    #[error("failed to parse search response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SearchError {
    /// Malformed responses are reported separately from transport failures
    pub fn is_parse(&self) -> bool {
        matches!(self, SearchError::Parse(_))
    }
}

/// Precondition failures of the flow API itself.
///
/// These are caller errors; collaborator failures are recovered inside the
/// flow and surfaced as notices instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("search query must not be empty")]
    EmptyQuery,
    #[error("no anchor coordinate has been acquired")]
    NoAnchor,
    #[error("map surface is not mounted")]
    NotMounted,
    #[error("flow has been torn down")]
    TornDown,
}
