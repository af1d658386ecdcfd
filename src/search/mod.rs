//! Place search collaborator.

mod client;
mod response;

use futures::future::LocalBoxFuture;

use crate::error::SearchError;
use crate::models::{Coordinate, PlaceResult};

pub use client::{SearchBoxClient, DEFAULT_ENDPOINT};
pub use response::parse_features;

/// One search: a query term biased toward an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub anchor: Coordinate,
}

/// Finds places matching a query near an anchor
pub trait PlaceSearch {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> LocalBoxFuture<'a, Result<Vec<PlaceResult>, SearchError>>;
}
