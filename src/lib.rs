//! Locmap - locate the user, search nearby places, and keep map markers in sync.
//!
//! This library provides the location flow and its collaborators for the
//! `locmap` binary and for other hosts embedding a map surface.

pub mod config;
pub mod error;
pub mod flow;
pub mod geolocation;
pub mod models;
pub mod notice;
pub mod popup;
pub mod search;
pub mod surface;

pub use error::{FlowError, LocationError, SearchError};
pub use flow::{FlowSettings, FlowState, LocationFlow, SearchOutcome};
pub use models::{Coordinate, PlaceResult};
