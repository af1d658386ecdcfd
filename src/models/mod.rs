//! Core data models for the location flow.

pub mod coordinate;
pub mod place;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use place::{PlaceResult, PLACEHOLDER_NAME};
