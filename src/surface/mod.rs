//! Map-rendering capability consumed by the location flow.
//!
//! The rendering engine itself is external; these traits describe the handful
//! of primitives the flow needs. [`MemoryEngine`] is the in-process engine
//! used by the command-line host and the tests.

mod memory;

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;
use crate::popup::Popup;

pub use memory::{MemoryEngine, MemoryMarker, MemorySurface, SurfaceEvent, SurfaceLedger};

/// Pin color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    /// The user's own position
    Blue,
    /// Search results
    Red,
}

/// Everything needed to place a marker. Built completely before attaching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub coordinate: Coordinate,
    pub color: MarkerColor,
    pub popup: Popup,
}

impl MarkerSpec {
    pub fn new(coordinate: Coordinate, color: MarkerColor, popup: Popup) -> Self {
        Self {
            coordinate,
            color,
            popup,
        }
    }
}

/// Creates map surfaces
pub trait MapEngine {
    type Surface: MapSurface;

    /// Create a map rendered with `style`, centered at `center`
    fn construct(&mut self, style: &str, center: Coordinate, zoom: f64) -> Self::Surface;
}

/// A live map instance
pub trait MapSurface {
    type Marker: MarkerHandle;

    fn set_center(&mut self, center: Coordinate);

    /// Animated re-center and zoom
    fn fly_to(&mut self, center: Coordinate, zoom: f64);

    fn add_marker(&mut self, spec: &MarkerSpec) -> Self::Marker;

    /// Destroy the map instance
    fn remove(self);
}

/// A rendered pin and popup, owned by the surface until removed
pub trait MarkerHandle {
    fn remove(self);
}
