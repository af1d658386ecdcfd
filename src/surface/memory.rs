//! In-memory map surface that records markers and camera moves.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use tracing::debug;

use super::{MapEngine, MapSurface, MarkerHandle, MarkerSpec};
use crate::models::Coordinate;

/// Something that happened to a surface, in order
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Constructed { center: Coordinate, zoom: f64 },
    CenterSet(Coordinate),
    FlewTo { center: Coordinate, zoom: f64 },
    MarkerAdded(u64),
    MarkerRemoved(u64),
    Removed,
}

#[derive(Debug, Clone)]
struct PlacedMarker {
    id: u64,
    spec: MarkerSpec,
}

/// State of one surface: camera, live markers, and the event log
#[derive(Debug)]
pub struct SurfaceLedger {
    style: String,
    center: Coordinate,
    zoom: f64,
    markers: Vec<PlacedMarker>,
    next_marker_id: u64,
    removed: bool,
    events: Vec<SurfaceEvent>,
}

impl SurfaceLedger {
    fn new(style: &str, center: Coordinate, zoom: f64) -> Self {
        Self {
            style: style.to_string(),
            center,
            zoom,
            markers: Vec::new(),
            next_marker_id: 0,
            removed: false,
            events: vec![SurfaceEvent::Constructed { center, zoom }],
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Live markers in attach order
    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.iter().map(|m| &m.spec)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// GeoJSON FeatureCollection of live markers plus the camera
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [m.spec.coordinate.longitude, m.spec.coordinate.latitude]
                    },
                    "properties": {
                        "marker_id": m.id,
                        "color": m.spec.color,
                        "popup": m.spec.popup.html()
                    }
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
            "style": self.style,
            "center": [self.center.longitude, self.center.latitude],
            "zoom": self.zoom,
            "generated_at": chrono::Utc::now().to_rfc3339()
        })
    }
}

/// Engine producing [`MemorySurface`]s.
///
/// Clones share the list of constructed surfaces, so a host can keep a handle
/// after moving the engine into a flow.
#[derive(Debug, Default, Clone)]
pub struct MemoryEngine {
    surfaces: Rc<RefCell<Vec<Rc<RefCell<SurfaceLedger>>>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces ever constructed
    pub fn constructed(&self) -> usize {
        self.surfaces.borrow().len()
    }

    /// Ledger of the most recently constructed surface
    pub fn latest(&self) -> Option<Rc<RefCell<SurfaceLedger>>> {
        self.surfaces.borrow().last().cloned()
    }
}

impl MapEngine for MemoryEngine {
    type Surface = MemorySurface;

    fn construct(&mut self, style: &str, center: Coordinate, zoom: f64) -> MemorySurface {
        debug!("Constructing {} map surface at {} zoom {}", style, center, zoom);
        let ledger = Rc::new(RefCell::new(SurfaceLedger::new(style, center, zoom)));
        self.surfaces.borrow_mut().push(Rc::clone(&ledger));
        MemorySurface { ledger }
    }
}

pub struct MemorySurface {
    ledger: Rc<RefCell<SurfaceLedger>>,
}

impl MemorySurface {
    pub fn ledger(&self) -> Rc<RefCell<SurfaceLedger>> {
        Rc::clone(&self.ledger)
    }
}

impl MapSurface for MemorySurface {
    type Marker = MemoryMarker;

    fn set_center(&mut self, center: Coordinate) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.center = center;
        ledger.events.push(SurfaceEvent::CenterSet(center));
    }

    fn fly_to(&mut self, center: Coordinate, zoom: f64) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.center = center;
        ledger.zoom = zoom;
        ledger.events.push(SurfaceEvent::FlewTo { center, zoom });
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> MemoryMarker {
        let mut ledger = self.ledger.borrow_mut();
        let id = ledger.next_marker_id;
        ledger.next_marker_id += 1;
        ledger.markers.push(PlacedMarker {
            id,
            spec: spec.clone(),
        });
        ledger.events.push(SurfaceEvent::MarkerAdded(id));

        MemoryMarker {
            id,
            ledger: Rc::clone(&self.ledger),
        }
    }

    fn remove(self) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.markers.clear();
        ledger.removed = true;
        ledger.events.push(SurfaceEvent::Removed);
    }
}

#[derive(Debug)]
pub struct MemoryMarker {
    id: u64,
    ledger: Rc<RefCell<SurfaceLedger>>,
}

impl MemoryMarker {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl MarkerHandle for MemoryMarker {
    fn remove(self) {
        let mut ledger = self.ledger.borrow_mut();
        let before = ledger.markers.len();
        ledger.markers.retain(|m| m.id != self.id);
        if ledger.markers.len() != before {
            ledger.events.push(SurfaceEvent::MarkerRemoved(self.id));
        }
    }
}
