//! The location flow: locate the user, mount the map, search nearby, and keep
//! the displayed markers in sync with the latest search.

mod state;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{FlowError, LocationError, SearchError};
use crate::geolocation::Geolocator;
use crate::models::{Coordinate, PlaceResult};
use crate::notice::{Notice, Notifier};
use crate::popup::{pick_label, Popup};
use crate::search::{PlaceSearch, SearchRequest};
use crate::surface::{MapEngine, MapSurface, MarkerColor, MarkerHandle, MarkerSpec};

pub use state::{FlowState, InitState, SearchOutcome, SearchTicket};

type MarkerOf<E> = <<E as MapEngine>::Surface as MapSurface>::Marker;

/// Fixed parameters of a flow
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Style handed to the map engine
    pub style: String,
    /// Where the map starts before the user's location is known
    pub default_center: Coordinate,
    pub zoom: f64,
    /// Searched automatically once the user is located
    pub query: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            style: "mapbox://styles/mapbox/streets-v11".to_string(),
            default_center: Coordinate {
                longitude: 77.209,
                latitude: 28.6139,
            },
            zoom: 12.0,
            query: "plastic".to_string(),
        }
    }
}

impl FlowSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            style: config.map.style.clone(),
            default_center: config.default_center()?,
            zoom: config.map.zoom,
            query: config.search.query.trim().to_string(),
        })
    }
}

/// Owns the map surface, the anchor and the marker set for one widget lifetime.
pub struct LocationFlow<E: MapEngine> {
    engine: E,
    geolocator: Box<dyn Geolocator>,
    places: Box<dyn PlaceSearch>,
    notifier: Box<dyn Notifier>,
    settings: FlowSettings,

    init: InitState,
    surface: Option<E::Surface>,
    state: FlowState,
    anchor: Option<Coordinate>,
    self_marker: Option<MarkerOf<E>>,
    /// Markers of the most recently applied search, in result order
    markers: Vec<MarkerOf<E>>,

    next_generation: u64,
    /// Newest generation whose result has been applied
    settled_generation: u64,
}

impl<E: MapEngine> LocationFlow<E> {
    pub fn new(
        engine: E,
        settings: FlowSettings,
        geolocator: impl Geolocator + 'static,
        places: impl PlaceSearch + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            engine,
            geolocator: Box::new(geolocator),
            places: Box::new(places),
            notifier: Box::new(notifier),
            settings,
            init: InitState::Uninitialized,
            surface: None,
            state: FlowState::Idle,
            anchor: None,
            self_marker: None,
            markers: Vec::new(),
            next_generation: 0,
            settled_generation: 0,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn init_state(&self) -> InitState {
        self.init
    }

    pub fn anchor(&self) -> Option<Coordinate> {
        self.anchor
    }

    pub fn surface(&self) -> Option<&E::Surface> {
        self.surface.as_ref()
    }

    /// Number of search markers currently displayed (excludes the self marker)
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn has_self_marker(&self) -> bool {
        self.self_marker.is_some()
    }

    /// Construct the map surface at the default center.
    ///
    /// Returns `Ok(false)` if the surface already exists.
    pub fn mount(&mut self) -> Result<bool, FlowError> {
        match self.init {
            InitState::Uninitialized => {}
            InitState::Initializing | InitState::Ready => return Ok(false),
            InitState::Released => return Err(FlowError::TornDown),
        }

        self.init = InitState::Initializing;
        let surface = self
            .engine
            .construct(
                &self.settings.style,
                self.settings.default_center,
                self.settings.zoom,
            );
        self.surface = Some(surface);
        self.init = InitState::Ready;

        info!(
            "Map mounted at {} zoom {}",
            self.settings.default_center, self.settings.zoom
        );
        Ok(true)
    }

    /// Mount the map, then request the user's location once.
    ///
    /// Later calls only make sure the map is mounted.
    pub async fn activate(&mut self) -> Result<(), FlowError> {
        self.mount()?;

        if self.state != FlowState::Idle {
            debug!("Already activated ({:?})", self.state);
            return Ok(());
        }

        self.state = FlowState::Locating;
        let result = self.geolocator.locate().await;
        self.on_location(result).await
    }

    /// Apply the result of the location request.
    ///
    /// On success the map is re-centered, the self marker placed and the
    /// configured query searched. On failure the user is notified and the map
    /// stays where it is.
    pub async fn on_location(
        &mut self,
        result: Result<Coordinate, LocationError>,
    ) -> Result<(), FlowError> {
        if self.init == InitState::Released {
            return Err(FlowError::TornDown);
        }
        if !matches!(self.state, FlowState::Idle | FlowState::Locating) {
            debug!("Ignoring location result in state {:?}", self.state);
            return Ok(());
        }

        let coordinate = match result {
            Ok(c) => c,
            Err(e) => {
                warn!("Location unavailable: {}", e);
                self.state = FlowState::LocationFailed;
                self.notifier.notify(&Notice::LocationUnavailable {
                    reason: e.to_string(),
                });
                return Ok(());
            }
        };

        let surface = self.surface.as_mut().ok_or(FlowError::NotMounted)?;
        surface.set_center(coordinate);
        let spec = MarkerSpec::new(coordinate, MarkerColor::Blue, Popup::self_location());
        self.self_marker = Some(surface.add_marker(&spec));
        self.anchor = Some(coordinate);
        self.state = FlowState::LocatedAnchor;
        info!("Located user at {}", coordinate);

        let query = self.settings.query.clone();
        self.search(&query).await?;
        Ok(())
    }

    /// Search near the anchor and apply the result
    pub async fn search(&mut self, query: &str) -> Result<SearchOutcome, FlowError> {
        let ticket = self.begin_search(query)?;
        let result = self.places.search(ticket.request()).await;
        Ok(self.apply(ticket, result))
    }

    /// Start a search without performing it.
    ///
    /// The caller runs the request for the ticket and hands the result to
    /// [`apply`](Self::apply); several tickets may be in flight at once.
    pub fn begin_search(&mut self, query: &str) -> Result<SearchTicket, FlowError> {
        if self.init == InitState::Released {
            return Err(FlowError::TornDown);
        }

        let query = query.trim();
        if query.is_empty() {
            return Err(FlowError::EmptyQuery);
        }
        let anchor = self.anchor.ok_or(FlowError::NoAnchor)?;

        self.next_generation += 1;
        self.state = FlowState::Searching;
        debug!("Search #{} for {:?} near {}", self.next_generation, query, anchor);

        Ok(SearchTicket {
            generation: self.next_generation,
            request: SearchRequest {
                query: query.to_string(),
                anchor,
            },
        })
    }

    /// Apply a search result unless it has been superseded
    pub fn apply(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<PlaceResult>, SearchError>,
    ) -> SearchOutcome {
        let SearchTicket {
            generation,
            request,
        } = ticket;

        if self.surface.is_none() {
            debug!("Discarding search #{}: map is gone", generation);
            return SearchOutcome::Discarded;
        }
        if generation <= self.settled_generation {
            debug!(
                "Discarding search #{}: #{} already applied",
                generation, self.settled_generation
            );
            return SearchOutcome::Discarded;
        }
        self.settled_generation = generation;

        let query = request.query.clone();
        match result {
            Ok(places) if places.is_empty() => {
                info!("No places found for {:?}", query);
                self.state = FlowState::NoResults;
                self.notifier.notify(&Notice::NoResults { query });
                SearchOutcome::NoResults
            }
            Ok(places) => {
                let markers = self.reconcile(request.anchor, &places);
                self.state = FlowState::MarkersDisplayed;
                SearchOutcome::Displayed { markers }
            }
            Err(e) => {
                warn!("Search for {:?} failed: {}", query, e);
                self.state = FlowState::SearchFailed;
                let notice = if e.is_parse() {
                    Notice::SearchUnreadable { query }
                } else {
                    Notice::SearchFailed { query }
                };
                self.notifier.notify(&notice);
                SearchOutcome::Failed
            }
        }
    }

    /// Replace the displayed search markers with markers for `places`.
    ///
    /// Every popup is built before the first old marker is removed.
    fn reconcile(&mut self, anchor: Coordinate, places: &[PlaceResult]) -> usize {
        let mut rng = rand::thread_rng();
        let specs: Vec<MarkerSpec> = places
            .iter()
            .map(|place| {
                let popup = Popup::for_place(pick_label(&mut rng), place);
                MarkerSpec::new(place.coordinate, MarkerColor::Red, popup)
            })
            .collect();

        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };

        let removed = self.markers.len();
        for marker in self.markers.drain(..) {
            marker.remove();
        }
        self.markers = specs.iter().map(|spec| surface.add_marker(spec)).collect();
        surface.fly_to(anchor, self.settings.zoom);

        debug!(
            "Reconciled markers: removed {}, added {}",
            removed,
            self.markers.len()
        );
        self.markers.len()
    }

    /// Release every marker and the map. Results arriving afterwards are
    /// discarded.
    pub fn teardown(&mut self) {
        if self.init == InitState::Released {
            return;
        }

        for marker in self.markers.drain(..) {
            marker.remove();
        }
        if let Some(marker) = self.self_marker.take() {
            marker.remove();
        }
        if let Some(surface) = self.surface.take() {
            surface.remove();
            info!("Map released");
        }
        self.init = InitState::Released;
    }
}

impl<E: MapEngine> Drop for LocationFlow<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
