//! Scriptable in-process gateway and repository for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Notify, Semaphore};
use wanderlist_core::{
    Coordinates, FlightEstimate, NewPlace, Place, PlaceRepository, RepositoryError, ResolvedCity,
};
use wanderlist_gateway::TravelGateway;

use crate::memory::InMemoryPlaceRepository;

#[derive(Debug, Default)]
pub(crate) struct CallCounts {
    pub images: AtomicUsize,
    pub pois: AtomicUsize,
    pub flights: AtomicUsize,
    pub geocodes: AtomicUsize,
}

impl CallCounts {
    pub fn images(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }

    pub fn pois(&self) -> usize {
        self.pois.load(Ordering::SeqCst)
    }

    pub fn flights(&self) -> usize {
        self.flights.load(Ordering::SeqCst)
    }

    pub fn geocodes(&self) -> usize {
        self.geocodes.load(Ordering::SeqCst)
    }
}

/// Gateway with fixed answers that counts every call.
///
/// With a flight gate installed, each flight lookup signals `flight_started`
/// and then waits for a permit on the gate.
#[derive(Debug)]
pub(crate) struct FakeGateway {
    pub image: Option<String>,
    pub pois: Vec<String>,
    pub flight: Option<FlightEstimate>,
    pub city: Option<ResolvedCity>,
    pub flight_gate: Option<Arc<Semaphore>>,
    pub flight_started: Arc<Notify>,
    pub calls: CallCounts,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            image: Some("https://images.test/photo-1?ixid=abc".to_string()),
            pois: (1..=7).map(|i| format!("Sight {i}")).collect(),
            flight: Some(estimate()),
            city: None,
            flight_gate: None,
            flight_started: Arc::new(Notify::new()),
            calls: CallCounts::default(),
        }
    }
}

pub(crate) fn estimate() -> FlightEstimate {
    FlightEstimate {
        min: 89,
        max: 240,
        duration: "2h35".to_string(),
        arrival_airport: "LIS".to_string(),
    }
}

impl TravelGateway for FakeGateway {
    async fn destination_image(&self, _query: &str) -> Option<String> {
        self.calls.images.fetch_add(1, Ordering::SeqCst);
        self.image.clone()
    }

    async fn city_code(&self, _city: &str) -> Option<String> {
        None
    }

    async fn flight_estimates(&self, _origin: &str, _destination: &str) -> Option<FlightEstimate> {
        self.calls.flights.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.flight_gate {
            self.flight_started.notify_one();
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.flight.clone()
    }

    async fn points_of_interest(&self, _at: Coordinates) -> Vec<String> {
        self.calls.pois.fetch_add(1, Ordering::SeqCst);
        self.pois.clone()
    }

    async fn city_from_coordinates(&self, _at: Coordinates) -> Option<ResolvedCity> {
        self.calls.geocodes.fetch_add(1, Ordering::SeqCst);
        self.city.clone()
    }
}

/// In-memory repository with a failure switch and call counters.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyRepository {
    pub inner: InMemoryPlaceRepository,
    pub failing: Arc<Mutex<bool>>,
    pub creates: Arc<AtomicUsize>,
    pub deletes: Arc<AtomicUsize>,
}

impl FlakyRepository {
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            inner: InMemoryPlaceRepository::with_places(places),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.failing.lock().unwrap() = fail;
    }

    fn is_failing(&self) -> bool {
        *self.failing.lock().unwrap()
    }
}

impl PlaceRepository for FlakyRepository {
    async fn list(&self) -> Result<Vec<Place>, RepositoryError> {
        if self.is_failing() {
            return Err(RepositoryError::Backend("connection refused".to_string()));
        }
        self.inner.list().await
    }

    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.is_failing() {
            return Err(RepositoryError::Backend("insert rejected".to_string()));
        }
        self.inner.create(place).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.is_failing() {
            return Err(RepositoryError::Backend("delete rejected".to_string()));
        }
        self.inner.delete(id).await
    }
}

pub(crate) fn stored(id: &str, name: &str, city_code: &str) -> Place {
    Place::from_stored(
        id,
        name,
        "Somewhere",
        city_code,
        Coordinates {
            lat: 38.7223,
            lng: -9.1393,
        },
        "A place worth the trip.",
        None,
    )
}
