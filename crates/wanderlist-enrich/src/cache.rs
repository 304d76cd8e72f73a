//! Session-scoped memo of everything the enrichment layer has fetched.
//!
//! One `EnrichmentCache` is built per session and handed to the orchestrator;
//! clones share the same maps. Entries never expire: the session is short
//! and provider quotas are the constraint, not memory. Critical sections are
//! plain map operations, so a `std::sync::Mutex` is enough.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use wanderlist_core::{FlightQuote, Place};

/// Key of the POI cache: coordinates rounded to three decimals (~100 m).
#[must_use]
pub fn poi_key(lat: f64, lng: f64) -> String {
    format!("{lat:.3},{lng:.3}")
}

/// Key of the flight and attempt caches: `"{origin}->{destination}"`, where
/// the destination is the place's city code or, failing that, its name.
#[must_use]
pub fn flight_key(origin: &str, place: &Place) -> String {
    format!("{origin}->{}", place.flight_destination())
}

/// Key of the in-flight lock set: `"{place_id}::{departure}"`.
#[must_use]
pub fn lock_key(place_id: &str, departure: &str) -> String {
    format!("{place_id}::{departure}")
}

#[derive(Debug, Default)]
struct CacheInner {
    images: HashMap<String, String>,
    pois: HashMap<String, Vec<String>>,
    flights: HashMap<String, FlightQuote>,
    flight_attempts: HashMap<String, u32>,
    /// Lock key → ticket of the current holder.
    in_flight: HashMap<String, u64>,
    next_ticket: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl EnrichmentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Image URL by place id.
    #[must_use]
    pub fn image(&self, place_id: &str) -> Option<String> {
        self.lock().images.get(place_id).cloned()
    }

    pub fn put_image(&self, place_id: &str, url: String) {
        self.lock().images.insert(place_id.to_string(), url);
    }

    /// POI names by [`poi_key`]. An empty list is a valid, cached answer.
    #[must_use]
    pub fn pois(&self, key: &str) -> Option<Vec<String>> {
        self.lock().pois.get(key).cloned()
    }

    pub fn put_pois(&self, key: String, names: Vec<String>) {
        self.lock().pois.insert(key, names);
    }

    /// Flight quote by [`flight_key`], including memoized `Unavailable`.
    #[must_use]
    pub fn flight(&self, key: &str) -> Option<FlightQuote> {
        self.lock().flights.get(key).cloned()
    }

    pub fn put_flight(&self, key: String, quote: FlightQuote) {
        self.lock().flights.insert(key, quote);
    }

    /// Failed flight lookups recorded for the route so far.
    #[must_use]
    pub fn flight_attempts(&self, key: &str) -> u32 {
        self.lock().flight_attempts.get(key).copied().unwrap_or(0)
    }

    /// Records one more failed lookup and returns the new count.
    pub fn record_flight_failure(&self, key: &str) -> u32 {
        let mut inner = self.lock();
        let count = inner.flight_attempts.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Takes the in-flight lock for `key`, or `None` if someone holds it.
    ///
    /// The lock is held until the returned guard is dropped.
    #[must_use]
    pub fn try_lock(&self, key: &str) -> Option<InFlightGuard> {
        let mut inner = self.lock();
        if inner.in_flight.contains_key(key) {
            return None;
        }
        inner.next_ticket += 1;
        let ticket = inner.next_ticket;
        inner.in_flight.insert(key.to_string(), ticket);
        Some(InFlightGuard {
            cache: self.clone(),
            key: key.to_string(),
            ticket,
        })
    }

    #[must_use]
    pub fn is_locked(&self, key: &str) -> bool {
        self.lock().in_flight.contains_key(key)
    }

    /// Forgets every cached value and attempt count. Held locks are kept.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.images.clear();
        inner.pois.clear();
        inner.flights.clear();
        inner.flight_attempts.clear();
    }
}

/// Holder of one in-flight lock. Dropping it releases the lock, but only if
/// the lock still belongs to this guard's ticket.
#[derive(Debug)]
pub struct InFlightGuard {
    cache: EnrichmentCache,
    key: String,
    ticket: u64,
}

impl InFlightGuard {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut inner = self.cache.lock();
        if inner.in_flight.get(&self.key) == Some(&self.ticket) {
            inner.in_flight.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use wanderlist_core::{Coordinates, FlightEstimate};

    use super::*;

    fn place(city_code: &str, name: &str) -> Place {
        Place::from_stored(
            "p1",
            name,
            "Portugal",
            city_code,
            Coordinates { lat: 0.0, lng: 0.0 },
            "",
            None,
        )
    }

    #[test]
    fn poi_key_rounds_to_three_decimals() {
        assert_eq!(poi_key(38.722_34, -9.139_37), "38.722,-9.139");
        assert_eq!(poi_key(1.0, 2.0), "1.000,2.000");
    }

    #[test]
    fn flight_key_prefers_city_code_then_name() {
        assert_eq!(flight_key("PAR", &place(" LIS ", "Lisbon")), "PAR->LIS");
        assert_eq!(flight_key("PAR", &place("  ", " Lisbon ")), "PAR->Lisbon");
    }

    #[test]
    fn lock_key_joins_place_and_departure() {
        assert_eq!(lock_key("abc", "LYS"), "abc::LYS");
    }

    #[test]
    fn clones_share_state() {
        let cache = EnrichmentCache::new();
        let other = cache.clone();
        cache.put_image("p1", "https://img/1".to_string());
        assert_eq!(other.image("p1").as_deref(), Some("https://img/1"));
    }

    #[test]
    fn flight_failures_accumulate() {
        let cache = EnrichmentCache::new();
        assert_eq!(cache.flight_attempts("PAR->LIS"), 0);
        assert_eq!(cache.record_flight_failure("PAR->LIS"), 1);
        assert_eq!(cache.record_flight_failure("PAR->LIS"), 2);
        assert_eq!(cache.flight_attempts("PAR->LIS"), 2);
        assert_eq!(cache.flight_attempts("LYS->LIS"), 0);
    }

    #[test]
    fn lock_is_exclusive_until_guard_drops() {
        let cache = EnrichmentCache::new();
        let guard = cache.try_lock("p1::PAR").expect("free lock");
        assert!(cache.is_locked("p1::PAR"));
        assert!(cache.try_lock("p1::PAR").is_none());
        assert!(cache.try_lock("p1::LYS").is_some());

        drop(guard);
        assert!(!cache.is_locked("p1::PAR"));
        assert!(cache.try_lock("p1::PAR").is_some());
    }

    #[test]
    fn stale_guard_cannot_release_newer_holder() {
        let cache = EnrichmentCache::new();
        let first = cache.try_lock("p1::PAR").expect("free lock");

        // Simulate an out-of-band release followed by a new holder.
        cache.lock().in_flight.remove("p1::PAR");
        let second = cache.try_lock("p1::PAR").expect("released lock");

        drop(first);
        assert!(cache.is_locked("p1::PAR"));
        drop(second);
        assert!(!cache.is_locked("p1::PAR"));
    }

    #[test]
    fn clear_forgets_values_but_keeps_locks() {
        let cache = EnrichmentCache::new();
        cache.put_image("p1", "u".to_string());
        cache.put_pois("1.000,2.000".to_string(), vec!["A".to_string()]);
        cache.put_flight(
            "PAR->LIS".to_string(),
            FlightQuote::Estimate(FlightEstimate {
                min: 1,
                max: 2,
                duration: "1h00".to_string(),
                arrival_airport: "LIS".to_string(),
            }),
        );
        cache.record_flight_failure("PAR->NYC");
        let _guard = cache.try_lock("p1::PAR");

        cache.clear();

        assert!(cache.image("p1").is_none());
        assert!(cache.pois("1.000,2.000").is_none());
        assert!(cache.flight("PAR->LIS").is_none());
        assert_eq!(cache.flight_attempts("PAR->NYC"), 0);
        assert!(cache.is_locked("p1::PAR"));
    }
}
