//! Per-selection enrichment: image, points of interest and flight prices.
//!
//! [`Enricher::plan`] decides each field independently, reading the
//! session cache first and calling the gateway on misses. [`Enricher::run`]
//! wraps a plan in the in-flight lock, the cancellation check and the
//! publish into the [`PlaceStore`](crate::store::PlaceStore).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wanderlist_core::{FlightQuote, Place, MAX_POINTS_OF_INTEREST, TEMP_PLACE_ID};
use wanderlist_gateway::TravelGateway;

use crate::cache::{flight_key, lock_key, poi_key, EnrichmentCache};
use crate::store::SharedStore;

/// Failed flight lookups per route before it is memoized as unavailable.
pub const MAX_FLIGHT_ATTEMPTS: u32 = 2;

/// Crop, width and quality parameters appended to fetched image URLs.
const IMAGE_SIZE_PARAMS: &str = "&fit=crop&w=1200&q=80";

/// Field values computed for one (place, departure) pair.
///
/// Flags record what was actually attempted this cycle, so unchanged fields
/// are never mistaken for updates.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentPlan {
    pub place_id: String,
    pub departure: String,
    /// Image URL after this cycle; equals the place's current URL when the
    /// lookup was skipped or failed.
    pub image_url: Option<String>,
    pub image_attempted: bool,
    pub image_changed: bool,
    pub what_to_see: Vec<String>,
    pub pois_refetched: bool,
    /// Quote to record under `departure`; `None` unless `flights_updated`.
    pub flight_quote: Option<FlightQuote>,
    pub flights_updated: bool,
}

impl EnrichmentPlan {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.image_changed || self.pois_refetched || self.flights_updated
    }

    /// Writes the plan onto `place`. Attempted image and POI lookups mark
    /// their field dynamic even when the lookup found nothing, so a
    /// permanently failing provider is not asked again.
    pub fn merge_into(&self, place: &mut Place) {
        if self.image_attempted {
            place.image_url.clone_from(&self.image_url);
            place.is_dynamic_image = true;
        }
        if self.pois_refetched {
            place.what_to_see.clone_from(&self.what_to_see);
            place.has_dynamic_pois = true;
        }
        if let Some(quote) = self.flight_quote.as_ref().filter(|_| self.flights_updated) {
            place
                .flight_prices
                .insert(self.departure.clone(), quote.clone());
        }
    }
}

/// Why [`Enricher::run`] did not look at the place at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Loading,
    TempMarker,
    UnknownPlace,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichOutcome {
    Skipped(SkipReason),
    /// Another run holds the lock for the same place and departure.
    AlreadyInFlight,
    /// Superseded before publishing; the result was discarded.
    Cancelled,
    /// Everything was already enriched; the store was not touched.
    Unchanged,
    Published(EnrichmentPlan),
}

/// Enrichment orchestrator over a [`TravelGateway`].
///
/// Clones share the gateway and the cache.
#[derive(Debug)]
pub struct Enricher<G> {
    gateway: Arc<G>,
    cache: EnrichmentCache,
}

impl<G> Clone for Enricher<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            cache: self.cache.clone(),
        }
    }
}

impl<G: TravelGateway> Enricher<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>, cache: EnrichmentCache) -> Self {
        Self { gateway, cache }
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    #[must_use]
    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    /// Computes the three field decisions for `place` against `departure`.
    ///
    /// Never touches the store. Cache writes happen here, so a plan that is
    /// later discarded still spares the next run its network calls.
    pub async fn plan(&self, place: &Place, departure: &str) -> EnrichmentPlan {
        let (image_url, image_attempted) = self.plan_image(place).await;
        let (what_to_see, pois_refetched) = self.plan_pois(place).await;
        let flight_quote = self.plan_flights(place, departure).await;

        EnrichmentPlan {
            place_id: place.id.clone(),
            departure: departure.to_string(),
            image_changed: image_url != place.image_url,
            image_url,
            image_attempted,
            what_to_see,
            pois_refetched,
            flights_updated: flight_quote.is_some(),
            flight_quote,
        }
    }

    async fn plan_image(&self, place: &Place) -> (Option<String>, bool) {
        let has_image = place.image_url.as_deref().is_some_and(|u| !u.is_empty());
        if has_image && place.is_dynamic_image {
            return (place.image_url.clone(), false);
        }
        if let Some(cached) = self.cache.image(&place.id) {
            return (Some(cached), true);
        }

        let query = format!("{} landmark", place.name);
        match self.gateway.destination_image(&query).await {
            Some(url) => {
                let sized = sized_image_url(&url);
                self.cache.put_image(&place.id, sized.clone());
                (Some(sized), true)
            }
            None => (place.image_url.clone(), true),
        }
    }

    async fn plan_pois(&self, place: &Place) -> (Vec<String>, bool) {
        if place.has_dynamic_pois {
            return (place.what_to_see.clone(), false);
        }
        let key = poi_key(place.lat, place.lng);
        if let Some(cached) = self.cache.pois(&key) {
            return (cached, true);
        }

        let mut names = self.gateway.points_of_interest(place.coordinates()).await;
        names.truncate(MAX_POINTS_OF_INTEREST);
        self.cache.put_pois(key, names.clone());
        (names, true)
    }

    /// `Some` when a quote should be recorded for `departure`.
    async fn plan_flights(&self, place: &Place, departure: &str) -> Option<FlightQuote> {
        if place.flight_quote(departure).is_some() {
            return None;
        }
        let key = flight_key(departure, place);
        if let Some(cached) = self.cache.flight(&key) {
            return Some(cached);
        }

        if self.cache.flight_attempts(&key) >= MAX_FLIGHT_ATTEMPTS {
            self.cache.put_flight(key, FlightQuote::Unavailable);
            return Some(FlightQuote::Unavailable);
        }

        match self
            .gateway
            .flight_estimates(departure, place.flight_destination())
            .await
        {
            Some(estimate) => {
                let quote = FlightQuote::Estimate(estimate);
                self.cache.put_flight(key, quote.clone());
                Some(quote)
            }
            None => {
                let attempts = self.cache.record_flight_failure(&key);
                tracing::warn!(route = %key, attempts, "flight lookup failed");
                if attempts >= MAX_FLIGHT_ATTEMPTS {
                    self.cache.put_flight(key, FlightQuote::Unavailable);
                    Some(FlightQuote::Unavailable)
                } else {
                    None
                }
            }
        }
    }

    /// Enriches `place_id` for `departure` and publishes the result into
    /// `store` unless `cancel` fired first.
    ///
    /// A cancelled run still drives its plan to completion so the cache
    /// writes land, then drops the result. The in-flight lock is held until
    /// that completion, so the pair never has two lookups running at once.
    pub async fn run(
        &self,
        store: &SharedStore,
        place_id: &str,
        departure: &str,
        cancel: &CancellationToken,
    ) -> EnrichOutcome {
        let place = {
            let store = store.read().await;
            if store.is_loading() {
                tracing::debug!(place_id, "place list still loading, enrichment skipped");
                return EnrichOutcome::Skipped(SkipReason::Loading);
            }
            if place_id == TEMP_PLACE_ID {
                tracing::debug!("temp marker is never enriched");
                return EnrichOutcome::Skipped(SkipReason::TempMarker);
            }
            match store.place(place_id) {
                Some(place) => place.clone(),
                None => {
                    tracing::debug!(place_id, "unknown place, enrichment skipped");
                    return EnrichOutcome::Skipped(SkipReason::UnknownPlace);
                }
            }
        };

        let key = lock_key(place_id, departure);
        let Some(guard) = self.cache.try_lock(&key) else {
            tracing::debug!(place_id, departure, "enrichment already in flight");
            return EnrichOutcome::AlreadyInFlight;
        };

        let planning = self.plan(&place, departure);
        tokio::pin!(planning);
        let plan = tokio::select! {
            biased;
            plan = &mut planning => plan,
            () = cancel.cancelled() => {
                let _discarded = planning.await;
                drop(guard);
                tracing::debug!(place_id, departure, "enrichment superseded, result discarded");
                return EnrichOutcome::Cancelled;
            }
        };

        if !plan.has_changes() {
            tracing::debug!(place_id, departure, "place already enriched");
            return EnrichOutcome::Unchanged;
        }

        let mut store = store.write().await;
        // Selection changes cancel under the same write lock, so this check
        // cannot race a newer selection.
        if cancel.is_cancelled() {
            tracing::debug!(place_id, departure, "enrichment superseded, result discarded");
            return EnrichOutcome::Cancelled;
        }
        if !store.apply(&plan) {
            tracing::debug!(place_id, "place removed during enrichment");
            return EnrichOutcome::Skipped(SkipReason::UnknownPlace);
        }
        drop(store);
        drop(guard);

        tracing::info!(
            place_id,
            departure,
            image = plan.image_changed,
            pois = plan.pois_refetched,
            flights = plan.flights_updated,
            "enrichment published"
        );
        EnrichOutcome::Published(plan)
    }
}

/// Appends the display size to a photo URL unless it already carries one,
/// as the keyless placeholder does.
fn sized_image_url(url: &str) -> String {
    if url.contains("fit=") {
        url.to_string()
    } else {
        format!("{url}{IMAGE_SIZE_PARAMS}")
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
