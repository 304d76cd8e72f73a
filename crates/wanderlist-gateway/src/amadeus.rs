//! Amadeus self-service endpoints: city codes, flight offers and activities.

use chrono::{Duration, Utc};
use wanderlist_core::FlightEstimate;

use crate::client::{ApiClient, Auth};
use crate::duration::{format_duration, parse_iso_duration};
use crate::token::TokenManager;
use crate::types::{ActivitiesResponse, FlightOffer, FlightOffersResponse, LocationsResponse};

const LOCATIONS_PATH: &str = "v1/reference-data/locations";
const FLIGHT_OFFERS_PATH: &str = "v2/shopping/flight-offers";
const ACTIVITIES_PATH: &str = "v1/shopping/activities";

/// How far ahead flight offers are sampled.
const DEPARTURE_LEAD_DAYS: i64 = 30;
const MAX_OFFERS: &str = "5";
const ACTIVITY_RADIUS_KM: &str = "10";

/// Client for the Amadeus endpoints that need a bearer token.
#[derive(Debug)]
pub struct AmadeusClient {
    api: ApiClient,
    tokens: TokenManager,
}

impl AmadeusClient {
    pub(crate) fn new(api: ApiClient, tokens: TokenManager) -> Self {
        Self { api, tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Resolves a free-text city name to its 3-letter location code.
    ///
    /// `None` when no token is available, nothing matches, or the call fails.
    pub async fn city_code(&self, keyword: &str) -> Option<String> {
        let token = self.tokens.get_token().await?;
        let url = self.api.endpoint(
            LOCATIONS_PATH,
            &[("subType", "CITY"), ("keyword", keyword), ("page[limit]", "1")],
        );
        match self
            .api
            .get_json::<LocationsResponse>(&url, Auth::Bearer(&token))
            .await
        {
            Ok(response) => response.data.into_iter().find_map(|l| l.iata_code),
            Err(e) => {
                tracing::error!(keyword, error = %e, "city code lookup failed");
                None
            }
        }
    }

    /// Price range and average duration for flights `origin` → `destination`
    /// departing ~30 days from now.
    ///
    /// `destination` longer than 3 characters is a city name and is resolved
    /// with [`AmadeusClient::city_code`] first. A route whose endpoints are
    /// the same code returns `None` without any flight search.
    pub async fn flight_estimates(&self, origin: &str, destination: &str) -> Option<FlightEstimate> {
        if origin.eq_ignore_ascii_case(destination) {
            tracing::debug!(origin, "origin equals destination, skipping flight search");
            return None;
        }

        let destination_code = if destination.chars().count() > 3 {
            let Some(code) = self.city_code(destination).await else {
                tracing::warn!(destination, "no location code found for destination");
                return None;
            };
            code
        } else {
            destination.to_string()
        };

        if destination_code.eq_ignore_ascii_case(origin) {
            tracing::debug!(origin, "resolved destination equals origin, skipping flight search");
            return None;
        }

        let token = self.tokens.get_token().await?;
        let departure_date = departure_date();
        let url = self.api.endpoint(
            FLIGHT_OFFERS_PATH,
            &[
                ("originLocationCode", origin),
                ("destinationLocationCode", destination_code.as_str()),
                ("departureDate", departure_date.as_str()),
                ("adults", "1"),
                ("nonStop", "false"),
                ("max", MAX_OFFERS),
            ],
        );

        tracing::info!(origin, destination = %destination_code, %departure_date, "searching flight offers");
        let response = match self
            .api
            .get_json::<FlightOffersResponse>(&url, Auth::Bearer(&token))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(origin, destination = %destination_code, error = %e, "flight offer search failed");
                return None;
            }
        };

        if response.data.is_empty() {
            tracing::warn!(origin, destination = %destination_code, "no flight offers found");
            return None;
        }
        summarize_offers(&response.data, &destination_code)
    }

    /// Names of activities within 10 km of the coordinates.
    ///
    /// Never fails: no token or a failed call yields an empty list.
    pub async fn points_of_interest(&self, lat: f64, lng: f64) -> Vec<String> {
        let Some(token) = self.tokens.get_token().await else {
            return Vec::new();
        };
        let latitude = lat.to_string();
        let longitude = lng.to_string();
        let url = self.api.endpoint(
            ACTIVITIES_PATH,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("radius", ACTIVITY_RADIUS_KM),
            ],
        );
        match self
            .api
            .get_json::<ActivitiesResponse>(&url, Auth::Bearer(&token))
            .await
        {
            Ok(response) => response.data.into_iter().filter_map(|a| a.name).collect(),
            Err(e) => {
                tracing::error!(lat, lng, error = %e, "points of interest lookup failed");
                Vec::new()
            }
        }
    }
}

/// ISO date (`YYYY-MM-DD`) `DEPARTURE_LEAD_DAYS` from today, UTC.
fn departure_date() -> String {
    (Utc::now() + Duration::days(DEPARTURE_LEAD_DAYS))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// Aggregates a batch of offers into one estimate.
///
/// Offers with an unparseable price are left out of the range; if none
/// parse there is no estimate. The arrival airport comes from the last
/// segment of the first offer that has an itinerary, falling back to the
/// searched destination code.
pub(crate) fn summarize_offers(offers: &[FlightOffer], destination_code: &str) -> Option<FlightEstimate> {
    let prices: Vec<f64> = offers
        .iter()
        .filter_map(|o| o.price.total.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .collect();
    if prices.is_empty() {
        return None;
    }
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let first_itineraries: Vec<_> = offers.iter().filter_map(|o| o.itineraries.first()).collect();
    let average_minutes = if first_itineraries.is_empty() {
        0.0
    } else {
        let total = first_itineraries
            .iter()
            .map(|i| parse_iso_duration(&i.duration))
            .fold(0u64, u64::saturating_add);
        #[allow(clippy::cast_precision_loss)]
        let (total, count) = (total as f64, first_itineraries.len() as f64);
        total / count
    };

    let arrival_airport = first_itineraries
        .first()
        .and_then(|i| i.segments.last())
        .map_or_else(|| destination_code.to_string(), |s| s.arrival.iata_code.clone());

    #[allow(clippy::cast_possible_truncation)]
    let (min, max) = (min.round() as i64, max.round() as i64);
    Some(FlightEstimate {
        min,
        max,
        duration: format_duration(average_minutes),
        arrival_airport,
    })
}
