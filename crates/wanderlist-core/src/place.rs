//! Wishlist destinations and the enrichment values attached to them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel id of the unconfirmed map-click candidate.
pub const TEMP_PLACE_ID: &str = "temp";

/// Upper bound on `Place::what_to_see`.
pub const MAX_POINTS_OF_INTEREST: usize = 5;

const TEMP_SHORT_DESCRIPTION: &str = "New destination found...";

/// A wishlist destination.
///
/// Fields loaded from persistence are `id` through `image_url`; the rest is
/// populated in memory by the enrichment orchestrator and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub country: String,
    pub city_code: String,
    pub lat: f64,
    pub lng: f64,
    pub short_description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_dynamic_image: bool,
    #[serde(default)]
    pub what_to_see: Vec<String>,
    #[serde(default)]
    pub has_dynamic_pois: bool,
    /// Keyed by departure code.
    #[serde(default)]
    pub flight_prices: BTreeMap<String, FlightQuote>,
    /// No producer populates this yet; always empty.
    #[serde(default)]
    pub best_months: Vec<String>,
}

impl Place {
    /// Builds a place as returned by a persistence adapter: stored columns
    /// only, every enrichment field empty.
    #[must_use]
    pub fn from_stored(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        city_code: impl Into<String>,
        coordinates: Coordinates,
        short_description: impl Into<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            city_code: city_code.into(),
            lat: coordinates.lat,
            lng: coordinates.lng,
            short_description: short_description.into(),
            image_url,
            is_dynamic_image: false,
            what_to_see: Vec::new(),
            has_dynamic_pois: false,
            flight_prices: BTreeMap::new(),
            best_months: Vec::new(),
        }
    }

    /// Builds the provisional candidate for a map click that resolved to `city`.
    ///
    /// The city code is a heuristic (first three letters, upper-cased); the
    /// flight lookup resolves a real code later from the name.
    #[must_use]
    pub fn temp_marker(city: &ResolvedCity, at: Coordinates) -> Self {
        Self::from_stored(
            TEMP_PLACE_ID,
            city.name.clone(),
            city.country.clone(),
            derive_city_code(&city.name),
            at,
            TEMP_SHORT_DESCRIPTION,
            None,
        )
    }

    #[must_use]
    pub fn is_temp(&self) -> bool {
        self.id == TEMP_PLACE_ID
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Destination used for flight lookups: the city code when present,
    /// otherwise the name, trimmed.
    #[must_use]
    pub fn flight_destination(&self) -> &str {
        let code = self.city_code.trim();
        if code.is_empty() {
            self.name.trim()
        } else {
            code
        }
    }

    #[must_use]
    pub fn flight_quote(&self, departure: &str) -> Option<&FlightQuote> {
        self.flight_prices.get(departure)
    }
}

/// First three characters of `name`, upper-cased.
#[must_use]
pub fn derive_city_code(name: &str) -> String {
    name.trim().chars().take(3).collect::<String>().to_uppercase()
}

/// Normalizes a departure code: three ASCII letters, upper-cased.
#[must_use]
pub fn departure_code(s: &str) -> Option<String> {
    let code = s.trim();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

/// Partial place handed to [`crate::PlaceRepository::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    pub name: String,
    pub country: String,
    pub city_code: String,
    pub lat: f64,
    pub lng: f64,
    pub short_description: String,
    pub image_url: Option<String>,
}

impl From<&Place> for NewPlace {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            country: place.country.clone(),
            city_code: place.city_code.clone(),
            lat: place.lat,
            lng: place.lng,
            short_description: place.short_description.clone(),
            image_url: place.image_url.clone(),
        }
    }
}

/// Price range and typical duration for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEstimate {
    pub min: i64,
    pub max: i64,
    /// `"{hours}h{minutes:02}"`, e.g. `"2h05"`.
    pub duration: String,
    pub arrival_airport: String,
}

/// What is known about a route: an estimate, or the marker recorded after
/// repeated lookup failures. `Unavailable` serializes as `{"unavailable": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuoteRepr", into = "QuoteRepr")]
pub enum FlightQuote {
    Estimate(FlightEstimate),
    Unavailable,
}

impl FlightQuote {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    #[must_use]
    pub fn estimate(&self) -> Option<&FlightEstimate> {
        match self {
            Self::Estimate(estimate) => Some(estimate),
            Self::Unavailable => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum QuoteRepr {
    Estimate(FlightEstimate),
    Unavailable { unavailable: bool },
}

impl From<QuoteRepr> for FlightQuote {
    fn from(repr: QuoteRepr) -> Self {
        match repr {
            QuoteRepr::Estimate(estimate) => Self::Estimate(estimate),
            QuoteRepr::Unavailable { .. } => Self::Unavailable,
        }
    }
}

impl From<FlightQuote> for QuoteRepr {
    fn from(quote: FlightQuote) -> Self {
        match quote {
            FlightQuote::Estimate(estimate) => Self::Estimate(estimate),
            FlightQuote::Unavailable => Self::Unavailable { unavailable: true },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Result of reverse-geocoding a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCity {
    pub name: String,
    pub country: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Map,
    List,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Map => write!(f, "map"),
            ViewMode::List => write!(f, "list"),
        }
    }
}
