//! Provider response types.
//!
//! Only the fields the gateway reads are modelled; everything else in the
//! provider payloads is ignored. Collections default to empty so a missing
//! `data`/`results` key reads as "no results" rather than a decode failure.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Amadeus OAuth2
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Unsplash search/photos
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoSearchResponse {
    #[serde(default)]
    pub results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Photo {
    pub urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoUrls {
    pub regular: Option<String>,
}

// ---------------------------------------------------------------------------
// Amadeus reference-data/locations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct LocationsResponse {
    #[serde(default)]
    pub data: Vec<Location>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Location {
    pub iata_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Amadeus shopping/flight-offers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlightOffer {
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

/// Amadeus sends amounts as decimal strings, e.g. `"123.45"`.
#[derive(Debug, Deserialize)]
pub(crate) struct OfferPrice {
    pub total: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Itinerary {
    /// ISO-8601 duration such as `"PT2H35M"`.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Segment {
    pub arrival: SegmentEndpoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SegmentEndpoint {
    pub iata_code: String,
}

// ---------------------------------------------------------------------------
// Amadeus shopping/activities
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ActivitiesResponse {
    #[serde(default)]
    pub data: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Activity {
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// BigDataCloud reverse-geocode-client
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReverseGeocodeResponse {
    pub locality: Option<String>,
    pub city: Option<String>,
    pub principal_subdivision: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}
