//! Keyless reverse geocoding through BigDataCloud.

use wanderlist_core::ResolvedCity;

use crate::client::{ApiClient, Auth};
use crate::types::ReverseGeocodeResponse;

const REVERSE_PATH: &str = "data/reverse-geocode-client";

#[derive(Debug)]
pub struct ReverseGeocoder {
    api: ApiClient,
    language: String,
}

impl ReverseGeocoder {
    pub(crate) fn new(api: ApiClient, language: String) -> Self {
        Self { api, language }
    }

    /// Place name and country for the coordinates, or `None` when the
    /// provider returns no usable name or the call fails.
    pub async fn city_from_coordinates(&self, lat: f64, lng: f64) -> Option<ResolvedCity> {
        let latitude = lat.to_string();
        let longitude = lng.to_string();
        let url = self.api.endpoint(
            REVERSE_PATH,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("localityLanguage", self.language.as_str()),
            ],
        );
        match self
            .api
            .get_json::<ReverseGeocodeResponse>(&url, Auth::Anonymous)
            .await
        {
            Ok(response) => resolve_city(response),
            Err(e) => {
                tracing::error!(lat, lng, error = %e, "reverse geocoding failed");
                None
            }
        }
    }
}

/// Locality first, then city, then the administrative subdivision.
fn resolve_city(response: ReverseGeocodeResponse) -> Option<ResolvedCity> {
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let name = non_blank(response.locality)
        .or_else(|| non_blank(response.city))
        .or_else(|| non_blank(response.principal_subdivision))?;

    Some(ResolvedCity {
        name,
        country: response.country_name.unwrap_or_default(),
        country_code: non_blank(response.country_code),
    })
}
