//! External data gateway for wishlist enrichment.
//!
//! Wraps the Amadeus (token, city codes, flight offers, activities),
//! Unsplash (photos) and BigDataCloud (reverse geocoding) APIs. Every public
//! lookup is best-effort: failures are logged and come back as `None` or an
//! empty list, never as an error.

mod client;
mod retry;
mod types;

pub mod amadeus;
pub mod duration;
pub mod error;
pub mod gateway;
pub mod geocode;
pub mod token;
pub mod unsplash;

pub use amadeus::AmadeusClient;
pub use client::HttpSettings;
pub use duration::{format_duration, parse_iso_duration};
pub use error::GatewayError;
pub use gateway::{GatewaySettings, HttpGateway, TravelGateway};
pub use geocode::ReverseGeocoder;
pub use token::{ClientCredentials, TokenManager};
pub use unsplash::{UnsplashClient, PLACEHOLDER_IMAGE_URL};
