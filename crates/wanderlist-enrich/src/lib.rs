//! Enrichment and session state for the travel wishlist.
//!
//! [`WishlistSession`] is what a front end drives: it owns the
//! [`PlaceStore`], reacts to user actions and keeps one cancellable
//! enrichment task following the selection. The [`Enricher`] does the
//! per-place work against a [`TravelGateway`](wanderlist_gateway::TravelGateway),
//! memoizing through an [`EnrichmentCache`].

pub mod cache;
pub mod memory;
pub mod orchestrator;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use cache::{flight_key, lock_key, poi_key, EnrichmentCache, InFlightGuard};
pub use memory::InMemoryPlaceRepository;
pub use orchestrator::{EnrichOutcome, Enricher, EnrichmentPlan, SkipReason, MAX_FLIGHT_ATTEMPTS};
pub use session::{DeleteOutcome, SessionError, SessionView, WishlistSession};
pub use store::{AddState, PlaceStore, SharedStore};
