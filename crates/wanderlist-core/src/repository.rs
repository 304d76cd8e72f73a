//! Persistence port for wishlist places.
//!
//! Adapters own the mapping between their storage schema and [`Place`];
//! callers only ever see the in-memory model.

use std::future::Future;

use thiserror::Error;

use crate::place::{NewPlace, Place};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The storage backend rejected or failed the operation.
    #[error("persistence backend error: {0}")]
    Backend(String),

    #[error("place not found: {0}")]
    NotFound(String),
}

/// List, create and delete persisted places.
pub trait PlaceRepository: Send + Sync {
    /// All persisted places, oldest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Place>, RepositoryError>> + Send;

    /// Persists `place` and returns it with its storage-assigned id.
    fn create(
        &self,
        place: NewPlace,
    ) -> impl Future<Output = Result<Place, RepositoryError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
