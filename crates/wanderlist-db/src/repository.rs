use sqlx::PgPool;
use uuid::Uuid;
use wanderlist_core::{NewPlace, Place, PlaceRepository, RepositoryError};

use crate::voyages::{delete_voyage, insert_voyage, list_voyages};
use crate::DbError;

/// [`PlaceRepository`] backed by the `voyages` table.
#[derive(Debug, Clone)]
pub struct PgPlaceRepository {
    pool: PgPool,
}

impl PgPlaceRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(error: DbError) -> RepositoryError {
    tracing::error!(error = %error, "voyages query failed");
    RepositoryError::Backend(error.to_string())
}

impl PlaceRepository for PgPlaceRepository {
    async fn list(&self) -> Result<Vec<Place>, RepositoryError> {
        let rows = list_voyages(&self.pool).await.map_err(backend)?;
        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError> {
        let row = insert_voyage(&self.pool, &place).await.map_err(backend)?;
        tracing::debug!(id = %row.id, name = %row.name, "voyage inserted");
        Ok(Place::from(row))
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        // Ids that are not UUIDs cannot exist in the table.
        let uuid = Uuid::parse_str(id).map_err(|_| RepositoryError::NotFound(id.to_string()))?;
        match delete_voyage(&self.pool, uuid).await {
            Ok(()) => Ok(()),
            Err(DbError::NotFound) => Err(RepositoryError::NotFound(id.to_string())),
            Err(e) => Err(backend(e)),
        }
    }
}
