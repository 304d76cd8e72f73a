//! Database operations for the `voyages` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wanderlist_core::{Coordinates, NewPlace, Place};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `voyages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VoyageRow {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub city_code: String,
    pub lat: f64,
    pub lng: f64,
    pub short_description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VoyageRow> for Place {
    fn from(row: VoyageRow) -> Self {
        Place::from_stored(
            row.id.to_string(),
            row.name,
            row.country,
            row.city_code,
            Coordinates {
                lat: row.lat,
                lng: row.lng,
            },
            row.short_description,
            row.image_url.filter(|url| !url.trim().is_empty()),
        )
    }
}

const COLUMNS: &str =
    "id, name, country, city_code, lat, lng, short_description, image_url, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every voyage, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_voyages(pool: &PgPool) -> Result<Vec<VoyageRow>, DbError> {
    let rows = sqlx::query_as::<_, VoyageRow>(&format!(
        "SELECT {COLUMNS} FROM voyages ORDER BY created_at ASC, id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a voyage and returns the stored row with its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_voyage(pool: &PgPool, place: &NewPlace) -> Result<VoyageRow, DbError> {
    let row = sqlx::query_as::<_, VoyageRow>(&format!(
        "INSERT INTO voyages (name, country, city_code, lat, lng, short_description, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {COLUMNS}"
    ))
    .bind(&place.name)
    .bind(&place.country)
    .bind(&place.city_code)
    .bind(place.lat)
    .bind(place.lng)
    .bind(&place.short_description)
    .bind(place.image_url.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Deletes a voyage by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn delete_voyage(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM voyages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
