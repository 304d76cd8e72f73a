//! Process-local [`PlaceRepository`], used when no database is configured.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;
use wanderlist_core::{Coordinates, NewPlace, Place, PlaceRepository, RepositoryError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlaceRepository {
    places: Arc<Mutex<Vec<Place>>>,
}

impl InMemoryPlaceRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `places`, listed in the given order.
    #[must_use]
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places: Arc::new(Mutex::new(places)),
        }
    }

    /// A handful of well-known destinations for trying things out.
    #[must_use]
    pub fn demo() -> Self {
        let seed = [
            ("Lisbon", "Portugal", "LIS", 38.7223, -9.1393, "Hills, trams and pastéis de nata."),
            ("Reykjavik", "Iceland", "REK", 64.1466, -21.9426, "Gateway to glaciers and northern lights."),
            ("Marrakech", "Morocco", "RAK", 31.6295, -7.9811, "Souks, riads and the Atlas on the horizon."),
            ("New York", "United States", "NYC", 40.7128, -74.0060, "The city that never sleeps."),
        ];
        let places = seed
            .into_iter()
            .map(|(name, country, code, lat, lng, description)| {
                Place::from_stored(
                    Uuid::new_v4().to_string(),
                    name,
                    country,
                    code,
                    Coordinates { lat, lng },
                    description,
                    None,
                )
            })
            .collect();
        Self::with_places(places)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Place>> {
        self.places.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaceRepository for InMemoryPlaceRepository {
    async fn list(&self) -> Result<Vec<Place>, RepositoryError> {
        Ok(self.lock().clone())
    }

    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError> {
        let saved = Place::from_stored(
            Uuid::new_v4().to_string(),
            place.name,
            place.country,
            place.city_code,
            Coordinates {
                lat: place.lat,
                lng: place.lng,
            },
            place.short_description,
            place.image_url,
        );
        self.lock().push(saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut places = self.lock();
        let before = places.len();
        places.retain(|p| p.id != id);
        if places.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_place(name: &str) -> NewPlace {
        NewPlace {
            name: name.to_string(),
            country: "Portugal".to_string(),
            city_code: "POR".to_string(),
            lat: 41.15,
            lng: -8.61,
            short_description: "New destination found...".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_lists_in_insertion_order() {
        let repo = InMemoryPlaceRepository::new();
        let porto = repo.create(new_place("Porto")).await.unwrap();
        let braga = repo.create(new_place("Braga")).await.unwrap();

        assert!(Uuid::parse_str(&porto.id).is_ok());
        assert_ne!(porto.id, braga.id);
        assert!(!porto.is_dynamic_image);

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Porto", "Braga"]);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let repo = InMemoryPlaceRepository::new();
        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn delete_removes_place() {
        let repo = InMemoryPlaceRepository::demo();
        let first = repo.list().await.unwrap().remove(0);
        repo.delete(&first.id).await.unwrap();
        assert!(repo.list().await.unwrap().iter().all(|p| p.id != first.id));
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryPlaceRepository::new();
        let other = repo.clone();
        repo.create(new_place("Porto")).await.unwrap();
        assert_eq!(other.list().await.unwrap().len(), 1);
    }
}
