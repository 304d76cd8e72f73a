//! Entry point for a display front end: the user actions, the state to
//! render and the enrichment task that follows the selection.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wanderlist_core::{
    Coordinates, NewPlace, Place, PlaceRepository, RepositoryError, ViewMode, TEMP_PLACE_ID,
};
use wanderlist_gateway::TravelGateway;

use crate::cache::EnrichmentCache;
use crate::orchestrator::{EnrichOutcome, Enricher};
use crate::store::{AddState, PlaceStore, SharedStore};

/// Failures the user has to be told about. Enrichment never produces one.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load places: {0}")]
    Load(#[source] RepositoryError),

    #[error("failed to save place: {0}")]
    Save(#[source] RepositoryError),

    #[error("failed to delete place: {0}")]
    Delete(#[source] RepositoryError),

    #[error("no destination awaiting confirmation")]
    NoTempMarker,

    #[error("unknown place: {0}")]
    UnknownPlace(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation step said no; persistence was not called.
    Declined,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub places: Vec<Place>,
    pub selected_id: Option<String>,
    pub selected: Option<Place>,
    pub departure: String,
    pub view_mode: ViewMode,
    pub add_state: AddState,
    pub loading: bool,
}

#[derive(Debug)]
struct EnrichmentTask {
    cancel: CancellationToken,
    handle: JoinHandle<EnrichOutcome>,
}

/// One user's wishlist session.
///
/// Every change of selection or departure, and every completed load,
/// cancels the running enrichment task and starts one for the new
/// selection.
#[derive(Debug)]
pub struct WishlistSession<G, R> {
    enricher: Enricher<G>,
    repository: R,
    store: SharedStore,
    departure: String,
    view_mode: ViewMode,
    current: Option<EnrichmentTask>,
}

impl<G, R> WishlistSession<G, R>
where
    G: TravelGateway + 'static,
    R: PlaceRepository,
{
    #[must_use]
    pub fn new(gateway: Arc<G>, repository: R, departure: impl Into<String>) -> Self {
        Self::with_cache(gateway, repository, departure, EnrichmentCache::new())
    }

    #[must_use]
    pub fn with_cache(
        gateway: Arc<G>,
        repository: R,
        departure: impl Into<String>,
        cache: EnrichmentCache,
    ) -> Self {
        Self {
            enricher: Enricher::new(gateway, cache),
            repository,
            store: PlaceStore::new().shared(),
            departure: normalize_departure(&departure.into()),
            view_mode: ViewMode::default(),
            current: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    #[must_use]
    pub fn cache(&self) -> &EnrichmentCache {
        self.enricher.cache()
    }

    #[must_use]
    pub fn departure(&self) -> &str {
        &self.departure
    }

    /// Loads the place list from the repository and starts enriching the
    /// selection. Returns the number of places loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] if the repository fails; the store is
    /// left empty and usable.
    pub async fn load(&mut self) -> Result<usize, SessionError> {
        {
            let store = Arc::clone(&self.store);
            let mut store = store.write().await;
            supersede(&mut self.current);
            store.begin_load();
        }

        let result = self.repository.list().await;
        let loaded = {
            let mut store = self.store.write().await;
            match result {
                Ok(places) => {
                    let count = places.len();
                    store.finish_load(places);
                    Ok(count)
                }
                Err(e) => {
                    store.finish_load(Vec::new());
                    Err(SessionError::Load(e))
                }
            }
        };

        match &loaded {
            Ok(count) => tracing::info!(count, "places loaded"),
            Err(e) => tracing::error!(error = %e, "place list unavailable"),
        }
        self.spawn_enrichment().await;
        loaded
    }

    /// Selects a stored place (or `"temp"`) and enriches it. Selecting the
    /// current selection again leaves its running enrichment alone.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownPlace`] if `id` names nothing selectable.
    pub async fn on_select(&mut self, id: &str) -> Result<(), SessionError> {
        {
            let store = Arc::clone(&self.store);
            let mut store = store.write().await;
            if store.selected_id() == Some(id) {
                return Ok(());
            }
            if !store.select(id) {
                return Err(SessionError::UnknownPlace(id.to_string()));
            }
            supersede(&mut self.current);
        }
        self.spawn_enrichment().await;
        Ok(())
    }

    /// Reverse-geocodes a map click into a temp marker and selects it.
    ///
    /// Returns the new marker, or `None` when nothing is named at that
    /// spot (the store is left untouched). Never fails.
    pub async fn on_map_click(&mut self, at: Coordinates) -> Option<Place> {
        let Some(city) = self.enricher.gateway().city_from_coordinates(at).await else {
            tracing::info!(lat = at.lat, lng = at.lng, "no place found at map click");
            return None;
        };

        let marker = Place::temp_marker(&city, at);
        {
            let store = Arc::clone(&self.store);
            let mut store = store.write().await;
            store.set_temp_marker(marker.clone());
            supersede(&mut self.current);
        }
        tracing::info!(name = %marker.name, city_code = %marker.city_code, "new destination candidate");
        Some(marker)
    }

    /// Persists the temp marker and selects the saved place.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoTempMarker`] if there is nothing to confirm.
    /// - [`SessionError::Save`] if persistence fails; the marker stays.
    pub async fn on_confirm_add(&mut self) -> Result<Place, SessionError> {
        let marker = self
            .store
            .read()
            .await
            .temp_marker()
            .cloned()
            .ok_or(SessionError::NoTempMarker)?;

        let saved = match self.repository.create(NewPlace::from(&marker)).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(name = %marker.name, error = %e, "failed to save place");
                return Err(SessionError::Save(e));
            }
        };

        {
            let store = Arc::clone(&self.store);
            let mut store = store.write().await;
            store.confirm_temp(saved.clone());
            supersede(&mut self.current);
        }
        tracing::info!(place_id = %saved.id, name = %saved.name, "place added");
        self.spawn_enrichment().await;
        Ok(saved)
    }

    /// Deletes a place after `confirm` approves it.
    ///
    /// `confirm` sees the place about to go and runs before any persistence
    /// call; returning `false` aborts with [`DeleteOutcome::Declined`].
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownPlace`] if `id` is not in the store.
    /// - [`SessionError::Delete`] if persistence fails; the place stays.
    pub async fn on_delete<F>(&mut self, id: &str, confirm: F) -> Result<DeleteOutcome, SessionError>
    where
        F: FnOnce(&Place) -> bool,
    {
        let place = self
            .store
            .read()
            .await
            .place(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownPlace(id.to_string()))?;

        if !confirm(&place) {
            tracing::debug!(place_id = id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(e) = self.repository.delete(id).await {
            tracing::error!(place_id = id, error = %e, "failed to delete place");
            return Err(SessionError::Delete(e));
        }

        let store = Arc::clone(&self.store);
        let mut store = store.write().await;
        let was_selected = store.selected_id() == Some(id);
        store.remove(id);
        if was_selected {
            supersede(&mut self.current);
        }
        tracing::info!(place_id = id, name = %place.name, "place deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Switches the departure code (upper-cased) and re-enriches the selection.
    pub async fn on_departure_change(&mut self, departure: &str) {
        let departure = normalize_departure(departure);
        if departure == self.departure {
            return;
        }
        {
            let store = Arc::clone(&self.store);
            let _store = store.write().await;
            supersede(&mut self.current);
            self.departure = departure;
        }
        tracing::info!(departure = %self.departure, "departure changed");
        self.spawn_enrichment().await;
    }

    pub fn on_view_mode_change(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub async fn view(&self) -> SessionView {
        let store = self.store.read().await;
        SessionView {
            places: store.places().to_vec(),
            selected_id: store.selected_id().map(str::to_owned),
            selected: store.selected_place().cloned(),
            departure: self.departure.clone(),
            view_mode: self.view_mode,
            add_state: store.add_state(),
            loading: store.is_loading(),
        }
    }

    /// Waits for the current enrichment task, if any, and returns its outcome.
    pub async fn wait_for_enrichment(&mut self) -> Option<EnrichOutcome> {
        let task = self.current.take()?;
        match task.handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, "enrichment task failed");
                None
            }
        }
    }

    /// Starts enrichment for the current selection. Callers supersede the
    /// previous task first.
    async fn spawn_enrichment(&mut self) {
        let Some(place_id) = self.store.read().await.selected_id().map(str::to_owned) else {
            return;
        };
        if place_id == TEMP_PLACE_ID {
            return;
        }

        let cancel = CancellationToken::new();
        let enricher = self.enricher.clone();
        let store = Arc::clone(&self.store);
        let departure = self.departure.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            enricher.run(&store, &place_id, &departure, &token).await
        });
        self.current = Some(EnrichmentTask { cancel, handle });
    }
}

/// Cancels the running task. The task is detached, not aborted, so its
/// cache writes still land.
fn supersede(current: &mut Option<EnrichmentTask>) {
    if let Some(task) = current.take() {
        task.cancel.cancel();
    }
}

fn normalize_departure(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
