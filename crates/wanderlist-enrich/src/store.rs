//! In-memory list of places, the current selection and the pending
//! map-click candidate.

use std::sync::Arc;

use tokio::sync::RwLock;
use wanderlist_core::{Place, TEMP_PLACE_ID};

use crate::orchestrator::EnrichmentPlan;

/// Store shared between the session and its enrichment tasks.
pub type SharedStore = Arc<RwLock<PlaceStore>>;

/// Progress of the map-click-to-add flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddState {
    Idle,
    /// A temp marker exists and awaits confirmation.
    TempSelected,
}

#[derive(Debug, Default)]
pub struct PlaceStore {
    places: Vec<Place>,
    selected_id: Option<String>,
    temp_marker: Option<Place>,
    loading: bool,
}

impl PlaceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Replaces the place list and ends loading. Selects the first place
    /// when nothing is selected yet.
    pub fn finish_load(&mut self, places: Vec<Place>) {
        self.places = places;
        self.loading = false;
        if self.selected_id.is_none() {
            self.selected_id = self.places.first().map(|p| p.id.clone());
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    #[must_use]
    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Selects `id` if it names a stored place or the current temp marker.
    /// Returns `false` and leaves the selection alone otherwise.
    pub fn select(&mut self, id: &str) -> bool {
        let known = if id == TEMP_PLACE_ID {
            self.temp_marker.is_some()
        } else {
            self.place(id).is_some()
        };
        if known {
            self.selected_id = Some(id.to_string());
        }
        known
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    /// The selected place; the temp marker when `"temp"` is selected.
    #[must_use]
    pub fn selected_place(&self) -> Option<&Place> {
        match self.selected_id.as_deref()? {
            TEMP_PLACE_ID => self.temp_marker.as_ref(),
            id => self.place(id),
        }
    }

    #[must_use]
    pub fn temp_marker(&self) -> Option<&Place> {
        self.temp_marker.as_ref()
    }

    #[must_use]
    pub fn add_state(&self) -> AddState {
        if self.temp_marker.is_some() {
            AddState::TempSelected
        } else {
            AddState::Idle
        }
    }

    /// Installs `marker` as the only temp marker and selects it.
    pub fn set_temp_marker(&mut self, marker: Place) {
        self.temp_marker = Some(marker);
        self.selected_id = Some(TEMP_PLACE_ID.to_string());
    }

    /// Appends the persisted version of the temp marker, drops the marker
    /// and selects the new place.
    pub fn confirm_temp(&mut self, saved: Place) {
        self.selected_id = Some(saved.id.clone());
        self.places.push(saved);
        self.temp_marker = None;
    }

    /// Removes a place, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: &str) -> Option<Place> {
        let index = self.places.iter().position(|p| p.id == id)?;
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
        Some(self.places.remove(index))
    }

    /// Merges an enrichment result into the place it was computed for.
    /// Returns `false` if that place is no longer in the store.
    pub fn apply(&mut self, plan: &EnrichmentPlan) -> bool {
        match self.places.iter_mut().find(|p| p.id == plan.place_id) {
            Some(place) => {
                plan.merge_into(place);
                true
            }
            None => false,
        }
    }
}
