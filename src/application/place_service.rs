use crate::domain::error::DomainError;
use crate::domain::place::{NewPlace, Place, PlaceUpdate};
use crate::domain::repository::PlaceRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct PlaceService {
    repository: Arc<dyn PlaceRepository>,
}

impl PlaceService {
    pub fn new(repository: Arc<dyn PlaceRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req), fields(title = %req.title))]
    pub async fn create_place(&self, owner: &str, req: NewPlace) -> Result<Place> {
        let place = req.into_place(Uuid::new_v4().to_string(), owner.to_string());
        self.repository.insert_place(place.clone()).await?;
        info!(place_id = %place.id, owner = %place.owner, "Place created");
        Ok(place)
    }

    pub async fn list_by_owner(&self, owner: &str) -> Result<Vec<Place>> {
        self.repository.find_places_by_owner(owner).await
    }

    pub async fn get_place(&self, id: &str) -> Result<Option<Place>> {
        self.repository.find_place_by_id(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Place>> {
        self.repository.list_places().await
    }

    /// Applies `update` only if `caller` owns the stored place.
    ///
    /// Read-check-write without a version guard: concurrent updates to one
    /// place are last-writer-wins.
    #[instrument(skip(self, update), fields(place_id = %update.id))]
    pub async fn update_place(&self, caller: &str, update: PlaceUpdate) -> Result<Place> {
        let mut place = self
            .repository
            .find_place_by_id(&update.id)
            .await?
            .ok_or_else(|| DomainError::PlaceNotFound(update.id.clone()))?;

        if place.owner != caller {
            warn!(owner = %place.owner, caller = caller, "Rejected update from non-owner");
            return Err(DomainError::NotOwner.into());
        }

        update.apply_to(&mut place);
        self.repository.replace_place(place.clone()).await?;
        info!(place_id = %place.id, "Place updated");
        Ok(place)
    }
}
