use crate::domain::booking::Booking;
use crate::domain::error::DomainError;
use crate::domain::place::Place;
use crate::domain::repository::{BookingRepository, PlaceRepository, UserRepository};
use crate::domain::user::User;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Process-local document store backing all three collections.
///
/// Places and bookings keep insertion order so listings come back in the
/// order they were created, like a collection scan would.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    places: Arc<RwLock<Vec<Place>>>,
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        // Same guarantee as the unique email index in MongoDB.
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Validation(
                "User with this email already exists".to_string(),
            )
            .into());
        }
        trace!("Inserting user into memory storage");
        users.insert(user.id.clone(), user);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        let user = users.values().find(|u| u.email == email).cloned();
        trace!(found = user.is_some(), "Looked up user by email");
        Ok(user)
    }
}

#[async_trait]
impl PlaceRepository for InMemoryStore {
    #[instrument(skip(self, place), fields(place_id = %place.id, owner = %place.owner))]
    async fn insert_place(&self, place: Place) -> Result<()> {
        let mut places = self.places.write().await;
        if places.iter().any(|p| p.id == place.id) {
            return Err(anyhow!("duplicate place id {}", place.id));
        }
        places.push(place);
        debug!(count = places.len(), "Place stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_place_by_id(&self, id: &str) -> Result<Option<Place>> {
        let places = self.places.read().await;
        Ok(places.iter().find(|p| p.id == id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_places_by_owner(&self, owner: &str) -> Result<Vec<Place>> {
        let places = self.places.read().await;
        Ok(places.iter().filter(|p| p.owner == owner).cloned().collect())
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn find_places_by_ids(&self, ids: &[String]) -> Result<Vec<Place>> {
        let places = self.places.read().await;
        Ok(places
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_places(&self) -> Result<Vec<Place>> {
        Ok(self.places.read().await.clone())
    }

    #[instrument(skip(self, place), fields(place_id = %place.id))]
    async fn replace_place(&self, place: Place) -> Result<()> {
        let mut places = self.places.write().await;
        let slot = places
            .iter_mut()
            .find(|p| p.id == place.id)
            .ok_or_else(|| anyhow!("no place with id {}", place.id))?;
        *slot = place;
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, user = %booking.user))]
    async fn insert_booking(&self, booking: Booking) -> Result<()> {
        self.bookings.write().await.push(booking);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_bookings_by_user(&self, user: &str) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().filter(|b| b.user == user).cloned().collect())
    }
}
