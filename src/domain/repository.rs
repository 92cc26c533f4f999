use crate::domain::booking::Booking;
use crate::domain::place::Place;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn insert_place(&self, place: Place) -> Result<()>;
    async fn find_place_by_id(&self, id: &str) -> Result<Option<Place>>;
    async fn find_places_by_owner(&self, owner: &str) -> Result<Vec<Place>>;
    async fn find_places_by_ids(&self, ids: &[String]) -> Result<Vec<Place>>;
    async fn list_places(&self) -> Result<Vec<Place>>;
    /// Replaces the stored place with the same id.
    async fn replace_place(&self, place: Place) -> Result<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert_booking(&self, booking: Booking) -> Result<()>;
    async fn find_bookings_by_user(&self, user: &str) -> Result<Vec<Booking>>;
}
