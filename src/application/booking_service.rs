use crate::domain::booking::{Booking, BookingWithPlace, CreateBooking};
use crate::domain::place::Place;
use crate::domain::repository::{BookingRepository, PlaceRepository};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    places: Arc<dyn PlaceRepository>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>, places: Arc<dyn PlaceRepository>) -> Self {
        Self { bookings, places }
    }

    #[instrument(skip(self, req), fields(place = %req.place))]
    pub async fn create_booking(&self, user: &str, req: CreateBooking) -> Result<Booking> {
        let booking = req.into_booking(Uuid::new_v4().to_string(), user.to_string());
        self.bookings.insert_booking(booking.clone()).await?;
        info!(
            booking_id = %booking.id,
            user = %booking.user,
            place = %booking.place,
            check_in = %booking.check_in,
            check_out = %booking.check_out,
            guests = booking.num_of_guests,
            "Booking created"
        );
        Ok(booking)
    }

    /// Bookings made by `user`, each with its place reference expanded.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user: &str) -> Result<Vec<BookingWithPlace>> {
        let bookings = self.bookings.find_bookings_by_user(user).await?;

        let mut place_ids: Vec<String> = bookings.iter().map(|b| b.place.clone()).collect();
        place_ids.sort();
        place_ids.dedup();

        let places: HashMap<String, Place> = if place_ids.is_empty() {
            HashMap::new()
        } else {
            self.places
                .find_places_by_ids(&place_ids)
                .await?
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect()
        };
        debug!(bookings = bookings.len(), places = places.len(), "Expanding bookings");

        Ok(bookings
            .into_iter()
            .map(|booking| {
                let place = places.get(&booking.place).cloned();
                BookingWithPlace::expand(booking, place)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::place::NewPlace;
    use chrono::NaiveDate;

    fn request(place: &str) -> CreateBooking {
        CreateBooking {
            place: place.to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(),
            num_of_guests: 2,
            full_name: "Grace Hopper".to_string(),
            phone: "555-0100".to_string(),
            price: 240.0,
            user: None,
        }
    }

    #[tokio::test]
    async fn test_list_for_user_expands_places_and_filters_by_user() {
        let store = Arc::new(InMemoryStore::new());
        let service = BookingService::new(store.clone(), store.clone());
        let place = NewPlace {
            title: "Chalet".to_string(),
            ..Default::default()
        }
        .into_place("place-1".to_string(), "owner".to_string());
        store.insert_place(place.clone()).await.unwrap();

        service.create_booking("u1", request("place-1")).await.unwrap();
        service.create_booking("u2", request("place-1")).await.unwrap();
        service.create_booking("u1", request("deleted-place")).await.unwrap();

        let listed = service.list_for_user("u1").await.unwrap();

        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|b| b.user == "u1"));
        assert_eq!(listed[0].place, Some(place));
        assert_eq!(listed[1].place, None);
    }

    #[tokio::test]
    async fn test_list_for_user_without_bookings_is_empty() {
        let store = Arc::new(InMemoryStore::new());
        let service = BookingService::new(store.clone(), store);
        assert!(service.list_for_user("nobody").await.unwrap().is_empty());
    }
}
