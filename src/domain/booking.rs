use crate::domain::place::Place;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub place: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_of_guests: u32,
    pub full_name: String,
    pub phone: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub place: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_of_guests: u32,
    pub full_name: String,
    pub phone: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CreateBooking {
    pub fn into_booking(self, id: String, user: String) -> Booking {
        Booking {
            id,
            user,
            place: self.place,
            check_in: self.check_in,
            check_out: self.check_out,
            num_of_guests: self.num_of_guests,
            full_name: self.full_name,
            phone: self.phone,
            price: self.price,
        }
    }
}

/// A booking with its `place` reference replaced by the stored place.
/// `place` is `None` when the referenced place no longer resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithPlace {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub place: Option<Place>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_of_guests: u32,
    pub full_name: String,
    pub phone: String,
    pub price: f64,
}

impl BookingWithPlace {
    pub fn expand(booking: Booking, place: Option<Place>) -> Self {
        Self {
            id: booking.id,
            user: booking.user,
            place,
            check_in: booking.check_in,
            check_out: booking.check_out,
            num_of_guests: booking.num_of_guests,
            full_name: booking.full_name,
            phone: booking.phone,
            price: booking.price,
        }
    }
}
