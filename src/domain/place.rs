use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: String,
    pub title: String,
    pub address: String,
    pub photos: Vec<String>,
    pub description: String,
    pub perks: Vec<String>,
    pub extra_info: String,
    pub check_in: String,
    pub check_out: String,
    pub max_guests: u32,
    pub price: f64,
}

/// Body of `POST /places`. The client calls the photo list `addedPhotos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPlace {
    pub title: String,
    pub address: String,
    pub added_photos: Vec<String>,
    pub description: String,
    pub perks: Vec<String>,
    pub extra_info: String,
    pub check_in: String,
    pub check_out: String,
    pub max_guests: u32,
    pub price: f64,
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NewPlace {
    pub fn into_place(self, id: String, owner: String) -> Place {
        Place {
            id,
            owner,
            title: self.title,
            address: self.address,
            photos: self.added_photos,
            description: self.description,
            perks: self.perks,
            extra_info: self.extra_info,
            check_in: self.check_in,
            check_out: self.check_out,
            max_guests: self.max_guests,
            price: self.price,
        }
    }
}

/// Body of `PUT /places`. Absent fields are left as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl PlaceUpdate {
    /// Overwrites only the fields present in the update.
    pub fn apply_to(self, place: &mut Place) {
        if let Some(title) = self.title {
            place.title = title;
        }
        if let Some(address) = self.address {
            place.address = address;
        }
        if let Some(photos) = self.added_photos {
            place.photos = photos;
        }
        if let Some(description) = self.description {
            place.description = description;
        }
        if let Some(perks) = self.perks {
            place.perks = perks;
        }
        if let Some(extra_info) = self.extra_info {
            place.extra_info = extra_info;
        }
        if let Some(check_in) = self.check_in {
            place.check_in = check_in;
        }
        if let Some(check_out) = self.check_out {
            place.check_out = check_out;
        }
        if let Some(max_guests) = self.max_guests {
            place.max_guests = max_guests;
        }
        if let Some(price) = self.price {
            place.price = price;
        }
    }
}
