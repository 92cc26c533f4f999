use crate::domain::booking::Booking;
use crate::domain::error::DomainError;
use crate::domain::place::Place;
use crate::domain::repository::{BookingRepository, PlaceRepository, UserRepository};
use crate::domain::user::User;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info, instrument};

const USERS: &str = "users";
const PLACES: &str = "places";
const BOOKINGS: &str = "bookings";
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed store. Each collection holds one document per record,
/// keyed by the string `_id` the services generate.
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    places: Collection<Place>,
    bookings: Collection<Booking>,
}

impl MongoStore {
    /// Connects, pings the server and makes sure the email index exists.
    /// Any failure here is fatal for startup.
    #[instrument(skip(url))]
    pub async fn connect(url: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .context("invalid MongoDB connection string")?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB is unreachable")?;
        info!(database = database, "Connected to MongoDB");

        let store = Self {
            users: db.collection(USERS),
            places: db.collection(PLACES),
            bookings: db.collection(BOOKINGS),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users
            .create_index(unique_email)
            .await
            .context("failed to create users.email index")?;

        let by_owner = IndexModel::builder().keys(doc! { "owner": 1 }).build();
        self.places.create_index(by_owner).await?;

        let by_user = IndexModel::builder().keys(doc! { "user": 1 }).build();
        self.bookings.create_index(by_user).await?;
        debug!("MongoDB indexes ensured");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserRepository for MongoStore {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save_user(&self, user: User) -> Result<()> {
        match self.users.insert_one(&user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(DomainError::Validation(
                "User with this email already exists".to_string(),
            )
            .into()),
            Err(e) => Err(e).context("failed to insert user"),
        }
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }
}

#[async_trait]
impl PlaceRepository for MongoStore {
    #[instrument(skip(self, place), fields(place_id = %place.id))]
    async fn insert_place(&self, place: Place) -> Result<()> {
        self.places
            .insert_one(&place)
            .await
            .context("failed to insert place")?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_place_by_id(&self, id: &str) -> Result<Option<Place>> {
        Ok(self.places.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_places_by_owner(&self, owner: &str) -> Result<Vec<Place>> {
        let cursor = self.places.find(doc! { "owner": owner }).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn find_places_by_ids(&self, ids: &[String]) -> Result<Vec<Place>> {
        let cursor = self
            .places
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn list_places(&self) -> Result<Vec<Place>> {
        let cursor = self.places.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, place), fields(place_id = %place.id))]
    async fn replace_place(&self, place: Place) -> Result<()> {
        let result = self
            .places
            .replace_one(doc! { "_id": place.id.as_str() }, &place)
            .await
            .context("failed to replace place")?;
        if result.matched_count == 0 {
            return Err(anyhow!("no place with id {}", place.id));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MongoStore {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn insert_booking(&self, booking: Booking) -> Result<()> {
        self.bookings
            .insert_one(&booking)
            .await
            .context("failed to insert booking")?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_bookings_by_user(&self, user: &str) -> Result<Vec<Booking>> {
        let cursor = self.bookings.find(doc! { "user": user }).await?;
        Ok(cursor.try_collect().await?)
    }
}
