#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use staybook_api::data::memory::InMemoryStore;
use staybook_api::domain::booking::Booking;
use staybook_api::domain::error::DomainError;
use staybook_api::domain::place::Place;
use staybook_api::domain::repository::{BookingRepository, PlaceRepository, UserRepository};
use staybook_api::domain::user::User;
use staybook_api::infrastructure::config::ApiMode;
use staybook_api::infrastructure::media::ImageFetcher;
use staybook_api::infrastructure::security::TokenSettings;

pub const JWT_SECRET: &str = "test-secret-key-for-integration-tests";
pub const IMAGE_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";

/// Serves canned bytes; any URL mentioning "unreachable" fails like a dead host.
pub struct StubFetcher;

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        if url.contains("unreachable") {
            return Err(DomainError::Download(format!("{} did not respond", url)));
        }
        Ok(IMAGE_BYTES.to_vec())
    }
}

pub fn hardened() -> ApiMode {
    ApiMode::Hardened(TokenSettings {
        secret: JWT_SECRET.to_string(),
        ttl_secs: 3600,
    })
}

/// Users and reads work; every place and booking write, and the booking
/// listing, fail the way a dropped database connection would.
#[derive(Default)]
pub struct BrokenWrites {
    inner: InMemoryStore,
}

#[async_trait]
impl UserRepository for BrokenWrites {
    async fn save_user(&self, user: User) -> Result<()> {
        self.inner.save_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.find_user_by_email(email).await
    }
}

#[async_trait]
impl PlaceRepository for BrokenWrites {
    async fn insert_place(&self, _place: Place) -> Result<()> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn find_place_by_id(&self, id: &str) -> Result<Option<Place>> {
        self.inner.find_place_by_id(id).await
    }

    async fn find_places_by_owner(&self, owner: &str) -> Result<Vec<Place>> {
        self.inner.find_places_by_owner(owner).await
    }

    async fn find_places_by_ids(&self, ids: &[String]) -> Result<Vec<Place>> {
        self.inner.find_places_by_ids(ids).await
    }

    async fn list_places(&self) -> Result<Vec<Place>> {
        self.inner.list_places().await
    }

    async fn replace_place(&self, _place: Place) -> Result<()> {
        Err(anyhow!("connection reset by peer"))
    }
}

#[async_trait]
impl BookingRepository for BrokenWrites {
    async fn insert_booking(&self, _booking: Booking) -> Result<()> {
        Err(anyhow!("connection reset by peer"))
    }

    async fn find_bookings_by_user(&self, _user: &str) -> Result<Vec<Booking>> {
        Err(anyhow!("connection reset by peer"))
    }
}

pub const BOUNDARY: &str = "----staybook-test-boundary";

/// Builds a multipart/form-data body from (field, filename, content) triples.
pub fn multipart_body(parts: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Spins up the full route table over an in-memory store, speaking the
/// compat contract unless `hardened` is given or a store and mode are named.
/// Evaluates to `(app, upload_dir)`; keep `upload_dir` alive for the test.
macro_rules! setup_app {
    () => {
        setup_app!(
            store = staybook_api::data::memory::InMemoryStore::new(),
            mode = staybook_api::infrastructure::config::ApiMode::Compat
        )
    };
    (hardened) => {
        setup_app!(
            store = staybook_api::data::memory::InMemoryStore::new(),
            mode = crate::common::hardened()
        )
    };
    (store = $store:expr, mode = $mode:expr) => {{
        use actix_web::{App, test, web};
        use staybook_api::infrastructure::media::MediaStore;
        use staybook_api::presentation::handlers::AppState;
        use staybook_api::presentation::middleware::RequestTrace;
        use staybook_api::presentation::routes::configure;
        use std::sync::Arc;

        let upload_dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(upload_dir.path(), Arc::new(crate::common::StubFetcher));
        media.ensure_dir().await.unwrap();
        let state = web::Data::new(AppState::new(Arc::new($store), $mode, media));

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(RequestTrace)
                .configure(configure(upload_dir.path().to_path_buf())),
        )
        .await;

        (app, upload_dir)
    }};
}

/// Registers a user and logs in. Evaluates to `(user_id, token)`; the token
/// is only issued by a hardened app.
macro_rules! signup {
    ($app:expr, $name:expr, $email:expr) => {{
        use actix_web::test;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "name": $name,
                "email": $email,
                "password": "secret-pass"
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({ "email": $email, "password": "secret-pass" }))
            .to_request();
        let login: serde_json::Value = test::call_and_read_body_json(&$app, req).await;
        (
            login["id"].as_str().unwrap().to_string(),
            login["token"].as_str().map(str::to_string),
        )
    }};
}
