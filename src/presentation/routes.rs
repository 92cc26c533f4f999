use crate::presentation::auth::{login, logout, register};
use crate::presentation::error::ApiError;
use crate::presentation::handlers::{
    create_booking, create_place, get_place, health_check, list_bookings, list_places,
    smoke_test, update_place, user_places,
};
use crate::presentation::uploads::{upload, upload_by_link};
use actix_files::Files;
use actix_web::web;
use std::path::PathBuf;

pub const UPLOADS_MOUNT: &str = "/uploads";

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(format!("invalid JSON body: {}", err)).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("invalid query string: {}", err)).into()
    })
}

/// All API routes plus read-only serving of `upload_dir` under `/uploads`.
pub fn configure(upload_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config())
            .app_data(query_config())
            .route("/test", web::get().to(smoke_test))
            .route("/health", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/upload-by-link", web::post().to(upload_by_link))
            .route("/upload", web::post().to(upload))
            .route("/places", web::post().to(create_place))
            .route("/places", web::put().to(update_place))
            .route("/places", web::get().to(list_places))
            .route("/places/{id}", web::get().to(get_place))
            .route("/user_places", web::get().to(user_places))
            .route("/bookings", web::post().to(create_booking))
            .route("/bookings", web::get().to(list_bookings))
            .service(Files::new(UPLOADS_MOUNT, upload_dir));
    }
}
