use crate::application::auth_service::AuthService;
use crate::application::booking_service::BookingService;
use crate::application::place_service::PlaceService;
use crate::domain::booking::CreateBooking;
use crate::domain::error::DomainError;
use crate::domain::place::{NewPlace, PlaceUpdate};
use crate::domain::repository::{BookingRepository, PlaceRepository, UserRepository};
use crate::infrastructure::config::ApiMode;
use crate::infrastructure::media::MediaStore;
use crate::presentation::auth::Caller;
use crate::presentation::error::{ApiError, in_band};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct AppState {
    pub mode: ApiMode,
    pub auth_service: AuthService,
    pub place_service: PlaceService,
    pub booking_service: BookingService,
    pub media: MediaStore,
}

impl AppState {
    /// Wires every service to one store implementing all three collections.
    pub fn new<S>(store: Arc<S>, mode: ApiMode, media: MediaStore) -> Self
    where
        S: UserRepository + PlaceRepository + BookingRepository + 'static,
    {
        Self {
            auth_service: AuthService::new(store.clone(), mode.tokens().cloned()),
            place_service: PlaceService::new(store.clone()),
            booking_service: BookingService::new(store.clone(), store),
            media,
            mode,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

pub async fn smoke_test() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Test Successful")
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

// Places

#[instrument(skip(state, caller, req), fields(identity = %caller.label()))]
pub async fn create_place(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<NewPlace>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let owner = caller.acting_as(req.user_id.as_deref())?;
    match state.place_service.create_place(&owner, req).await {
        Ok(place) => Ok(HttpResponse::Ok().json(place)),
        Err(e) => {
            error!(error = %e, "Failed to create place");
            in_band(&state.mode, StatusCode::OK, e, |e| {
                format!("Failed to upload to DB with error: {:#}", e)
            })
        }
    }
}

#[instrument(skip(state))]
pub async fn user_places(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, ApiError> {
    let places = state.place_service.list_by_owner(&query.id).await?;
    info!(owner = %query.id, count = places.len(), "Listed places by owner");
    Ok(HttpResponse::Ok().json(places))
}

#[instrument(skip(state), fields(place_id = %*path))]
pub async fn get_place(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let place = state.place_service.get_place(&path).await?;
    Ok(HttpResponse::Ok().json(place))
}

/// A non-owner gets "Not authorized to make changes": a 200 string in
/// compat mode, a 403 envelope in hardened mode.
#[instrument(skip(state, caller, req), fields(identity = %caller.label(), place_id = %req.id))]
pub async fn update_place(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<PlaceUpdate>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let user_id = caller.acting_as(req.user_id.as_deref())?;
    match state.place_service.update_place(&user_id, req).await {
        Ok(_) => Ok(HttpResponse::Ok().json("ok")),
        Err(e) if matches!(e.downcast_ref::<DomainError>(), Some(DomainError::NotOwner)) => {
            in_band(&state.mode, StatusCode::OK, e, |e| e.to_string())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_places(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let places = state.place_service.list_all().await?;
    Ok(HttpResponse::Ok().json(places))
}

// Bookings

#[instrument(skip(state, caller, req), fields(identity = %caller.label(), place = %req.place))]
pub async fn create_booking(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<CreateBooking>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let guest = caller.acting_as(req.user.as_deref())?;
    match state.booking_service.create_booking(&guest, req).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(booking)),
        Err(e) => {
            error!(error = %e, "Failed to create booking");
            in_band(&state.mode, StatusCode::OK, e, |e| format!("{:#}", e))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_bookings(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, ApiError> {
    match state.booking_service.list_for_user(&query.id).await {
        Ok(bookings) => Ok(HttpResponse::Ok().json(bookings)),
        Err(e) => {
            error!(error = %e, user = %query.id, "Failed to list bookings");
            in_band(&state.mode, StatusCode::OK, e, |e| format!("{:#}", e))
        }
    }
}
