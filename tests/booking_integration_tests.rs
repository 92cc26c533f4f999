#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::BrokenWrites;
use staybook_api::domain::booking::{Booking, BookingWithPlace};
use staybook_api::domain::place::Place;
use staybook_api::infrastructure::config::ApiMode;

fn booking_body(place: &str, user: &str) -> serde_json::Value {
    serde_json::json!({
        "place": place,
        "user": user,
        "checkIn": "2026-12-20",
        "checkOut": "2026-12-27",
        "numOfGuests": 3,
        "fullName": "Katherine Johnson",
        "phone": "+1 555 0199",
        "price": 700.0
    })
}

#[actix_web::test]
async fn test_bookings_are_listed_per_user_with_expanded_place() {
    let (app, _uploads) = setup_app!();
    let (host_id, _) = signup!(app, "Host", "host@x.com");
    let (guest_id, _) = signup!(app, "Guest", "guest@x.com");
    let (other_id, _) = signup!(app, "Other", "other@x.com");

    let req = test::TestRequest::post()
        .uri("/places")
        .set_json(serde_json::json!({ "title": "Mountain hut", "price": 100.0, "user_id": host_id }))
        .to_request();
    let place: Place = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(booking_body(&place.id, &guest_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let booking: Booking = test::read_body_json(resp).await;
    assert_eq!(booking.user, guest_id);
    assert_eq!(booking.place, place.id);
    assert_eq!(booking.num_of_guests, 3);

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(booking_body(&place.id, &other_id))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/bookings?id={}", guest_id))
        .to_request();
    let listed: Vec<BookingWithPlace> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, booking.id);
    assert_eq!(listed[0].user, guest_id);
    assert_eq!(listed[0].place, Some(place));
}

#[actix_web::test]
async fn test_booking_for_unknown_place_lists_with_null_place() {
    let (app, _uploads) = setup_app!();
    let (guest_id, _) = signup!(app, "Guest", "guest@x.com");

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(booking_body("vanished", &guest_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/bookings?id={}", guest_id))
        .to_request();
    let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert!(listed[0]["place"].is_null());
}

#[actix_web::test]
async fn test_booking_with_bad_dates_is_validation_error() {
    let (app, _uploads) = setup_app!();

    let mut body = booking_body("place-1", "guest-1");
    body["checkIn"] = serde_json::json!("next tuesday");
    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_booking_store_failures_are_reported_in_band() {
    let (app, _uploads) = setup_app!(store = BrokenWrites::default(), mode = ApiMode::Compat);

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(booking_body("place-1", "guest-1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: String = test::read_body_json(resp).await;
    assert_eq!(body, "connection reset by peer");

    let req = test::TestRequest::get().uri("/bookings?id=guest-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: String = test::read_body_json(resp).await;
    assert_eq!(body, "connection reset by peer");
}

#[actix_web::test]
async fn test_hardened_booking_on_behalf_of_another_user_is_forbidden() {
    let (app, _uploads) = setup_app!(hardened);
    let (_, token) = signup!(app, "Guest", "guest@x.com");

    let req = test::TestRequest::post()
        .uri("/bookings")
        .insert_header(("Authorization", format!("Bearer {}", token.unwrap())))
        .set_json(booking_body("place-1", "impersonated"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/bookings?id=impersonated").to_request();
    let listed: Vec<BookingWithPlace> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());
}

#[actix_web::test]
async fn test_hardened_booking_list_failure_is_internal_error() {
    let (app, _uploads) = setup_app!(store = BrokenWrites::default(), mode = common::hardened());

    let req = test::TestRequest::get().uri("/bookings?id=guest-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "internal");
}
