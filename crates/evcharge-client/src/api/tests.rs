//! Tests for the API client against a local fake backend.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use evcharge_core::models::{BookingItem, BookingStatus, SlotStatus};

use super::client::{ApiClient, CLIENT_TYPE_HEADER};
use super::response::{MALFORMED_RESPONSE_MESSAGE, NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE};
use crate::session::SessionStore;
use crate::test_support::{api_config, client_for, dead_backend, spawn_backend};

fn echo_headers(headers: &HeaderMap) -> Value {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    json!({
        "authorization": get("authorization"),
        "clientType": get(CLIENT_TYPE_HEADER),
    })
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn empty_base_url_is_rejected() {
    assert!(ApiClient::new(&api_config(""), SessionStore::in_memory()).is_err());
    assert!(ApiClient::new(&api_config("ftp://x"), SessionStore::in_memory()).is_err());
}

#[test]
fn url_joins_without_double_slash() {
    let client = client_for("https://ev.example/api/");
    assert_eq!(client.url("/bookings/1"), "https://ev.example/api/bookings/1");
    assert_eq!(client.url("bookings/1"), "https://ev.example/api/bookings/1");
}

#[test]
fn path_segments_are_percent_encoded() {
    assert_eq!(ApiClient::encode_segment("b-1_x.y~"), "b-1_x.y~");
    assert_eq!(ApiClient::encode_segment("a/b c"), "a%2Fb%20c");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn login_success_stores_exact_token() {
    let base = spawn_backend(Router::new().route(
        "/auth/login",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["email"], "a@b.com");
            assert_eq!(body["password"], "pw");
            Json(json!({"token": "t1", "message": "Welcome"}))
        }),
    ))
    .await;
    let client = client_for(&base);

    let resp = client.login("a@b.com", "pw").await;
    assert!(resp.success);
    assert_eq!(resp.message, "Welcome");
    assert!(client.session().is_logged_in().await);
    assert_eq!(client.session().token().await.as_deref(), Some("t1"));
}

#[tokio::test]
async fn login_rejection_keeps_server_message_and_no_token() {
    let base = spawn_backend(Router::new().route(
        "/auth/login",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Invalid email or password"})),
            )
        }),
    ))
    .await;
    let client = client_for(&base);

    let resp = client.login("a@b.com", "wrong").await;
    assert!(!resp.success);
    assert_eq!(resp.message, "Invalid email or password");
    assert_eq!(resp.status, Some(401));
    assert!(!client.session().is_logged_in().await);
}

#[tokio::test]
async fn login_without_token_is_malformed() {
    let base = spawn_backend(Router::new().route(
        "/auth/login",
        post(|| async { Json(json!({"message": "ok"})) }),
    ))
    .await;
    let client = client_for(&base);

    let resp = client.login("a@b.com", "pw").await;
    assert!(!resp.success);
    assert_eq!(resp.message, MALFORMED_RESPONSE_MESSAGE);
    assert!(!client.session().is_logged_in().await);
}

// =============================================================================
// Headers and payloads
// =============================================================================

#[tokio::test]
async fn bearer_header_follows_session() {
    let base = spawn_backend(Router::new().route(
        "/auth/profile",
        get(|headers: HeaderMap| async move { Json(echo_headers(&headers)) }),
    ))
    .await;
    let client = client_for(&base);

    let anonymous: Value = client.profile().await.decode().unwrap();
    assert!(anonymous["authorization"].is_null());
    assert_eq!(anonymous["clientType"], "Mobile");

    client.session().set_token("t-42").await.unwrap();
    let authed: Value = client.profile().await.decode().unwrap();
    assert_eq!(authed["authorization"], "Bearer t-42");
}

#[tokio::test]
async fn ok_body_is_returned_verbatim() {
    const BODY: &str = r#"{"id":"b-7","stationId":"st-1","slotId":"sl-1","ownerId":"o-1","status":"Approved","startTime":"2026-03-01T10:00:00Z","endTime":"2026-03-01T11:00:00Z"}"#;
    let base = spawn_backend(Router::new().route(
        "/bookings/{id}",
        get(|Path(id): Path<String>| async move {
            assert_eq!(id, "b-7");
            ([("content-type", "application/json")], BODY)
        }),
    ))
    .await;
    let client = client_for(&base);

    let resp = client.booking("b-7").await;
    assert!(resp.success);
    assert_eq!(resp.data.as_deref(), Some(BODY));

    let booking: BookingItem = resp.decode().unwrap();
    assert_eq!(booking.status, BookingStatus::Approved);
}

#[tokio::test]
async fn non_json_error_body_gets_generic_message() {
    let base = spawn_backend(Router::new().route(
        "/bookings/{id}/finalize",
        patch(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;
    let client = client_for(&base);

    let resp = client.finalize_booking("b-1").await;
    assert!(!resp.success);
    assert_eq!(resp.message, "Request failed (HTTP 500)");
}

#[tokio::test]
async fn domain_rejection_passes_message_through() {
    let base = spawn_backend(Router::new().route(
        "/bookings",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({"message": "Slot is already booked for that window"})),
            )
        }),
    ))
    .await;
    let client = client_for(&base);

    let resp = client
        .create_booking(&evcharge_core::models::BookingRequest {
            station_id: "st-1".into(),
            slot_id: "sl-1".into(),
            owner_id: "o-1".into(),
            start_time: "2026-03-01T10:00:00Z".into(),
            end_time: "2026-03-01T11:00:00Z".into(),
        })
        .await;
    assert_eq!(resp.status, Some(409));
    assert_eq!(resp.message, "Slot is already booked for that window");
}

#[tokio::test]
async fn slot_status_update_sends_canonical_body() {
    let base = spawn_backend(Router::new().route(
        "/slots/{id}/status",
        patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            Json(json!({"slot": id, "received": body}))
        }),
    ))
    .await;
    let client = client_for(&base);

    let echoed: Value = client
        .update_slot_status("sl-2", SlotStatus::Maintenance)
        .await
        .decode()
        .unwrap();
    assert_eq!(echoed["slot"], "sl-2");
    assert_eq!(echoed["received"]["status"], "Maintenance");
}

#[tokio::test]
async fn nearby_stations_sends_coordinates() {
    let base = spawn_backend(Router::new().route(
        "/station/nearby",
        get(|Query(q): Query<HashMap<String, String>>| async move { Json(q) }),
    ))
    .await;
    let client = client_for(&base);

    let q: HashMap<String, String> = client
        .nearby_stations(6.9271, 79.8612, Some(5.0))
        .await
        .decode()
        .unwrap();
    assert_eq!(q["latitude"], "6.9271");
    assert_eq!(q["longitude"], "79.8612");
    assert_eq!(q["radiusKm"], "5");

    let q: HashMap<String, String> = client
        .nearby_stations(1.0, 2.0, None)
        .await
        .decode()
        .unwrap();
    assert!(!q.contains_key("radiusKm"));
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = client_for(&dead_backend().await);

    let resp = client.booking("b-1").await;
    assert!(!resp.success);
    assert!(resp.is_network_failure());
    assert_eq!(resp.message, NETWORK_ERROR_MESSAGE);

    let resp = client.login("a@b.com", "pw").await;
    assert!(resp.is_network_failure());
    assert!(!client.session().is_logged_in().await);
}

#[tokio::test]
async fn slow_server_times_out() {
    let base = spawn_backend(Router::new().route(
        "/notifications",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "[]"
        }),
    ))
    .await;
    let mut config = api_config(&base);
    config.read_timeout_secs = 1;
    config.write_timeout_secs = 0;
    config.connect_timeout_secs = 1;
    let client = ApiClient::new(&config, SessionStore::in_memory()).unwrap();

    let resp = client.notifications().await;
    assert!(!resp.success);
    assert_eq!(resp.message, TIMEOUT_MESSAGE);
    assert!(resp.status.is_none());
}
