//! Service tests against a fake backend and an in-memory cache.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use evcharge_core::models::{BookingStatus, Role};

use super::{AuthService, BookingService};
use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::SessionStore;
use crate::storage::CacheDatabase;
use crate::test_support::{api_config, dead_backend, fake_jwt, spawn_backend};

fn owner_token() -> String {
    fake_jwt(&json!({"sub": "199012345678", "email": "a@b.com", "role": "EVOwner"}))
}

fn operator_token() -> String {
    fake_jwt(&json!({"sub": "op-7", "email": "op@b.com", "role": "StationOperator"}))
}

fn booking_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "stationId": "st-1",
        "slotId": "sl-1",
        "ownerNic": "199012345678",
        "status": status,
        "startTime": "2026-10-20T09:00:00Z",
        "endTime": "2026-10-20T10:00:00Z",
    })
}

struct Fixture {
    auth: AuthService,
    bookings: BookingService,
    cache: CacheDatabase,
    session: SessionStore,
}

async fn fixture(base: &str) -> Fixture {
    let session = SessionStore::in_memory();
    let api = ApiClient::new(&api_config(base), session.clone()).unwrap();
    let cache = CacheDatabase::open_in_memory().await.unwrap();
    Fixture {
        auth: AuthService::new(api.clone(), cache.clone()),
        bookings: BookingService::new(api, cache.clone()),
        cache,
        session,
    }
}

fn login_router(token: String, profile: Option<Value>) -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(move || {
                let token = token.clone();
                async move { Json(json!({"token": token})) }
            }),
        )
        .route(
            "/auth/profile",
            get(move || {
                let profile = profile.clone();
                async move {
                    match profile {
                        Some(p) => (StatusCode::OK, Json(p)),
                        None => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"message": "boom"})),
                        ),
                    }
                }
            }),
        )
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn login_caches_user_from_profile() {
    let profile = json!({"nic": "199012345678", "fullName": "Ann Perera", "isActive": true});
    let base = spawn_backend(login_router(owner_token(), Some(profile))).await;
    let Fixture { auth, cache, .. } = fixture(&base).await;

    let user = auth.login("a@b.com", "pw", false).await.unwrap();
    assert_eq!(user.full_name, "Ann Perera");
    assert_eq!(user.role, Role::EvOwner);

    let cached = auth.current_user().await.unwrap();
    assert_eq!(cached, user);
    assert_eq!(cache.user_count().await.unwrap(), 1);
    assert!(auth.current_operator().await.is_none());
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn login_falls_back_to_claims_when_profile_fails() {
    let base = spawn_backend(login_router(owner_token(), None)).await;
    let Fixture { auth, .. } = fixture(&base).await;

    let user = auth.login("a@b.com", "pw", false).await.unwrap();
    assert_eq!(user.user_id, "199012345678");
    assert_eq!(user.email, "a@b.com");
}

#[tokio::test]
async fn operator_login_caches_station_assignment() {
    let profile = json!({"stationId": "st-1", "stationName": "Colombo 03"});
    let base = spawn_backend(login_router(operator_token(), Some(profile))).await;
    let Fixture { auth, .. } = fixture(&base).await;

    let user = auth.login("op@b.com", "pw", false).await.unwrap();
    assert!(user.is_operator());

    let operator = auth.current_operator().await.unwrap();
    assert_eq!(operator.operator_id, "op-7");
    assert_eq!(operator.station_id, "st-1");
}

#[tokio::test]
async fn unreadable_token_leaves_no_session_behind() {
    let base = spawn_backend(login_router("opaque-session-token".into(), None)).await;
    let Fixture { auth, session, .. } = fixture(&base).await;

    let err = auth.login("a@b.com", "pw", true).await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_)), "{err:?}");

    assert!(!auth.is_logged_in().await);
    assert!(session.token().await.is_none());
    assert!(auth.current_user().await.is_none());
    assert!(session.remembered_credentials().await.is_none());
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let router = Router::new().route(
        "/auth/login",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Invalid email or password"})),
            )
        }),
    );
    let base = spawn_backend(router).await;
    let Fixture { auth, cache, .. } = fixture(&base).await;

    let err = auth.login("a@b.com", "bad", true).await.unwrap_err();
    assert!(matches!(&err, ClientError::Rejected(r) if r.status == Some(401)));
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(auth.current_user().await.is_none());
    assert_eq!(cache.user_count().await.unwrap(), 0);
}

#[tokio::test]
async fn remember_flag_controls_saved_credentials() {
    let base = spawn_backend(login_router(owner_token(), None)).await;
    let Fixture { auth, session, .. } = fixture(&base).await;

    auth.login("a@b.com", "pw", true).await.unwrap();
    let saved = session.remembered_credentials().await.unwrap();
    assert_eq!(saved.email, "a@b.com");
    assert_eq!(saved.password, "pw");

    auth.login("a@b.com", "pw", false).await.unwrap();
    assert!(session.remembered_credentials().await.is_none());
}

#[tokio::test]
async fn logout_is_local_and_idempotent() {
    let base = spawn_backend(login_router(owner_token(), None)).await;
    let Fixture {
        auth,
        bookings,
        cache,
        session,
    } = fixture(&base).await;
    auth.login("a@b.com", "pw", true).await.unwrap();
    cache
        .save_booking(&serde_json::from_value(booking_json("b1", "Pending")).unwrap())
        .await
        .unwrap();

    auth.logout().await.unwrap();
    auth.logout().await.unwrap();

    assert!(!auth.is_logged_in().await);
    assert!(auth.current_user().await.is_none());
    assert!(bookings.cached_owner_bookings("199012345678").await.is_empty());
    assert!(session.remembered_credentials().await.is_some());
}

#[tokio::test]
async fn logout_works_offline() {
    let Fixture { auth, session, .. } = fixture(&dead_backend().await).await;
    session.set_token("t1").await.unwrap();

    auth.logout().await.unwrap();
    assert!(!auth.is_logged_in().await);
}

// =============================================================================
// Bookings
// =============================================================================

#[tokio::test]
async fn booking_is_served_from_cache_unless_refreshed() {
    let router = Router::new().route(
        "/bookings/{id}",
        get(|Path(id): Path<String>| async move { Json(booking_json(&id, "Approved")) }),
    );
    let base = spawn_backend(router).await;
    let Fixture { bookings, cache, .. } = fixture(&base).await;
    cache
        .save_booking(&serde_json::from_value(booking_json("b1", "Pending")).unwrap())
        .await
        .unwrap();

    let cached = bookings.booking("b1", false).await.unwrap();
    assert_eq!(cached.status, BookingStatus::Pending);

    let fresh = bookings.booking("b1", true).await.unwrap();
    assert_eq!(fresh.status, BookingStatus::Approved);
    let stored = cache.booking("b1").await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Approved);
}

#[tokio::test]
async fn cache_miss_fetches_and_fills_cache() {
    let router = Router::new().route(
        "/bookings/{id}",
        get(|Path(id): Path<String>| async move { Json(booking_json(&id, "Approved")) }),
    );
    let base = spawn_backend(router).await;
    let Fixture { bookings, cache, .. } = fixture(&base).await;

    bookings.booking("b9", false).await.unwrap();
    assert!(cache.booking("b9").await.unwrap().is_some());
}

#[tokio::test]
async fn owner_bookings_write_through() {
    let router = Router::new().route(
        "/bookings/owner/{id}",
        get(|| async {
            Json(json!([
                booking_json("b2", "Approved"),
                booking_json("b1", "Pending"),
            ]))
        }),
    );
    let base = spawn_backend(router).await;
    let Fixture { bookings, .. } = fixture(&base).await;

    let fetched = bookings.owner_bookings("199012345678").await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert_eq!(bookings.cached_owner_bookings("199012345678").await.len(), 2);
}

#[tokio::test]
async fn transition_echo_updates_cache_and_bare_reply_evicts() {
    let router = Router::new()
        .route(
            "/bookings/{id}/cancel",
            patch(|Path(id): Path<String>| async move { Json(booking_json(&id, "Cancelled")) }),
        )
        .route(
            "/bookings/{id}/start",
            patch(|| async { Json(json!({"message": "Charging started"})) }),
        );
    let base = spawn_backend(router).await;
    let Fixture { bookings, cache, .. } = fixture(&base).await;
    for id in ["b1", "b2"] {
        cache
            .save_booking(&serde_json::from_value(booking_json(id, "Approved")).unwrap())
            .await
            .unwrap();
    }

    let cancelled = bookings.cancel("b1").await.unwrap().unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(
        cache.booking("b1").await.unwrap().unwrap().status,
        BookingStatus::Cancelled
    );

    assert!(bookings.start_charging("b2").await.unwrap().is_none());
    assert!(cache.booking("b2").await.unwrap().is_none());
}

#[tokio::test]
async fn rejected_transition_keeps_cache() {
    let router = Router::new().route(
        "/bookings/{id}/finalize",
        patch(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({"message": "Booking is not charging"})),
            )
        }),
    );
    let base = spawn_backend(router).await;
    let Fixture { bookings, cache, .. } = fixture(&base).await;
    cache
        .save_booking(&serde_json::from_value(booking_json("b1", "Approved")).unwrap())
        .await
        .unwrap();

    let err = bookings.finalize("b1").await.unwrap_err();
    assert_eq!(err.to_string(), "Booking is not charging");
    assert!(cache.booking("b1").await.unwrap().is_some());
}
