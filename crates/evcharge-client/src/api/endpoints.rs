//! Typed wrappers for the backend endpoints.
//!
//! Each method returns the raw [`ApiResponse`]; callers decode `data` into
//! the matching model with [`ApiResponse::decode`].

use tracing::{info, warn};

use evcharge_core::models::{
    BookingRequest, LoginPayload, LoginRequest, RegisterRequest, SlotStatus, SlotStatusUpdate,
};

use super::client::ApiClient;
use super::response::{ApiResponse, MALFORMED_RESPONSE_MESSAGE};

impl ApiClient {
    // =========================================================================
    // Auth
    // =========================================================================

    /// `POST /auth/login`. On success the token is written to the session
    /// store before returning.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let resp = self.post_json("/auth/login", &body).await;
        if !resp.success {
            return resp;
        }

        let payload: LoginPayload = match resp.decode() {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Login succeeded without a usable token");
                return ApiResponse::failure(MALFORMED_RESPONSE_MESSAGE, resp.status);
            }
        };
        if payload.token.is_empty() {
            return ApiResponse::failure(MALFORMED_RESPONSE_MESSAGE, resp.status);
        }

        if let Err(e) = self.session().set_token(&payload.token).await {
            warn!(error = %e, "Failed to persist session token");
            return ApiResponse::failure("Could not save the login session.", resp.status);
        }
        info!("Logged in");
        resp
    }

    /// `POST /auth/register` (EV owners only).
    pub async fn register(&self, request: &RegisterRequest) -> ApiResponse {
        self.post_json("/auth/register", request).await
    }

    /// `GET /auth/profile` for the token holder.
    pub async fn profile(&self) -> ApiResponse {
        self.get("/auth/profile").await
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    pub async fn booking(&self, booking_id: &str) -> ApiResponse {
        self.get(&format!("/bookings/{}", Self::encode_segment(booking_id)))
            .await
    }

    pub async fn owner_bookings(&self, owner_id: &str) -> ApiResponse {
        self.get(&format!("/bookings/owner/{}", Self::encode_segment(owner_id)))
            .await
    }

    pub async fn upcoming_station_bookings(&self, station_id: &str) -> ApiResponse {
        self.get(&format!(
            "/bookings/station/{}/upcoming",
            Self::encode_segment(station_id)
        ))
        .await
    }

    pub async fn create_booking(&self, request: &BookingRequest) -> ApiResponse {
        self.post_json("/bookings", request).await
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> ApiResponse {
        self.patch(&format!("/bookings/{}/cancel", Self::encode_segment(booking_id)))
            .await
    }

    /// Operator scanned the QR code; charging begins.
    pub async fn start_charging(&self, booking_id: &str) -> ApiResponse {
        self.patch(&format!("/bookings/{}/start", Self::encode_segment(booking_id)))
            .await
    }

    pub async fn finalize_booking(&self, booking_id: &str) -> ApiResponse {
        self.patch(&format!(
            "/bookings/{}/finalize",
            Self::encode_segment(booking_id)
        ))
        .await
    }

    // =========================================================================
    // Slots
    // =========================================================================

    pub async fn station_slots(&self, station_id: &str) -> ApiResponse {
        self.get(&format!("/slots/station/{}", Self::encode_segment(station_id)))
            .await
    }

    pub async fn update_slot_status(&self, slot_id: &str, status: SlotStatus) -> ApiResponse {
        self.patch_json(
            &format!("/slots/{}/status", Self::encode_segment(slot_id)),
            &SlotStatusUpdate { status },
        )
        .await
    }

    // =========================================================================
    // Stations
    // =========================================================================

    pub async fn nearby_stations(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> ApiResponse {
        let mut path = format!("/station/nearby?latitude={latitude}&longitude={longitude}");
        if let Some(r) = radius_km {
            use std::fmt::Write;
            let _ = write!(path, "&radiusKm={r}");
        }
        self.get(&path).await
    }

    pub async fn station(&self, station_id: &str) -> ApiResponse {
        self.get(&format!("/station/{}", Self::encode_segment(station_id)))
            .await
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn notifications(&self) -> ApiResponse {
        self.get("/notifications").await
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> ApiResponse {
        self.patch(&format!(
            "/notifications/{}/read",
            Self::encode_segment(notification_id)
        ))
        .await
    }
}
