use tracing::{debug, instrument};

use evcharge_core::models::{BookingItem, BookingRequest};

use super::cache_ok;
use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientError;
use crate::storage::CacheDatabase;

/// Bookings with a write-through cache.
#[derive(Clone)]
pub struct BookingService {
    api: ApiClient,
    cache: CacheDatabase,
}

impl BookingService {
    pub const fn new(api: ApiClient, cache: CacheDatabase) -> Self {
        Self { api, cache }
    }

    /// One booking, from the cache unless `refresh` is set or nothing is
    /// cached.
    #[instrument(skip(self))]
    pub async fn booking(&self, booking_id: &str, refresh: bool) -> Result<BookingItem, ClientError> {
        if !refresh
            && let Some(cached) = cache_ok(self.cache.booking(booking_id).await, "booking").flatten()
        {
            debug!("Serving booking from cache");
            return Ok(cached);
        }

        let resp = self.api.booking(booking_id).await.into_result()?;
        let booking: BookingItem = resp.decode()?;
        cache_ok(self.cache.save_booking(&booking).await, "save_booking");
        Ok(booking)
    }

    /// All bookings of an owner, fetched fresh.
    pub async fn owner_bookings(&self, owner_id: &str) -> Result<Vec<BookingItem>, ClientError> {
        let resp = self.api.owner_bookings(owner_id).await.into_result()?;
        let bookings: Vec<BookingItem> = resp.decode()?;
        cache_ok(self.cache.save_bookings(&bookings).await, "save_bookings");
        Ok(bookings)
    }

    /// What the cache knows about an owner's bookings, for offline views.
    pub async fn cached_owner_bookings(&self, owner_id: &str) -> Vec<BookingItem> {
        cache_ok(self.cache.bookings_for_owner(owner_id).await, "bookings_for_owner")
            .unwrap_or_default()
    }

    /// Upcoming bookings at a station (operator view).
    pub async fn upcoming_for_station(
        &self,
        station_id: &str,
    ) -> Result<Vec<BookingItem>, ClientError> {
        let resp = self
            .api
            .upcoming_station_bookings(station_id)
            .await
            .into_result()?;
        let bookings: Vec<BookingItem> = resp.decode()?;
        cache_ok(self.cache.save_bookings(&bookings).await, "save_bookings");
        Ok(bookings)
    }

    pub async fn create(&self, request: &BookingRequest) -> Result<BookingItem, ClientError> {
        let resp = self.api.create_booking(request).await.into_result()?;
        let booking: BookingItem = resp.decode()?;
        cache_ok(self.cache.save_booking(&booking).await, "save_booking");
        Ok(booking)
    }

    pub async fn cancel(&self, booking_id: &str) -> Result<Option<BookingItem>, ClientError> {
        let resp = self.api.cancel_booking(booking_id).await;
        self.apply_transition(booking_id, resp).await
    }

    pub async fn start_charging(
        &self,
        booking_id: &str,
    ) -> Result<Option<BookingItem>, ClientError> {
        let resp = self.api.start_charging(booking_id).await;
        self.apply_transition(booking_id, resp).await
    }

    pub async fn finalize(&self, booking_id: &str) -> Result<Option<BookingItem>, ClientError> {
        let resp = self.api.finalize_booking(booking_id).await;
        self.apply_transition(booking_id, resp).await
    }

    /// Status changes may or may not echo the updated booking. When they
    /// do, cache it; otherwise the cached copy is stale and is dropped.
    async fn apply_transition(
        &self,
        booking_id: &str,
        resp: ApiResponse,
    ) -> Result<Option<BookingItem>, ClientError> {
        let resp = resp.into_result()?;
        match resp.decode::<BookingItem>() {
            Ok(booking) => {
                cache_ok(self.cache.save_booking(&booking).await, "save_booking");
                Ok(Some(booking))
            }
            Err(_) => {
                cache_ok(self.cache.delete_booking(booking_id).await, "delete_booking");
                Ok(None)
            }
        }
    }
}
