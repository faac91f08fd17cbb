//! Persistent push connection to the notification hub.
//!
//! The hub streams server-sent events. The bearer token is read once, when
//! the connection is built; a token refreshed later is only picked up by an
//! explicit [`NotificationHub::reconnect`]. There is no automatic
//! reconnection: when the stream ends the hub simply reports
//! [`HubState::Disconnected`] until the next foreground transition.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::header::{ACCEPT, HeaderName, HeaderValue};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use evcharge_core::config::{ApiConfig, HubConfig};
use evcharge_core::models::Notification;

use super::bus::NotificationBus;
use super::sse::{SseDecoder, SseEvent};
use crate::api::CLIENT_TYPE_HEADER;
use crate::session::SessionStore;

/// Event names carrying a notification payload. Unnamed events count too.
const NOTIFICATION_EVENTS: &[&str] = &["notification", "ReceiveNotification", "message"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Realtime notifications are disabled")]
    Disabled,

    #[error("Hub connection failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Hub rejected the connection (HTTP {0})")]
    Rejected(u16),
}

/// Owner of the single realtime connection.
///
/// State transitions are serialized behind one lock, so concurrent
/// foreground/background transitions cannot open two streams. The lock is
/// not held while the HTTP request is in flight.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    http: reqwest::Client,
    config: HubConfig,
    session: SessionStore,
    bus: NotificationBus,
    state: Arc<watch::Sender<HubState>>,
    /// Bumped on every connect attempt and disconnect. Only the holder of
    /// the current generation may move the state.
    generation: Arc<AtomicU64>,
    reader: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl NotificationHub {
    pub fn new(
        config: &HubConfig,
        api: &ApiConfig,
        session: SessionStore,
        bus: NotificationBus,
    ) -> Result<Self, HubError> {
        let _ = rustls::crypto::ring::default_provider().install_default();

        // No overall timeout: the stream is meant to stay open.
        let http = reqwest::Client::builder()
            .connect_timeout(api.connect_timeout())
            .build()?;

        let (state, _) = watch::channel(HubState::Disconnected);
        Ok(Self {
            http,
            config: config.clone(),
            session,
            bus,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            reader: Arc::new(Mutex::new(None)),
        })
    }

    pub fn state(&self) -> HubState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<HubState> {
        self.state.subscribe()
    }

    pub const fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// App came to the foreground: connect unless already connected.
    pub async fn on_foreground(&self) -> Result<(), HubError> {
        self.connect().await
    }

    /// App went to the background: drop the connection.
    pub async fn on_background(&self) {
        self.disconnect().await;
    }

    /// Drop the current stream and open a new one with the current token.
    pub async fn reconnect(&self) -> Result<(), HubError> {
        self.disconnect().await;
        self.connect().await
    }

    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn connect(&self) -> Result<(), HubError> {
        if !self.config.enabled {
            return Err(HubError::Disabled);
        }

        let (token, generation) = {
            let _reader = self.reader.lock().await;
            if self.state() != HubState::Disconnected {
                debug!("Hub already connected");
                return Ok(());
            }
            let token = self
                .session
                .token()
                .await
                .ok_or(HubError::NotAuthenticated)?;
            (token, self.advance(HubState::Connecting))
        };

        let response = match self
            .http
            .get(&self.config.url)
            .bearer_auth(token)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .header(
                HeaderName::from_static(CLIENT_TYPE_HEADER),
                HeaderValue::from_static("Mobile"),
            )
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                settle(&self.state, &self.generation, generation);
                warn!(error = %e, "Hub connection failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            settle(&self.state, &self.generation, generation);
            warn!(status = status.as_u16(), "Hub rejected connection");
            return Err(HubError::Rejected(status.as_u16()));
        }

        let mut reader = self.reader.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Hub disconnected while connecting, dropping stream");
            return Ok(());
        }
        self.state.send_replace(HubState::Connected);
        info!("Hub connected");

        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let bus = self.bus.clone();
        *reader = Some(tokio::spawn(async move {
            read_stream(response, &bus).await;
            if settle(&state, &current, generation) {
                info!("Hub stream ended");
            }
        }));
        Ok(())
    }

    pub async fn disconnect(&self) {
        let mut reader = self.reader.lock().await;
        if let Some(handle) = reader.take() {
            handle.abort();
        }
        let mut previous = HubState::Disconnected;
        self.state.send_modify(|s| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            previous = std::mem::replace(s, HubState::Disconnected);
        });
        if previous != HubState::Disconnected {
            info!("Hub disconnected");
        }
    }

    /// Start a new generation in `state` and return its number.
    fn advance(&self, state: HubState) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *s = state;
        });
        generation
    }
}

/// Mark the hub disconnected if `generation` is still current.
///
/// Runs under the state channel's lock, which every generation bump also
/// takes, so a stale reader can never overwrite a newer connection.
fn settle(state: &watch::Sender<HubState>, current: &AtomicU64, generation: u64) -> bool {
    state.send_if_modified(|s| {
        if current.load(Ordering::SeqCst) != generation || *s == HubState::Disconnected {
            return false;
        }
        *s = HubState::Disconnected;
        true
    })
}

async fn read_stream(mut response: reqwest::Response, bus: &NotificationBus) {
    let mut decoder = SseDecoder::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                for event in decoder.push(&chunk) {
                    dispatch(event, bus).await;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Hub stream error");
                break;
            }
        }
    }
}

async fn dispatch(event: SseEvent, bus: &NotificationBus) {
    let is_notification = event
        .event
        .as_deref()
        .is_none_or(|name| NOTIFICATION_EVENTS.contains(&name));
    if !is_notification {
        debug!(event = ?event.event, "Ignoring hub event");
        return;
    }

    match serde_json::from_str::<Notification>(&event.data) {
        Ok(notification) => {
            debug!(id = %notification.id, "Push notification received");
            bus.publish(notification).await;
        }
        Err(e) => warn!(error = %e, "Malformed push notification dropped"),
    }
}
