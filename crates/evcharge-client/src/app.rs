//! Application context.
//!
//! One [`EvChargeApp`] is built at process start and owns every stateful
//! component: session, API client, cache, notification bus and hub. Nothing
//! in this crate keeps global state.

use tracing::info;

use evcharge_core::Config;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::notifications::{HubError, NotificationBus, NotificationHub};
use crate::services::{AuthService, BookingService};
use crate::session::SessionStore;
use crate::storage::CacheDatabase;

#[derive(Clone)]
pub struct EvChargeApp {
    config: Config,
    api: ApiClient,
    cache: CacheDatabase,
    bus: NotificationBus,
    hub: NotificationHub,
    auth: AuthService,
    bookings: BookingService,
}

impl EvChargeApp {
    /// Open the on-disk session and cache under the configured data
    /// directory and wire everything together.
    pub async fn start(config: Config) -> Result<Self, ClientError> {
        let data_dir = config.storage.data_dir()?;
        tokio::fs::create_dir_all(&data_dir).await?;

        let session = SessionStore::open(&config.storage.session_path()?);
        let cache = CacheDatabase::open(&config.storage.cache_path()?).await?;
        info!(data_dir = %data_dir.display(), "Client state opened");
        Self::assemble(config, session, cache)
    }

    /// Context with a memory-only session and cache.
    pub async fn in_memory(config: Config) -> Result<Self, ClientError> {
        let cache = CacheDatabase::open_in_memory().await?;
        Self::assemble(config, SessionStore::in_memory(), cache)
    }

    fn assemble(
        config: Config,
        session: SessionStore,
        cache: CacheDatabase,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config.api, session.clone())?;
        let bus = NotificationBus::new();
        let hub = NotificationHub::new(&config.hub, &config.api, session, bus.clone())?;
        Ok(Self {
            auth: AuthService::new(api.clone(), cache.clone()),
            bookings: BookingService::new(api.clone(), cache.clone()),
            config,
            api,
            cache,
            bus,
            hub,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub const fn session(&self) -> &SessionStore {
        self.api.session()
    }

    pub const fn cache(&self) -> &CacheDatabase {
        &self.cache
    }

    pub const fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub const fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub const fn bookings(&self) -> &BookingService {
        &self.bookings
    }

    /// Log out locally and drop the push connection that used the old token.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.hub.disconnect().await;
        self.auth.logout().await
    }

    /// Connect the hub if a session exists. A missing session is not an
    /// error here; the app simply runs without push.
    pub async fn resume(&self) -> Result<(), HubError> {
        if !self.session().is_logged_in().await {
            return Ok(());
        }
        self.hub.on_foreground().await
    }

    pub async fn shutdown(&self) {
        self.hub.disconnect().await;
        self.cache.close().await;
        info!("Client shut down");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notifications::HubState;

    fn offline_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.api.base_url = "http://127.0.0.1:9/api".into();
        config.hub.url = "http://127.0.0.1:9/hub".into();
        config.storage.data_dir = Some(dir.to_path_buf());
        config
    }

    #[tokio::test]
    async fn start_creates_state_files_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested");
        let app = EvChargeApp::start(offline_config(&data_dir)).await.unwrap();

        app.session().set_token("t1").await.unwrap();
        assert!(data_dir.join("cache.db").exists());
        assert!(data_dir.join("session.json").exists());
        app.shutdown().await;

        let reopened = EvChargeApp::start(offline_config(&data_dir)).await.unwrap();
        assert_eq!(reopened.session().token().await.as_deref(), Some("t1"));
        reopened.shutdown().await;
    }

    #[tokio::test]
    async fn resume_without_session_stays_disconnected() {
        let dir = tempfile::tempdir().unwrap();
        let app = EvChargeApp::in_memory(offline_config(dir.path())).await.unwrap();

        app.resume().await.unwrap();
        assert_eq!(app.hub().state(), HubState::Disconnected);
    }

    #[tokio::test]
    async fn logout_clears_session_offline() {
        let dir = tempfile::tempdir().unwrap();
        let app = EvChargeApp::in_memory(offline_config(dir.path())).await.unwrap();
        app.session().set_token("t1").await.unwrap();

        app.logout().await.unwrap();
        assert!(!app.session().is_logged_in().await);
        assert!(app.auth().current_user().await.is_none());
    }

    #[tokio::test]
    async fn bus_is_shared_with_hub() {
        let dir = tempfile::tempdir().unwrap();
        let app = EvChargeApp::in_memory(offline_config(dir.path())).await.unwrap();

        let _sub = app.bus().subscribe().await;
        assert_eq!(app.hub().bus().subscriber_count().await, 1);
    }
}
