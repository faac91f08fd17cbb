use tracing::{info, instrument, warn};

use evcharge_core::TokenClaims;
use evcharge_core::models::{Operator, RegisterRequest, User, UserProfile};

use super::cache_ok;
use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientError;
use crate::storage::CacheDatabase;

/// Login, logout and the cached identity of the current user.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    cache: CacheDatabase,
}

impl AuthService {
    pub const fn new(api: ApiClient, cache: CacheDatabase) -> Self {
        Self { api, cache }
    }

    /// Log in and cache the resulting user.
    ///
    /// The profile endpoint is consulted for details the token lacks; if it
    /// fails the user is built from the token claims alone. Operators also
    /// get their station assignment cached.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<User, ClientError> {
        let resp = self.api.login(email, password).await;
        if !resp.success {
            return Err(resp.into());
        }

        // The API client has already stored the token. A login that fails
        // past this point must not leave it behind.
        match self.complete_login(email, password, remember, resp.status).await {
            Ok(user) => Ok(user),
            Err(e) => {
                warn!(error = %e, "Login incomplete, dropping session");
                if let Err(clear) = self.api.session().clear_token().await {
                    warn!(error = %clear, "Failed to drop session token");
                }
                cache_ok(self.cache.clear_all().await, "clear_all");
                Err(e)
            }
        }
    }

    async fn complete_login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
        status: Option<u16>,
    ) -> Result<User, ClientError> {
        let session = self.api.session();
        let token = session
            .token()
            .await
            .ok_or_else(|| ApiResponse::failure("Login did not return a session.", status))?;
        let claims = TokenClaims::decode(&token)?;

        let profile = self.fetch_profile().await;
        let user = User::from_login(&claims, profile, email);

        cache_ok(self.cache.save_user(&user).await, "save_user");
        match Operator::from_user(&user) {
            Some(operator) => {
                cache_ok(self.cache.save_operator(&operator).await, "save_operator");
            }
            None => {
                cache_ok(self.cache.clear_operator().await, "clear_operator");
            }
        }

        if remember {
            session.remember_credentials(email, password).await?;
        } else {
            session.forget_credentials().await?;
        }

        info!(user_id = %user.user_id, role = %user.role, "User logged in");
        Ok(user)
    }

    async fn fetch_profile(&self) -> Option<UserProfile> {
        let resp = self.api.profile().await;
        if !resp.success {
            warn!(status = ?resp.status, message = %resp.message, "Profile fetch failed, using token claims");
            return None;
        }
        match resp.decode() {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Profile payload unreadable, using token claims");
                None
            }
        }
    }

    /// Create an EV owner account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse, ClientError> {
        self.api.register(request).await.into_result()
    }

    /// Forget the session and everything cached for it.
    ///
    /// Never touches the network, so it works offline and may be repeated.
    /// Remembered credentials survive.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.api.session().clear_token().await?;
        cache_ok(self.cache.clear_all().await, "clear_all");
        info!("Logged out");
        Ok(())
    }

    /// The cached user, if any. Cache failures read as logged out.
    pub async fn current_user(&self) -> Option<User> {
        cache_ok(self.cache.logged_in_user().await, "logged_in_user").flatten()
    }

    pub async fn current_operator(&self) -> Option<Operator> {
        cache_ok(self.cache.operator().await, "operator").flatten()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.api.session().is_logged_in().await
    }
}
