//! Durable session store.
//!
//! One JSON key-value document per installation holds the bearer token and
//! the optional "remember me" credentials. Every mutation rewrites the file.
//! Being logged in means nothing more than a token being present; expiry is
//! the server's business.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

const TOKEN_KEY: &str = "auth_token";
const REMEMBER_EMAIL_KEY: &str = "remember_email";
const REMEMBER_PASSWORD_KEY: &str = "remember_password";

/// Credentials saved by "remember me".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Cheaply cloneable handle to the session key-value store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    /// Backing file; `None` keeps everything in memory.
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file is an empty session. An unreadable or corrupt file is
    /// also treated as empty and logged.
    pub fn open(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Session file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read session file, starting empty");
                BTreeMap::new()
            }
        };
        Self {
            entries: Arc::new(RwLock::new(entries)),
            path: Some(path.to_path_buf()),
        }
    }

    /// A store that never touches disk (for tests).
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            path: None,
        }
    }

    // =========================================================================
    // Raw key-value access
    // =========================================================================

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
        .await
    }

    pub async fn remove(&self, keys: &[&str]) -> std::io::Result<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
        .await
    }

    /// Apply `change` to a copy, write the copy, then publish it.
    ///
    /// A failed write leaves both memory and disk as they were.
    async fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> std::io::Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;

        // Remembered credentials live here
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %path.display(), keys = entries.len(), "Session persisted");
        Ok(())
    }

    // =========================================================================
    // Token
    // =========================================================================

    pub async fn set_token(&self, token: &str) -> std::io::Result<()> {
        self.put(TOKEN_KEY, token).await
    }

    pub async fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).await.filter(|t| !t.is_empty())
    }

    pub async fn clear_token(&self) -> std::io::Result<()> {
        self.remove(&[TOKEN_KEY]).await
    }

    pub async fn is_logged_in(&self) -> bool {
        self.token().await.is_some()
    }

    // =========================================================================
    // Remember me
    // =========================================================================

    pub async fn remember_credentials(&self, email: &str, password: &str) -> std::io::Result<()> {
        self.update(|entries| {
            entries.insert(REMEMBER_EMAIL_KEY.to_owned(), email.to_owned());
            entries.insert(REMEMBER_PASSWORD_KEY.to_owned(), password.to_owned());
        })
        .await
    }

    pub async fn remembered_credentials(&self) -> Option<Credentials> {
        let entries = self.entries.read().await;
        Some(Credentials {
            email: entries.get(REMEMBER_EMAIL_KEY)?.clone(),
            password: entries.get(REMEMBER_PASSWORD_KEY)?.clone(),
        })
    }

    pub async fn forget_credentials(&self) -> std::io::Result<()> {
        self.remove(&[REMEMBER_EMAIL_KEY, REMEMBER_PASSWORD_KEY]).await
    }

    /// Drop every entry.
    pub async fn clear(&self) -> std::io::Result<()> {
        self.update(BTreeMap::clear).await
    }
}
