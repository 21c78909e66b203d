//! Session credential storage.
//!
//! The client only ever calls [`TokenStore::get_token`]; the rest of the
//! trait serves session bootstrap and logout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Errors from writing or removing stored credentials.
#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Secure storage for the bearer token, refresh token, and user snapshot.
///
/// Reads never fail: a storage problem is logged and reported as absent, so
/// a broken store behaves like an anonymous session.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get_token(&self) -> Option<String>;

    async fn save_token(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the token together with the refresh token and user data.
    async fn remove_token(&self) -> Result<(), TokenStoreError>;

    async fn save_user_data(&self, user: &Value) -> Result<(), TokenStoreError>;

    async fn get_user_data(&self) -> Option<Value>;

    async fn save_refresh_token(&self, token: &str) -> Result<(), TokenStoreError>;

    async fn get_refresh_token(&self) -> Option<String>;
}

/// Everything a store keeps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Value>,
}

/// Process-local store. Credentials vanish on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<StoredSession>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(StoredSession {
                token: Some(token.into()),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    async fn save_token(&self, token: &str) -> Result<(), TokenStoreError> {
        self.session.write().await.token = Some(token.to_string());
        Ok(())
    }

    async fn remove_token(&self) -> Result<(), TokenStoreError> {
        *self.session.write().await = StoredSession::default();
        Ok(())
    }

    async fn save_user_data(&self, user: &Value) -> Result<(), TokenStoreError> {
        self.session.write().await.user = Some(user.clone());
        Ok(())
    }

    async fn get_user_data(&self) -> Option<Value> {
        self.session.read().await.user.clone()
    }

    async fn save_refresh_token(&self, token: &str) -> Result<(), TokenStoreError> {
        self.session.write().await.refresh_token = Some(token.to_string());
        Ok(())
    }

    async fn get_refresh_token(&self) -> Option<String> {
        self.session.read().await.refresh_token.clone()
    }
}

/// JSON file store used by the CLI.
///
/// The file is created with owner-only permissions on unix. Writes are
/// serialized through an internal lock and replace the whole file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoredSession, TokenStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(StoredSession::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read, falling back to an empty session on any error.
    async fn load_or_empty(&self) -> StoredSession {
        match self.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read token store");
                StoredSession::default()
            }
        }
    }

    async fn store(&self, session: &StoredSession) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, bytes).await?;
        restrict_permissions(&self.path).await?;
        debug!(path = %self.path.display(), "Token store updated");
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> Result<(), TokenStoreError>
    where
        F: FnOnce(&mut StoredSession) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut session = self.load_or_empty().await;
        apply(&mut session);
        self.store(&session).await
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get_token(&self) -> Option<String> {
        self.load_or_empty().await.token
    }

    async fn save_token(&self, token: &str) -> Result<(), TokenStoreError> {
        let token = token.to_string();
        self.update(move |s| s.token = Some(token)).await
    }

    async fn remove_token(&self) -> Result<(), TokenStoreError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_user_data(&self, user: &Value) -> Result<(), TokenStoreError> {
        let user = user.clone();
        self.update(move |s| s.user = Some(user)).await
    }

    async fn get_user_data(&self) -> Option<Value> {
        self.load_or_empty().await.user
    }

    async fn save_refresh_token(&self, token: &str) -> Result<(), TokenStoreError> {
        let token = token.to_string();
        self.update(move |s| s.refresh_token = Some(token)).await
    }

    async fn get_refresh_token(&self) -> Option<String> {
        self.load_or_empty().await.refresh_token
    }
}
