use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eyre::WrapErr;
use healthsync_core::{errors::HealthResult, models::auth::Session};
use tokio::sync::Mutex;
use tracing::debug;

/// Persistence adapter for the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self) -> HealthResult<Option<Session>>;

    async fn set(&self, session: &Session) -> HealthResult<()>;

    async fn clear(&self) -> HealthResult<()>;
}

/// Keeps the session for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> HealthResult<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn set(&self, session: &Session) -> HealthResult<()> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> HealthResult<()> {
        *self.session.lock().await = None;
        Ok(())
    }
}

/// Stores the session as a JSON document on disk.
///
/// A missing file means "no session"; an unreadable one is an error.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> HealthResult<Option<Session>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(eyre::Report::new(e)
                    .wrap_err(format!("Failed to read session file {}", self.path.display()))
                    .into());
            }
        };

        let session = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Corrupt session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    async fn set(&self, session: &Session) -> HealthResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(session).wrap_err("Failed to encode session")?;
        tokio::fs::write(&self.path, json)
            .await
            .wrap_err_with(|| format!("Failed to write session file {}", self.path.display()))?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> HealthResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(eyre::Report::new(e)
                .wrap_err(format!("Failed to remove session file {}", self.path.display()))
                .into()),
        }
    }
}
