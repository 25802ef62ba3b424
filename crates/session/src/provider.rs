use std::sync::Arc;

use healthsync_client::services::AuthService;
use healthsync_core::{
    errors::{HealthError, HealthResult},
    models::auth::{LoginRequest, Session, SignupRequest, User},
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::store::SessionStore;

/// Read-only view of the current session.
///
/// Cloning is cheap; all clones observe logins and logouts made through the
/// owning [`SessionProvider`].
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// A handle over a fixed session, for hosts that manage auth elsewhere.
    pub fn fixed(session: Option<Session>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

/// Owns the session: logs in and out through the auth service and keeps the
/// configured store in sync.
pub struct SessionProvider {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn SessionStore>,
    handle: SessionHandle,
}

impl SessionProvider {
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            auth,
            store,
            handle: SessionHandle::default(),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Loads a previously saved session, if any.
    pub async fn restore(&self) -> HealthResult<Option<Session>> {
        let session = self.store.get().await?;
        if let Some(session) = &session {
            info!("Restored session for {}", session.user.username);
        }
        *self.handle.inner.write().await = session.clone();
        Ok(session)
    }

    pub async fn login(&self, username: &str, password: &str) -> HealthResult<Session> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(HealthError::Validation("Username and password are required".to_string()));
        }

        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let session: Session = self.auth.login(&request).await?.into();
        self.install(&session).await;
        info!("Logged in as {}", session.user.username);
        Ok(session)
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> HealthResult<Session> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(HealthError::Validation(
                "Username, email and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(HealthError::Validation(format!("Invalid email address: {}", email)));
        }

        let request = SignupRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let session: Session = self.auth.signup(&request).await?.into();
        self.install(&session).await;
        info!("Signed up as {}", session.user.username);
        Ok(session)
    }

    /// Forgets the session in memory and in the store.
    pub async fn logout(&self) -> HealthResult<()> {
        *self.handle.inner.write().await = None;
        self.store.clear().await?;
        info!("Logged out");
        Ok(())
    }

    async fn install(&self, session: &Session) {
        *self.handle.inner.write().await = Some(session.clone());
        if let Err(e) = self.store.set(session).await {
            // The in-memory session is still usable for this run.
            warn!("Failed to persist session: {}", e);
        }
    }
}
