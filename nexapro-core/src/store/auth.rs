//! Authentication state

use crate::api::AuthApi;
use crate::error::{AppError, Result};
use crate::http::NO_REFRESH_TOKEN;
use crate::session::TokenStore;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

const LOGIN_FAILED: &str = "Login failed";

pub struct AuthStore {
    api: AuthApi,
    tokens: TokenStore,
    authenticated: AtomicBool,
    loading: AtomicBool,
    error: RwLock<Option<String>>,
}

impl AuthStore {
    pub fn new(api: AuthApi, tokens: TokenStore) -> Self {
        Self {
            api,
            tokens,
            authenticated: AtomicBool::new(false),
            loading: AtomicBool::new(false),
            error: RwLock::new(None),
        }
    }

    /// Authenticated iff an access token is stored.
    pub async fn init_auth(&self) -> bool {
        let authenticated = self.tokens.is_authenticated().await;
        self.authenticated.store(authenticated, Ordering::SeqCst);
        authenticated
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Message from the last failed login
    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.loading.store(true, Ordering::SeqCst);
        *self.error.write().await = None;

        let result = self.try_login(username, password).await;
        self.loading.store(false, Ordering::SeqCst);

        if let Err(e) = &result {
            let message = e.detail().unwrap_or_else(|| LOGIN_FAILED.to_string());
            tracing::warn!(username = %username, error = %e, "Login failed");
            *self.error.write().await = Some(message);
        }
        result
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<()> {
        let pair = self.api.login(username, password).await?;
        self.tokens.save(&pair.access, &pair.refresh).await?;
        self.authenticated.store(true, Ordering::SeqCst);
        tracing::info!(username = %username, "Logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.authenticated.store(false, Ordering::SeqCst);
        self.tokens.clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Exchange the stored refresh token. Any failure logs the user out.
    pub async fn refresh_token(&self) -> bool {
        match self.try_refresh().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed, logging out");
                if let Err(e) = self.logout().await {
                    tracing::error!("Failed to clear session: {}", e);
                }
                false
            }
        }
    }

    async fn try_refresh(&self) -> Result<()> {
        let refresh = self
            .tokens
            .refresh_token()
            .await?
            .ok_or_else(|| AppError::Unauthorized(NO_REFRESH_TOKEN.into()))?;
        let access = self.api.refresh(&refresh).await?;
        self.tokens.set_access_token(&access).await
    }
}
