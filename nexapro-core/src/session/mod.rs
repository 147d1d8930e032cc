//! Token store: the persisted access/refresh token pair and locale preference
//!
//! The token store is the single source of truth for authentication state.
//! It is shared by the HTTP client (which reads the access token and writes
//! refreshed ones) and the route guard (which reads it before navigation).
//! Concurrent writers follow last-write-wins semantics.

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

#[cfg(test)]
pub use storage::MockSessionStorage;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Persisted storage keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const LOCALE: &str = "nexap_locale";
}

/// Access/refresh token pair as currently persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// Both tokens present.
    pub fn is_complete(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// Neither token present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// UI locale preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Sw,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "sw" => Ok(Locale::Sw),
            _ => Err(format!("Unsupported locale: {}", s)),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Sw => write!(f, "sw"),
        }
    }
}

impl Locale {
    /// Human-readable label for locale pickers
    pub fn label(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Sw => "Kiswahili",
        }
    }

    pub fn supported() -> [Locale; 2] {
        [Locale::En, Locale::Sw]
    }
}

/// Shared handle to the persisted session
///
/// The generation changes whenever a session starts or ends, so caches of
/// user-specific data can tell whether they still belong to the current
/// session. A token refresh keeps the generation.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
    generation: Arc<AtomicU64>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Token store over process-local storage
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        self.storage.get(keys::ACCESS_TOKEN).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.storage.get(keys::REFRESH_TOKEN).await
    }

    pub async fn session(&self) -> Result<Session> {
        Ok(Session {
            access_token: self.access_token().await?,
            refresh_token: self.refresh_token().await?,
        })
    }

    /// Persist a freshly issued token pair.
    pub async fn save(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.storage.set(keys::ACCESS_TOKEN, access_token).await?;
        self.storage.set(keys::REFRESH_TOKEN, refresh_token).await
    }

    /// Replace the access token after a refresh; the refresh token is kept.
    pub async fn set_access_token(&self, access_token: &str) -> Result<()> {
        self.storage.set(keys::ACCESS_TOKEN, access_token).await
    }

    /// Remove both tokens.
    ///
    /// Both removals are attempted even if the first fails, so a storage
    /// error never leaves a lone refresh token behind.
    pub async fn clear(&self) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let access = self.storage.remove(keys::ACCESS_TOKEN).await;
        let refresh = self.storage.remove(keys::REFRESH_TOKEN).await;
        access.and(refresh)
    }

    /// Authenticated means an access token is stored. Storage failures read as
    /// unauthenticated.
    pub async fn is_authenticated(&self) -> bool {
        match self.access_token().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!("Failed to read access token: {}", e);
                false
            }
        }
    }

    /// Saved locale; missing or unknown values fall back to English.
    pub async fn locale(&self) -> Locale {
        match self.storage.get(keys::LOCALE).await {
            Ok(Some(saved)) => saved.parse().unwrap_or_default(),
            Ok(None) => Locale::default(),
            Err(e) => {
                tracing::warn!("Failed to read locale preference: {}", e);
                Locale::default()
            }
        }
    }

    pub async fn set_locale(&self, locale: Locale) -> Result<()> {
        self.storage.set(keys::LOCALE, &locale.to_string()).await
    }
}
