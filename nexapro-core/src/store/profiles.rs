//! Current profile cache plus the admin profile list

use super::resource::{ResourceStore, UpdateMethod};
use crate::api::ProfilesApi;
use crate::domain::Profile;
use crate::error::Result;
use crate::session::TokenStore;
use serde::Serialize;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Profile cached together with the session generation it was loaded under
struct CachedProfile {
    generation: u64,
    profile: Profile,
}

pub struct ProfilesStore {
    api: ProfilesApi,
    tokens: TokenStore,
    profile: RwLock<Option<CachedProfile>>,
    loading: AtomicBool,
    list: ResourceStore,
}

impl ProfilesStore {
    pub fn new(api: ProfilesApi) -> Self {
        let list = ResourceStore::new((*api).clone(), UpdateMethod::Put);
        let tokens = api.client().tokens().clone();
        Self {
            api,
            tokens,
            profile: RwLock::new(None),
            loading: AtomicBool::new(false),
            list,
        }
    }

    /// Cached profile of the logged-in user. A profile loaded before the
    /// current session started reads as absent.
    pub async fn profile(&self) -> Option<Profile> {
        let generation = self.tokens.generation();
        self.profile
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.generation == generation)
            .map(|cached| cached.profile.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) || self.list.is_loading()
    }

    pub async fn fetch_current_profile(&self) -> Result<Profile> {
        let generation = self.tokens.generation();
        self.loading.store(true, Ordering::SeqCst);
        let result = self.api.current().await;
        self.loading.store(false, Ordering::SeqCst);

        let profile = result?;
        *self.profile.write().await = Some(CachedProfile {
            generation,
            profile: profile.clone(),
        });
        Ok(profile)
    }

    /// Cached profile, loading it first if nothing is cached. Load failures
    /// are logged and read as no profile.
    pub async fn ensure_current_profile(&self) -> Option<Profile> {
        if let Some(profile) = self.profile().await {
            return Some(profile);
        }
        match self.fetch_current_profile().await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load current profile");
                None
            }
        }
    }

    /// Update the owner linked to the current profile, then reload it.
    /// Does nothing when the profile has no owner.
    pub async fn update_owner<T: Serialize + ?Sized + Sync>(&self, data: &T) -> Result<()> {
        let Some(owner_id) = self.profile().await.and_then(|p| p.owner_id()) else {
            tracing::debug!("No owner on current profile, skipping update");
            return Ok(());
        };
        self.api.update_owner(owner_id, data).await?;
        self.fetch_current_profile().await?;
        Ok(())
    }

    /// Drop the cached profile, e.g. on logout.
    pub async fn clear(&self) {
        *self.profile.write().await = None;
    }
}

impl Deref for ProfilesStore {
    type Target = ResourceStore;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
