//! Session context: everything one signed-in front end needs, wired together

use crate::api::Api;
use crate::config::Config;
use crate::domain::{Record, SubscriptionRequest};
use crate::error::Result;
use crate::gate::SubscriptionGate;
use crate::http::ApiClient;
use crate::router::{RouteGuard, RouteTable, Router};
use crate::session::{FileStorage, SessionStorage, TokenStore};
use crate::store::Stores;
use crate::ui::Ui;
use std::sync::Arc;

/// Owns the token store, request pipeline, stores and router for one session.
///
/// Built by [`AppContext::init`] and released with [`AppContext::teardown`].
pub struct AppContext {
    config: Arc<Config>,
    tokens: TokenStore,
    client: ApiClient,
    api: Api,
    stores: Arc<Stores>,
    router: Router,
}

impl AppContext {
    /// Build a context persisting the session in `config.session_file`.
    pub async fn init(config: Config, ui: Ui) -> Result<Self> {
        let storage = FileStorage::open(&config.session_file).await?;
        Self::with_storage(config, Arc::new(storage), ui)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn SessionStorage>, ui: Ui) -> Result<Self> {
        let config = Arc::new(config);
        let tokens = TokenStore::new(storage);
        let client = ApiClient::new(config.clone(), tokens.clone(), ui)?;
        let api = Api::new(client.clone());
        let stores = Arc::new(Stores::new(&api));
        let guard = RouteGuard::new(RouteTable::new(), tokens.clone(), stores.clone());

        tracing::debug!(base_url = %config.api_base_url, "Session context ready");

        Ok(Self {
            config,
            tokens,
            client,
            api,
            stores,
            router: Router::new(guard),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Subscription gate over the cached profile
    pub async fn gate(&self) -> SubscriptionGate {
        SubscriptionGate::new(
            self.stores.profiles.profile().await,
            self.client.ui().clone(),
        )
    }

    /// Log in and load the profile used for feature checks.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.stores.profiles.clear().await;
        self.stores.auth.login(username, password).await?;
        self.reload_profile("login").await;
        Ok(())
    }

    /// Upgrade the subscription, then reload the profile so feature checks
    /// see the new plan.
    pub async fn upgrade_subscription(&self, request: &SubscriptionRequest) -> Result<Record> {
        let subscriptions = &self.stores.subscriptions;
        let response = subscriptions.upgrade_subscription(request).await?;
        self.reload_profile("upgrade").await;
        Ok(response)
    }

    /// Renew the subscription, then reload the profile.
    pub async fn renew_subscription(&self, request: &SubscriptionRequest) -> Result<Record> {
        let subscriptions = &self.stores.subscriptions;
        let response = subscriptions.renew_subscription(request).await?;
        self.reload_profile("renew").await;
        Ok(response)
    }

    /// Fetch the current profile. On failure the stale copy is dropped so the
    /// guard loads it again on the next gated navigation.
    async fn reload_profile(&self, after: &'static str) {
        if let Err(e) = self.stores.profiles.fetch_current_profile().await {
            tracing::warn!(after, error = %e, "Profile could not be reloaded");
            self.stores.profiles.clear().await;
        }
    }

    /// Clear the persisted session and every cached user-specific value.
    pub async fn logout(&self) -> Result<()> {
        self.stores.profiles.clear().await;
        self.stores.auth.logout().await
    }

    /// Drop cached state. The persisted session survives for the next `init`.
    pub async fn teardown(self) {
        self.stores.profiles.clear().await;
        tracing::debug!("Session context torn down");
    }
}
