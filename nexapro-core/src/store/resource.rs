//! Generic list cache for a CRUD resource

use crate::api::ResourceClient;
use crate::domain::{Params, Record};
use crate::error::Result;
use serde::Serialize;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// HTTP verb a store uses for `update_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    Patch,
}

#[derive(Default)]
struct StoreState {
    items: Vec<Record>,
    last_params: Params,
}

/// Cached list of records plus loading flag and last query.
///
/// Mutations re-fetch with the last query. Each fetch is numbered and only
/// the most recently issued fetch may write `items`, so a slow response can
/// never overwrite a newer one.
pub struct ResourceStore {
    client: ResourceClient,
    update_method: UpdateMethod,
    state: RwLock<StoreState>,
    loading: AtomicBool,
    latest_fetch: AtomicU64,
}

impl ResourceStore {
    pub fn new(client: ResourceClient, update_method: UpdateMethod) -> Self {
        Self {
            client,
            update_method,
            state: RwLock::new(StoreState::default()),
            loading: AtomicBool::new(false),
            latest_fetch: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    pub async fn items(&self) -> Vec<Record> {
        self.state.read().await.items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn last_params(&self) -> Params {
        self.state.read().await.last_params.clone()
    }

    pub async fn fetch_list(&self, params: Params) -> Result<()> {
        let fetch_id = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.last_params = params.clone();
        self.loading.store(true, Ordering::SeqCst);

        let result = self.client.list(&params).await;

        let mut state = self.state.write().await;
        let is_latest = self.latest_fetch.load(Ordering::SeqCst) == fetch_id;
        if is_latest {
            self.loading.store(false, Ordering::SeqCst);
        }

        let page = result?;
        if is_latest {
            state.items = page.into_items();
        } else {
            tracing::debug!(
                resource = self.client.resource(),
                fetch_id,
                "Discarding stale list response"
            );
        }
        Ok(())
    }

    /// Re-fetch with the last query
    pub async fn refresh(&self) -> Result<()> {
        let params = self.last_params().await;
        self.fetch_list(params).await
    }

    pub async fn create_item<T: Serialize + ?Sized + Sync>(&self, data: &T) -> Result<Record> {
        let created = self.client.create(data).await?;
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update_item<T: Serialize + ?Sized + Sync>(
        &self,
        id: impl Display,
        data: &T,
    ) -> Result<Record> {
        let updated = match self.update_method {
            UpdateMethod::Put => self.client.update(id, data).await?,
            UpdateMethod::Patch => self.client.patch(id, data).await?,
        };
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn delete_item(&self, id: impl Display) -> Result<()> {
        self.client.delete(id).await?;
        self.refresh().await
    }
}
