//! Client-side caches over the resource clients

mod actions;
mod auth;
mod profiles;
mod resource;
mod subscriptions;

pub use actions::{BillsStore, TenanciesStore};
pub use auth::AuthStore;
pub use profiles::ProfilesStore;
pub use resource::{ResourceStore, UpdateMethod};
pub use subscriptions::SubscriptionsStore;

use crate::api::Api;
use crate::domain::Profile;
use crate::router::ProfileSource;
use async_trait::async_trait;

/// One store per resource, sharing a single request pipeline
pub struct Stores {
    pub auth: AuthStore,
    pub owners: ResourceStore,
    pub locations: ResourceStore,
    pub properties: ResourceStore,
    pub units: ResourceStore,
    pub tenants: ResourceStore,
    pub tenancies: TenanciesStore,
    pub bills: BillsStore,
    pub payments: ResourceStore,
    pub notifications: ResourceStore,
    pub profiles: ProfilesStore,
    pub subscriptions: SubscriptionsStore,
}

impl Stores {
    pub fn new(api: &Api) -> Self {
        let tokens = api.auth.tokens().clone();
        Self {
            auth: AuthStore::new(api.auth.clone(), tokens),
            owners: ResourceStore::new((*api.owners).clone(), UpdateMethod::Put),
            locations: ResourceStore::new(api.locations.clone(), UpdateMethod::Put),
            properties: ResourceStore::new(api.properties.clone(), UpdateMethod::Put),
            units: ResourceStore::new(api.units.clone(), UpdateMethod::Patch),
            tenants: ResourceStore::new((*api.tenants).clone(), UpdateMethod::Put),
            tenancies: TenanciesStore::new(api.tenancies.clone()),
            bills: BillsStore::new(api.bills.clone()),
            payments: ResourceStore::new(api.payments.clone(), UpdateMethod::Put),
            notifications: ResourceStore::new(api.notifications.clone(), UpdateMethod::Put),
            profiles: ProfilesStore::new(api.profiles.clone()),
            subscriptions: SubscriptionsStore::new(api.subscriptions.clone()),
        }
    }

    /// List store for a resource by its path segment
    pub fn list(&self, resource: &str) -> Option<&ResourceStore> {
        let store = match resource {
            "owners" => &self.owners,
            "locations" => &self.locations,
            "properties" => &self.properties,
            "units" => &self.units,
            "tenants" => &self.tenants,
            "tenancies" => &*self.tenancies,
            "bills" => &*self.bills,
            "payments" => &self.payments,
            "notifications" => &self.notifications,
            "profiles" => &*self.profiles,
            _ => return None,
        };
        Some(store)
    }
}

#[async_trait]
impl ProfileSource for Stores {
    async fn current_profile(&self) -> Option<Profile> {
        self.profiles.ensure_current_profile().await
    }
}
