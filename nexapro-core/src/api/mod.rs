//! Resource clients for the NexaPro REST API
//!
//! Each domain resource gets a thin CRUD facade over [`ApiClient`]; resources
//! with extra backend actions wrap a [`ResourceClient`] and add them.

mod auth;
mod profiles;
mod resources;
mod subscriptions;

pub use auth::{AuthApi, TokenPair};
pub use profiles::ProfilesApi;
pub use resources::{BillsApi, SignedPartyApi, TenanciesApi, DEFAULT_DUE_DAY};
pub use subscriptions::SubscriptionsApi;

use crate::domain::{Page, Params, Record};
use crate::error::Result;
use crate::http::{ApiClient, ApiRequest, FilePart, MultipartForm};
use serde::Serialize;
use std::fmt::Display;

/// CRUD over `/<resource>/` and `/<resource>/<id>/`
#[derive(Clone)]
pub struct ResourceClient {
    client: ApiClient,
    resource: &'static str,
}

impl ResourceClient {
    pub fn new(client: ApiClient, resource: &'static str) -> Self {
        Self { client, resource }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn collection_path(&self) -> String {
        format!("/{}/", self.resource)
    }

    pub fn item_path(&self, id: impl Display) -> String {
        format!("/{}/{}/", self.resource, id)
    }

    pub async fn list(&self, params: &Params) -> Result<Page<Record>> {
        self.client
            .send_json(ApiRequest::get(self.collection_path()).query(params))
            .await
    }

    pub async fn get(&self, id: impl Display) -> Result<Record> {
        self.client
            .send_json(ApiRequest::get(self.item_path(id)))
            .await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, data: &T) -> Result<Record> {
        self.client
            .send_json(ApiRequest::post(self.collection_path()).json(data)?)
            .await
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        id: impl Display,
        data: &T,
    ) -> Result<Record> {
        self.client
            .send_json(ApiRequest::put(self.item_path(id)).json(data)?)
            .await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, id: impl Display, data: &T) -> Result<Record> {
        self.client
            .send_json(ApiRequest::patch(self.item_path(id)).json(data)?)
            .await
    }

    pub async fn delete(&self, id: impl Display) -> Result<()> {
        self.client
            .send(ApiRequest::delete(self.item_path(id)))
            .await?;
        Ok(())
    }

    /// Multipart PATCH of a single file, e.g. a signature image
    pub(crate) async fn upload(&self, id: impl Display, file: FilePart) -> Result<Record> {
        let form = MultipartForm::new().file(file);
        self.client
            .send_json(ApiRequest::patch(self.item_path(id)).multipart(form))
            .await
    }
}

/// All resource clients over one pipeline
#[derive(Clone)]
pub struct Api {
    pub auth: AuthApi,
    pub owners: SignedPartyApi,
    pub locations: ResourceClient,
    pub properties: ResourceClient,
    pub units: ResourceClient,
    pub tenants: SignedPartyApi,
    pub tenancies: TenanciesApi,
    pub bills: BillsApi,
    pub payments: ResourceClient,
    pub notifications: ResourceClient,
    pub profiles: ProfilesApi,
    pub subscriptions: SubscriptionsApi,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            owners: SignedPartyApi::new(ResourceClient::new(client.clone(), "owners")),
            locations: ResourceClient::new(client.clone(), "locations"),
            properties: ResourceClient::new(client.clone(), "properties"),
            units: ResourceClient::new(client.clone(), "units"),
            tenants: SignedPartyApi::new(ResourceClient::new(client.clone(), "tenants")),
            tenancies: TenanciesApi::new(ResourceClient::new(client.clone(), "tenancies")),
            bills: BillsApi::new(ResourceClient::new(client.clone(), "bills")),
            payments: ResourceClient::new(client.clone(), "payments"),
            notifications: ResourceClient::new(client.clone(), "notifications"),
            profiles: ProfilesApi::new(ResourceClient::new(client.clone(), "profiles")),
            subscriptions: SubscriptionsApi::new(client),
        }
    }

    /// Plain CRUD client for a resource by its path segment
    pub fn resource(&self, name: &str) -> Option<&ResourceClient> {
        let client = match name {
            "owners" => &*self.owners,
            "locations" => &self.locations,
            "properties" => &self.properties,
            "units" => &self.units,
            "tenants" => &*self.tenants,
            "tenancies" => &*self.tenancies,
            "bills" => &*self.bills,
            "payments" => &self.payments,
            "notifications" => &self.notifications,
            "profiles" => &*self.profiles,
            _ => return None,
        };
        Some(client)
    }
}
