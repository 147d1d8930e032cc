//! Resources with backend actions beyond CRUD

use super::ResourceClient;
use crate::domain::Record;
use crate::error::Result;
use crate::http::{ApiRequest, ApiResponse, FilePart};
use chrono::NaiveDate;
use serde_json::json;
use std::fmt::Display;
use std::ops::Deref;

/// Default day of month bills fall due
pub const DEFAULT_DUE_DAY: u32 = 5;

/// Owners and tenants: CRUD plus signature upload
#[derive(Clone)]
pub struct SignedPartyApi {
    inner: ResourceClient,
}

impl SignedPartyApi {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }

    /// Upload a signature image as multipart `PATCH /<resource>/<id>/`.
    pub async fn upload_signature(&self, id: impl Display, signature: FilePart) -> Result<Record> {
        self.inner.upload(id, signature).await
    }
}

impl Deref for SignedPartyApi {
    type Target = ResourceClient;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Clone)]
pub struct TenanciesApi {
    inner: ResourceClient,
}

impl TenanciesApi {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }

    /// `PUT /tenancies/<id>/move-out/`
    pub async fn move_out(&self, id: impl Display, move_out_date: NaiveDate) -> Result<Record> {
        let path = format!("{}move-out/", self.inner.item_path(id));
        let body = json!({ "move_out_date": move_out_date.format("%Y-%m-%d").to_string() });
        self.inner
            .client()
            .send_json(ApiRequest::put(path).json(&body)?)
            .await
    }

    /// `GET /tenancies/<id>/generate-contract/`. The body may be a document,
    /// so the raw response is returned.
    pub async fn generate_contract(&self, id: impl Display) -> Result<ApiResponse> {
        let path = format!("{}generate-contract/", self.inner.item_path(id));
        self.inner.client().send(ApiRequest::get(path)).await
    }

    /// `POST /tenancies/<id>/send-reminder/`
    pub async fn send_reminder(&self, id: impl Display) -> Result<Record> {
        let path = format!("{}send-reminder/", self.inner.item_path(id));
        self.inner.client().send_json(ApiRequest::post(path)).await
    }
}

impl Deref for TenanciesApi {
    type Target = ResourceClient;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Clone)]
pub struct BillsApi {
    inner: ResourceClient,
}

impl BillsApi {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }

    /// `POST /bills/generate/` for a billing period such as `2026-10`.
    pub async fn generate(&self, billing_period: &str, due_day: u32) -> Result<Record> {
        let body = json!({ "billing_period": billing_period, "due_day": due_day });
        self.inner
            .client()
            .send_json(ApiRequest::post("/bills/generate/").json(&body)?)
            .await
    }

    /// `POST /bills/mark-overdue/`
    pub async fn mark_overdue(&self) -> Result<Record> {
        self.inner
            .client()
            .send_json(ApiRequest::post("/bills/mark-overdue/"))
            .await
    }
}

impl Deref for BillsApi {
    type Target = ResourceClient;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
