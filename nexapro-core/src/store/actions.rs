//! Stores for resources with backend actions

use super::resource::{ResourceStore, UpdateMethod};
use crate::api::{BillsApi, TenanciesApi};
use crate::domain::Record;
use crate::error::Result;
use chrono::NaiveDate;
use std::fmt::Display;
use std::ops::Deref;

pub struct TenanciesStore {
    api: TenanciesApi,
    list: ResourceStore,
}

impl TenanciesStore {
    pub fn new(api: TenanciesApi) -> Self {
        let list = ResourceStore::new((*api).clone(), UpdateMethod::Put);
        Self { api, list }
    }

    pub async fn move_out(&self, id: impl Display, move_out_date: NaiveDate) -> Result<Record> {
        let record = self.api.move_out(id, move_out_date).await?;
        self.list.refresh().await?;
        Ok(record)
    }
}

impl Deref for TenanciesStore {
    type Target = ResourceStore;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

pub struct BillsStore {
    api: BillsApi,
    list: ResourceStore,
}

impl BillsStore {
    pub fn new(api: BillsApi) -> Self {
        let list = ResourceStore::new((*api).clone(), UpdateMethod::Put);
        Self { api, list }
    }

    /// Generate bills for a period, then re-fetch. Returns the backend summary.
    pub async fn generate(&self, billing_period: &str, due_day: u32) -> Result<Record> {
        let summary = self.api.generate(billing_period, due_day).await?;
        self.list.refresh().await?;
        Ok(summary)
    }

    pub async fn mark_overdue(&self) -> Result<()> {
        self.api.mark_overdue().await?;
        self.list.refresh().await
    }
}

impl Deref for BillsStore {
    type Target = ResourceStore;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
