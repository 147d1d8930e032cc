//! Subscription endpoints

use crate::domain::{Page, Plan, Record, Subscription, SubscriptionPayment, SubscriptionRequest};
use crate::error::Result;
use crate::http::{ApiClient, ApiRequest};
use serde::Deserialize;
use std::fmt::Display;

/// `GET /subscriptions/current/` answers with an object or a one-element list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CurrentSubscription {
    Many(Vec<Subscription>),
    One(Box<Subscription>),
    Empty(Option<()>),
}

#[derive(Clone)]
pub struct SubscriptionsApi {
    client: ApiClient,
}

impl SubscriptionsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn plans(&self) -> Result<Vec<Plan>> {
        let page: Page<Plan> = self
            .client
            .send_json(ApiRequest::get("/subscriptions/plans/"))
            .await?;
        Ok(page.into_items())
    }

    pub async fn current(&self) -> Result<Option<Subscription>> {
        let current: CurrentSubscription = self
            .client
            .send_json(ApiRequest::get("/subscriptions/current/"))
            .await?;
        Ok(match current {
            CurrentSubscription::Many(list) => list.into_iter().next(),
            CurrentSubscription::One(sub) => Some(*sub),
            CurrentSubscription::Empty(_) => None,
        })
    }

    pub async fn upgrade(&self, request: &SubscriptionRequest) -> Result<Record> {
        self.client
            .send_json(ApiRequest::post("/subscriptions/upgrade/").json(request)?)
            .await
    }

    pub async fn renew(&self, request: &SubscriptionRequest) -> Result<Record> {
        self.client
            .send_json(ApiRequest::post("/subscriptions/renew/").json(request)?)
            .await
    }

    pub async fn payment_history(&self) -> Result<Vec<SubscriptionPayment>> {
        let page: Page<SubscriptionPayment> = self
            .client
            .send_json(ApiRequest::get("/subscriptions/payments/"))
            .await?;
        Ok(page.into_items())
    }

    pub async fn payment(&self, id: impl Display) -> Result<SubscriptionPayment> {
        self.client
            .send_json(ApiRequest::get(format!("/subscriptions/payments/{}/", id)))
            .await
    }
}
