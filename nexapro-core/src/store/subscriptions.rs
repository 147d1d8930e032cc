//! Subscription plans, current subscription and payment history

use crate::api::SubscriptionsApi;
use crate::domain::{Plan, Record, Subscription, SubscriptionPayment, SubscriptionRequest};
use crate::error::{AppError, Result};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct SubscriptionState {
    plans: Vec<Plan>,
    current: Option<Subscription>,
    payments: Vec<SubscriptionPayment>,
    error: Option<String>,
}

pub struct SubscriptionsStore {
    api: SubscriptionsApi,
    state: RwLock<SubscriptionState>,
    loading: AtomicBool,
}

impl SubscriptionsStore {
    pub fn new(api: SubscriptionsApi) -> Self {
        Self {
            api,
            state: RwLock::new(SubscriptionState::default()),
            loading: AtomicBool::new(false),
        }
    }

    pub async fn plans(&self) -> Vec<Plan> {
        self.state.read().await.plans.clone()
    }

    pub async fn current_subscription(&self) -> Option<Subscription> {
        self.state.read().await.current.clone()
    }

    pub async fn payments(&self) -> Vec<SubscriptionPayment> {
        self.state.read().await.payments.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn fetch_plans(&self) -> Result<()> {
        self.begin().await;
        let result = self.api.plans().await;
        self.loading.store(false, Ordering::SeqCst);

        let mut state = self.state.write().await;
        match result {
            Ok(plans) => {
                state.plans = plans;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch plans");
                state.error = Some(message_of(&e, "Failed to fetch subscription plans"));
                Err(e)
            }
        }
    }

    /// Load the current subscription. Failures clear it silently: a user
    /// without a subscription is not an error.
    pub async fn fetch_current_subscription(&self) {
        self.begin().await;
        let result = self.api.current().await;
        self.loading.store(false, Ordering::SeqCst);

        let current = result.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No current subscription");
            None
        });
        self.state.write().await.current = current;
    }

    pub async fn upgrade_subscription(&self, request: &SubscriptionRequest) -> Result<Record> {
        self.begin().await;
        let result = self.api.upgrade(request).await;
        self.after_change(result, "Failed to upgrade subscription")
            .await
    }

    pub async fn renew_subscription(&self, request: &SubscriptionRequest) -> Result<Record> {
        self.begin().await;
        let result = self.api.renew(request).await;
        self.after_change(result, "Failed to renew subscription")
            .await
    }

    pub async fn fetch_payment_history(&self) -> Result<()> {
        self.begin().await;
        let result = self.api.payment_history().await;
        self.loading.store(false, Ordering::SeqCst);

        let mut state = self.state.write().await;
        match result {
            Ok(payments) => {
                state.payments = payments;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch payment history");
                state.error = Some(message_of(&e, "Failed to fetch payment history"));
                Err(e)
            }
        }
    }

    /// Poll a single payment; `None` when it cannot be read.
    pub async fn check_payment_status(
        &self,
        payment_id: impl Display,
    ) -> Option<SubscriptionPayment> {
        match self.api.payment(payment_id).await {
            Ok(payment) => Some(payment),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to check payment status");
                None
            }
        }
    }

    pub async fn is_subscribed(&self) -> bool {
        self.current_subscription().await.is_some_and(|s| {
            s.is_active && !s.is_expired && s.days_remaining > 0
        })
    }

    pub async fn is_expired(&self) -> bool {
        self.current_subscription()
            .await
            .is_some_and(|s| s.is_expired || s.days_remaining <= 0)
    }

    pub async fn current_plan(&self) -> Option<Plan> {
        self.current_subscription().await.and_then(|s| s.plan)
    }

    pub async fn free_plan(&self) -> Option<Plan> {
        self.state
            .read()
            .await
            .plans
            .iter()
            .find(|p| p.is_free_tier)
            .cloned()
    }

    pub async fn paid_plans(&self) -> Vec<Plan> {
        self.state
            .read()
            .await
            .plans
            .iter()
            .filter(|p| !p.is_free_tier)
            .cloned()
            .collect()
    }

    async fn begin(&self) {
        self.loading.store(true, Ordering::SeqCst);
        self.state.write().await.error = None;
    }

    async fn after_change(&self, result: Result<Record>, fallback: &str) -> Result<Record> {
        match result {
            Ok(record) => {
                self.fetch_current_subscription().await;
                Ok(record)
            }
            Err(e) => {
                self.loading.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "{}", fallback);
                self.state.write().await.error = Some(message_of(&e, fallback));
                Err(e)
            }
        }
    }
}

/// Backend `error` or `message` text, then `detail`, then the fallback
fn message_of(error: &AppError, fallback: &str) -> String {
    let body_text = match error {
        AppError::Validation { body, .. } | AppError::Api { body, .. } => ["error", "message"]
            .iter()
            .find_map(|key| body.get(key).and_then(|v| v.as_str()))
            .map(str::to_owned),
        _ => None,
    };
    body_text
        .or_else(|| error.detail())
        .unwrap_or_else(|| fallback.to_string())
}
