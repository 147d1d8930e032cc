//! Subscription plan and feature domain models

use serde::{Deserialize, Serialize};

/// Capability gated by the subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    SmsNotifications,
    ContractGeneration,
    PaymentTracking,
    ReportsAnalytics,
    PrioritySupport,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::SmsNotifications,
        Feature::ContractGeneration,
        Feature::PaymentTracking,
        Feature::ReportsAnalytics,
        Feature::PrioritySupport,
    ];

    /// Wire key, also used as the `upgrade` query value
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::SmsNotifications => "sms_notifications",
            Feature::ContractGeneration => "contract_generation",
            Feature::PaymentTracking => "payment_tracking",
            Feature::ReportsAnalytics => "reports_analytics",
            Feature::PrioritySupport => "priority_support",
        }
    }

    /// Name shown in upgrade prompts
    pub fn label(&self) -> &'static str {
        match self {
            Feature::SmsNotifications => "SMS notifications",
            Feature::ContractGeneration => "Contract generation",
            Feature::PaymentTracking => "Payment tracking",
            Feature::ReportsAnalytics => "Reports & analytics",
            Feature::PrioritySupport => "Priority support",
        }
    }
}

impl std::str::FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription plan with its limits and feature flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub duration_days: i64,
    /// Advisory only; the backend enforces limits
    #[serde(default)]
    pub max_properties: i64,
    #[serde(default)]
    pub max_units: i64,
    #[serde(default)]
    pub max_tenants: i64,
    #[serde(default)]
    pub sms_notifications: bool,
    #[serde(default)]
    pub contract_generation: bool,
    #[serde(default)]
    pub payment_tracking: bool,
    #[serde(default)]
    pub reports_analytics: bool,
    #[serde(default)]
    pub priority_support: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_free_tier: bool,
    #[serde(default)]
    pub is_popular: Option<bool>,
}

impl Plan {
    /// Plan flag for a feature
    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::SmsNotifications => self.sms_notifications,
            Feature::ContractGeneration => self.contract_generation,
            Feature::PaymentTracking => self.payment_tracking,
            Feature::ReportsAnalytics => self.reports_analytics,
            Feature::PrioritySupport => self.priority_support,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Expired,
    Pending,
    #[serde(other)]
    Unknown,
}

/// The owner's current subscription, derived from backend state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub days_remaining: i64,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_expired: bool,
}

impl Subscription {
    /// Expired by status or by the explicit flag
    pub fn is_expired(&self) -> bool {
        self.is_expired || self.status == SubscriptionStatus::Expired
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Payment made towards a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPayment {
    pub id: i64,
    #[serde(default)]
    pub subscription: Option<i64>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub provider: String,
}

/// Body of upgrade and renew requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub plan_id: i64,
    pub account_number: String,
    pub provider: String,
}
