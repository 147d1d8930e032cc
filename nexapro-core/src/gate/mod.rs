//! Subscription feature gating
//!
//! Answers "may the current user do this?" from the cached profile and turns
//! subscription-related API failures into upgrade prompts.

use crate::domain::{Feature, Plan, Profile, Subscription};
use crate::error::AppError;
use crate::router::{RouteName, RouteTarget};
use crate::ui::{Notice, Ui};

const DEFAULT_ACTION: &str = "perform this action";

/// Expired by status or by the explicit flag. No subscription is not expired.
pub fn is_expired(profile: Option<&Profile>) -> bool {
    subscription_of(profile).is_some_and(Subscription::is_expired)
}

/// Whether the profile may use `feature`.
///
/// An expired subscription allows nothing. Otherwise a server-supplied
/// permission wins over the plan flag; no profile or no plan allows nothing.
pub fn has_feature(profile: Option<&Profile>, feature: Feature) -> bool {
    if is_expired(profile) {
        return false;
    }
    let Some(profile) = profile else {
        return false;
    };
    if let Some(allowed) = profile.permission(feature) {
        return allowed;
    }
    plan_of(Some(profile)).is_some_and(|plan| plan.allows(feature))
}

fn subscription_of(profile: Option<&Profile>) -> Option<&Subscription> {
    profile.and_then(|p| p.subscription.as_ref())
}

fn plan_of(profile: Option<&Profile>) -> Option<&Plan> {
    subscription_of(profile).and_then(|s| s.plan.as_ref())
}

fn plans_route() -> RouteTarget {
    RouteTarget::named(RouteName::SubscriptionPlans)
}

/// Gate over a snapshot of the current profile
#[derive(Clone)]
pub struct SubscriptionGate {
    profile: Option<Profile>,
    ui: Ui,
}

impl SubscriptionGate {
    pub fn new(profile: Option<Profile>, ui: Ui) -> Self {
        Self { profile, ui }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        subscription_of(self.profile())
    }

    pub fn plan(&self) -> Option<&Plan> {
        plan_of(self.profile())
    }

    pub fn is_expired(&self) -> bool {
        is_expired(self.profile())
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        has_feature(self.profile(), feature)
    }

    pub fn days_remaining(&self) -> i64 {
        self.subscription().map_or(0, |s| s.days_remaining)
    }

    pub fn is_free_tier(&self) -> bool {
        self.plan().is_some_and(|p| p.is_free_tier)
    }

    // Quantity limits are enforced by the backend; client-side only expiry blocks creation.

    pub fn can_create_property(&self) -> bool {
        !self.is_expired()
    }

    pub fn can_create_unit(&self) -> bool {
        !self.is_expired()
    }

    pub fn can_create_tenant(&self) -> bool {
        !self.is_expired()
    }

    /// `true` when the feature is available. Otherwise prompts for an
    /// upgrade and opens the plans screen with `upgrade=<feature>`.
    pub fn require_feature(&self, feature: Feature) -> bool {
        if self.has_feature(feature) {
            return true;
        }
        tracing::info!(feature = %feature, "Feature not in plan");
        self.ui.notify(Notice::info(format!(
            "{} is not included in your plan. Upgrade to unlock it.",
            feature.label()
        )));
        self.ui
            .navigate(plans_route().with_query("upgrade", feature.as_str()));
        false
    }

    /// `true` unless the subscription has expired. An expired subscription
    /// asks whether to upgrade and opens the plans screen on acceptance.
    pub fn check_subscription_access(&self, action: Option<&str>) -> bool {
        if !self.is_expired() {
            return true;
        }
        let plan_name = self.plan().map_or("subscription", |p| p.name.as_str());
        let message = format!(
            "Your {} has expired. Please upgrade to {}.",
            plan_name,
            action.unwrap_or(DEFAULT_ACTION)
        );
        if self
            .ui
            .confirm(&format!("{}\n\nClick OK to upgrade now.", message))
        {
            self.ui.navigate(plans_route());
        }
        false
    }

    pub fn handle_limit_error(&self, message: &str) {
        if self
            .ui
            .confirm(&format!("{}\n\nClick OK to view available plans.", message))
        {
            self.ui.navigate(plans_route());
        }
    }

    /// Route a failed API call through the subscription flows.
    ///
    /// Returns `true` when the error was a 403 and has been dealt with.
    pub fn handle_api_error(&self, error: &AppError) -> bool {
        let AppError::Forbidden(detail) = error else {
            return false;
        };
        tracing::debug!(detail = %detail, "Handling forbidden response");

        if detail.contains("expired") || detail.contains("subscription") {
            self.check_subscription_access(None);
        } else if detail.contains("limit") {
            self.handle_limit_error(detail);
        } else {
            self.ui.notify(Notice::error(detail.clone()));
        }
        true
    }
}
