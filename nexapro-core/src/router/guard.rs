//! Pre-navigation guard

use super::routes::{NavigationRequest, RouteName, RouteTable, RouteTarget};
use crate::domain::Profile;
use crate::error::Result;
use crate::gate;
use crate::session::TokenStore;
use crate::telemetry::metrics::GUARD_REDIRECTS_TOTAL;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;

/// Supplies the current profile for feature checks, loading it if needed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn current_profile(&self) -> Option<Profile>;
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow(NavigationRequest),
    Redirect(RouteTarget),
}

pub struct RouteGuard {
    table: RouteTable,
    tokens: TokenStore,
    profiles: Arc<dyn ProfileSource>,
}

impl RouteGuard {
    pub fn new(table: RouteTable, tokens: TokenStore, profiles: Arc<dyn ProfileSource>) -> Self {
        Self {
            table,
            tokens,
            profiles,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide whether a transition to `target` may proceed.
    ///
    /// Authentication is read from the token store on every call. The auth
    /// stage runs first; the feature stage only applies to authenticated
    /// users.
    pub async fn evaluate(&self, target: &RouteTarget) -> Result<GuardDecision> {
        let route = self.table.resolve(target)?;
        let authenticated = self.tokens.is_authenticated().await;

        if route.requires_auth && !authenticated {
            let login = RouteTarget::named(RouteName::Login);
            return Ok(redirect(&route, login, "auth"));
        }
        if authenticated && route.is_auth_area() {
            return Ok(redirect(
                &route,
                RouteTarget::named(RouteName::Dashboard),
                "authenticated",
            ));
        }

        if let Some(feature) = route.required_feature.filter(|_| authenticated) {
            let profile = self.profiles.current_profile().await;
            if !gate::has_feature(profile.as_ref(), feature) {
                let to = RouteTarget::named(RouteName::SubscriptionPlans)
                    .with_query("upgrade", feature.as_str());
                return Ok(redirect(&route, to, "feature"));
            }
        }

        Ok(GuardDecision::Allow(route))
    }
}

fn redirect(from: &NavigationRequest, to: RouteTarget, stage: &'static str) -> GuardDecision {
    counter!(GUARD_REDIRECTS_TOTAL, "stage" => stage).increment(1);
    tracing::debug!(from = %from.path, to = %to, stage, "Guard redirect");
    GuardDecision::Redirect(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feature, Plan, Subscription};
    use crate::telemetry::metrics::testing::CapturingRecorder;

    fn guard(tokens: TokenStore, profile: Option<Profile>) -> RouteGuard {
        let mut profiles = MockProfileSource::new();
        profiles
            .expect_current_profile()
            .returning(move || profile.clone());
        RouteGuard::new(RouteTable::new(), tokens, Arc::new(profiles))
    }

    async fn logged_in() -> TokenStore {
        let tokens = TokenStore::in_memory();
        tokens.save("access", "refresh").await.unwrap();
        tokens
    }

    #[tokio::test]
    async fn test_public_routes_allowed_anonymously() {
        let guard = guard(TokenStore::in_memory(), None);
        let decision = guard
            .evaluate(&RouteTarget::path("/register"))
            .await
            .unwrap();
        let GuardDecision::Allow(route) = decision else {
            panic!("expected the register page to be allowed");
        };
        assert_eq!(route.name, RouteName::Register);
    }

    #[tokio::test]
    async fn test_feature_stage_skipped_for_anonymous() {
        let mut profiles = MockProfileSource::new();
        profiles.expect_current_profile().never();
        let guard = RouteGuard::new(
            RouteTable::new(),
            TokenStore::in_memory(),
            Arc::new(profiles),
        );

        let decision = guard
            .evaluate(&RouteTarget::named(RouteName::Bills))
            .await
            .unwrap();
        assert_eq!(
            decision,
            GuardDecision::Redirect(RouteTarget::named(RouteName::Login))
        );
    }

    #[tokio::test]
    async fn test_unrestricted_route_does_not_load_profile() {
        let mut profiles = MockProfileSource::new();
        profiles.expect_current_profile().never();
        let guard = RouteGuard::new(RouteTable::new(), logged_in().await, Arc::new(profiles));

        let decision = guard
            .evaluate(&RouteTarget::named(RouteName::Units))
            .await
            .unwrap();
        assert!(matches!(decision, GuardDecision::Allow(_)));
    }

    #[tokio::test]
    async fn test_feature_granted() {
        let profile = Profile {
            subscription: Some(Subscription {
                plan: Some(Plan {
                    name: "Pro".to_string(),
                    sms_notifications: true,
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let guard = guard(logged_in().await, Some(profile));

        let decision = guard
            .evaluate(&RouteTarget::named(RouteName::Notifications))
            .await
            .unwrap();
        match decision {
            GuardDecision::Allow(route) => {
                assert_eq!(route.required_feature, Some(Feature::SmsNotifications))
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn test_redirects_counted_with_describe_labels() {
        let recorder = CapturingRecorder::default();
        let route = RouteTable::new()
            .resolve(&RouteTarget::named(RouteName::Bills))
            .unwrap();

        metrics::with_local_recorder(&recorder, || {
            redirect(&route, RouteTarget::named(RouteName::Login), "auth");
            crate::telemetry::metrics::describe_metrics();
        });

        assert_eq!(
            recorder.label_keys(GUARD_REDIRECTS_TOTAL),
            vec!["stage".to_string(), "stage".to_string()]
        );
    }
}
