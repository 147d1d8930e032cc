//! Guarded navigation scenarios

mod common;

use common::{plan_json, profile_json, setup, setup_logged_in};
use nexapro_core::domain::{Feature, Params, SubscriptionRequest};
use nexapro_core::router::{GuardDecision, RouteName, RouteTarget};
use nexapro_core::AppError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_profile(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/profiles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[rstest]
#[case("/admin")]
#[case("/admin/units")]
#[case("/admin/bills")]
#[case("/admin/properties/4")]
#[case("/admin/subscription/upgrade")]
#[tokio::test]
async fn test_protected_routes_redirect_to_login(#[case] target: &str) {
    let test = setup().await;

    let decision = test
        .ctx
        .router()
        .guard()
        .evaluate(&RouteTarget::path(target))
        .await
        .unwrap();

    assert_eq!(
        decision,
        GuardDecision::Redirect(RouteTarget::named(RouteName::Login))
    );
}

#[tokio::test]
async fn test_anonymous_push_lands_on_login() {
    let test = setup().await;

    let route = test
        .ctx
        .router()
        .push(RouteTarget::named(RouteName::Tenancies))
        .await
        .unwrap();

    assert_eq!(route.name, RouteName::Login);
    assert_eq!(
        test.ctx.router().current().await.map(|r| r.path),
        Some("/auth/login".to_string())
    );
}

#[rstest]
#[case("/auth")]
#[case("/auth/login")]
#[case("/login")]
#[tokio::test]
async fn test_authenticated_user_leaves_auth_area(#[case] target: &str) {
    let test = setup_logged_in().await;

    let route = test
        .ctx
        .router()
        .push(RouteTarget::path(target))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Dashboard);
}

#[tokio::test]
async fn test_missing_payment_tracking_redirects_to_plans() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Basic", false, true), "active");
    mount_profile(&test.server, profile).await;

    let guard = test.ctx.router().guard();
    let decision = guard
        .evaluate(&RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(
        decision,
        GuardDecision::Redirect(
            RouteTarget::named(RouteName::SubscriptionPlans)
                .with_query("upgrade", "payment_tracking")
        )
    );

    let route = test
        .ctx
        .router()
        .push(RouteTarget::path("/admin/payments"))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);
    assert_eq!(
        route.query.get("upgrade").map(String::as_str),
        Some("payment_tracking")
    );
}

#[tokio::test]
async fn test_missing_sms_redirects_to_plans() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Basic", true, false), "active");
    mount_profile(&test.server, profile).await;

    let decision = test
        .ctx
        .router()
        .guard()
        .evaluate(&RouteTarget::named(RouteName::Notifications))
        .await
        .unwrap();

    let GuardDecision::Redirect(target) = decision else {
        panic!("expected a redirect");
    };
    assert_eq!(
        target.to_string(),
        "subscription-plans?upgrade=sms_notifications"
    );
}

#[tokio::test]
async fn test_expired_subscription_blocks_features() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Pro", true, true), "expired");
    mount_profile(&test.server, profile).await;

    let route = test
        .ctx
        .router()
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);
}

#[tokio::test]
async fn test_permissions_override_plan_flags() {
    let test = setup_logged_in().await;
    let mut profile = profile_json(plan_json("Basic", false, false), "active");
    profile["permissions"] = json!({"payment_tracking": true});
    mount_profile(&test.server, profile).await;

    let route = test
        .ctx
        .router()
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Bills);
}

#[tokio::test]
async fn test_profile_loaded_once_for_feature_checks() {
    let test = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/profiles/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(profile_json(plan_json("Pro", true, true), "active")),
        )
        .expect(1)
        .mount(&test.server)
        .await;

    let router = test.ctx.router();
    router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    router
        .push(RouteTarget::named(RouteName::Notifications))
        .await
        .unwrap();
    router
        .push(RouteTarget::named(RouteName::Payments))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unreadable_profile_denies_features() {
    let test = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/profiles/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test.server)
        .await;

    let route = test
        .ctx
        .router()
        .push(RouteTarget::named(RouteName::Payments))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);
}

#[tokio::test]
async fn test_login_then_dashboard() {
    let test = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "access-token", "refresh": "refresh-token"
        })))
        .expect(1)
        .mount(&test.server)
        .await;
    let profile = profile_json(plan_json("Basic", true, false), "active");
    mount_profile(&test.server, profile).await;

    test.ctx.login("amina", "s3cret").await.unwrap();
    assert!(test.ctx.tokens().is_authenticated().await);

    let route = test
        .ctx
        .router()
        .push(RouteTarget::named(RouteName::Admin))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Dashboard);

    test.ctx.logout().await.unwrap();
    let route = test
        .ctx
        .router()
        .push(RouteTarget::named(RouteName::Dashboard))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Login);
}

#[tokio::test]
async fn test_unknown_paths_fall_back_home() {
    let test = setup().await;

    let route = test
        .ctx
        .router()
        .push(RouteTarget::path("/definitely/not/here"))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Home);
}

async fn mount_profile_once(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/profiles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "second-access", "refresh": "second-refresh"
        })))
        .mount(server)
        .await;
}

fn upgrade_request() -> SubscriptionRequest {
    SubscriptionRequest {
        plan_id: 2,
        account_number: "254700000000".to_string(),
        provider: "mpesa".to_string(),
    }
}

#[tokio::test]
async fn test_expired_session_does_not_leak_previous_profile() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Pro", true, true), "active");
    mount_profile_once(&test.server, profile).await;

    Mock::given(method("GET"))
        .and(path("/profiles/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/units/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&test.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&test.server)
        .await;

    mount_login(&test.server).await;

    let router = test.ctx.router();
    let route = router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Bills);

    let err = test
        .ctx
        .stores()
        .units
        .fetch_list(Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SessionExpired));
    assert!(test.ctx.stores().profiles.profile().await.is_none());

    test.ctx.login("second-user", "s3cret").await.unwrap();

    let route = router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);
}

#[tokio::test]
async fn test_store_login_invalidates_cached_profile() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Pro", true, true), "active");
    mount_profile_once(&test.server, profile).await;
    let profile = profile_json(plan_json("Free", false, false), "active");
    mount_profile(&test.server, profile).await;
    mount_login(&test.server).await;

    let router = test.ctx.router();
    let route = router
        .push(RouteTarget::named(RouteName::Payments))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Payments);

    test.ctx
        .stores()
        .auth
        .login("second-user", "s3cret")
        .await
        .unwrap();

    let route = router
        .push(RouteTarget::named(RouteName::Payments))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);
}

#[tokio::test]
async fn test_upgrade_unlocks_gated_routes() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Basic", false, false), "active");
    mount_profile_once(&test.server, profile).await;
    let profile = profile_json(plan_json("Pro", true, true), "active");
    mount_profile(&test.server, profile).await;

    Mock::given(method("POST"))
        .and(path("/subscriptions/upgrade/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed"
        })))
        .expect(1)
        .mount(&test.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/current/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "plan": plan_json("Pro", true, true), "status": "active",
            "days_remaining": 30, "is_active": true, "is_expired": false
        })))
        .mount(&test.server)
        .await;

    let router = test.ctx.router();
    let route = router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);

    test.ctx
        .upgrade_subscription(&upgrade_request())
        .await
        .unwrap();

    let route = router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Bills);
    let gate = test.ctx.gate().await;
    assert!(gate.has_feature(Feature::SmsNotifications));
}

#[tokio::test]
async fn test_renew_with_failed_reload_refetches_on_navigation() {
    let test = setup_logged_in().await;
    let profile = profile_json(plan_json("Pro", true, true), "expired");
    mount_profile_once(&test.server, profile).await;

    Mock::given(method("GET"))
        .and(path("/profiles/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&test.server)
        .await;
    let profile = profile_json(plan_json("Pro", true, true), "active");
    mount_profile(&test.server, profile).await;

    Mock::given(method("POST"))
        .and(path("/subscriptions/renew/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed"
        })))
        .expect(1)
        .mount(&test.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions/current/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&test.server)
        .await;

    let router = test.ctx.router();
    let route = router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::SubscriptionPlans);

    test.ctx
        .renew_subscription(&upgrade_request())
        .await
        .unwrap();
    assert!(test.ctx.stores().profiles.profile().await.is_none());

    let route = router
        .push(RouteTarget::named(RouteName::Bills))
        .await
        .unwrap();
    assert_eq!(route.name, RouteName::Bills);
}
