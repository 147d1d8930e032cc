//! Common test utilities

#![allow(dead_code)]

use nexapro_core::config::Config;
use nexapro_core::session::MemoryStorage;
use nexapro_core::ui::RecordingUi;
use nexapro_core::AppContext;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// How long the session-expired notice stays up in tests
pub const NOTICE_DURATION: Duration = Duration::from_millis(10);

pub struct TestContext {
    pub server: MockServer,
    pub ctx: AppContext,
    pub ui: Arc<RecordingUi>,
}

pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::new(base_url);
    config.request_timeout = Duration::from_secs(5);
    config.session_notice_duration = NOTICE_DURATION;
    config
}

/// Context against a fresh mock backend, with in-memory session storage
pub async fn setup() -> TestContext {
    setup_with(RecordingUi::new()).await
}

pub async fn setup_with(ui: Arc<RecordingUi>) -> TestContext {
    let server = MockServer::start().await;
    let ctx = AppContext::with_storage(
        create_test_config(&server.uri()),
        Arc::new(MemoryStorage::new()),
        ui.ui(),
    )
    .expect("context");
    TestContext { server, ctx, ui }
}

/// Context that already holds a token pair
pub async fn setup_logged_in() -> TestContext {
    let test = setup().await;
    test.ctx
        .tokens()
        .save("access-token", "refresh-token")
        .await
        .expect("save tokens");
    test
}

pub fn plan_json(name: &str, payment_tracking: bool, sms_notifications: bool) -> Value {
    json!({
        "id": 2,
        "name": name,
        "description": "",
        "price": "1500.00",
        "currency": "KES",
        "duration_days": 30,
        "max_properties": 5,
        "max_units": 50,
        "max_tenants": 50,
        "sms_notifications": sms_notifications,
        "contract_generation": false,
        "payment_tracking": payment_tracking,
        "reports_analytics": false,
        "priority_support": false,
        "is_active": true,
        "is_free_tier": false
    })
}

pub fn profile_json(plan: Value, status: &str) -> Value {
    json!({
        "id": 1,
        "owner": { "id": 7, "name": "Amina Njeri" },
        "subscription": {
            "id": 3,
            "plan": plan,
            "status": status,
            "days_remaining": 20,
            "auto_renew": false,
            "is_active": status == "active",
            "is_expired": status == "expired"
        }
    })
}
