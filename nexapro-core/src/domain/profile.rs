//! Current user profile

use super::subscription::{Feature, Subscription};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Owner the profile manages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Logged-in user's profile as returned by `GET /profiles/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    /// Server-computed feature permissions; take precedence over plan flags
    #[serde(default)]
    pub permissions: Option<HashMap<String, bool>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    /// Explicit permission for a feature, when the backend sent one
    pub fn permission(&self, feature: Feature) -> Option<bool> {
        self.permissions
            .as_ref()
            .and_then(|p| p.get(feature.as_str()).copied())
    }

    pub fn owner_id(&self) -> Option<i64> {
        self.owner.as_ref().map(|o| o.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_deserializes_with_extra_fields() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 7,
            "username": "jane",
            "owner": {"id": 3, "name": "Jane Properties"},
            "subscription": {
                "status": "active",
                "days_remaining": 12,
                "plan": {"name": "Pro", "payment_tracking": true}
            },
            "permissions": {"sms_notifications": false}
        }))
        .unwrap();

        assert_eq!(profile.owner_id(), Some(3));
        assert_eq!(profile.extra.get("username"), Some(&json!("jane")));
        assert_eq!(profile.permission(Feature::SmsNotifications), Some(false));
        assert_eq!(profile.permission(Feature::PaymentTracking), None);
        assert_eq!(profile.subscription.unwrap().days_remaining, 12);
    }

    #[test]
    fn test_empty_profile() {
        let profile: Profile = serde_json::from_value(json!({})).unwrap();
        assert!(profile.owner.is_none());
        assert!(profile.subscription.is_none());
    }
}
