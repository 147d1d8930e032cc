//! Domain models shared by the API clients, stores and subscription gate

pub mod page;
pub mod payload;
pub mod profile;
pub mod subscription;
pub mod validators;

pub use page::Page;
pub use payload::{build_payload, entity_id};
pub use profile::{OwnerRef, Profile};
pub use subscription::{
    Feature, PaymentStatus, Plan, Subscription, SubscriptionPayment, SubscriptionRequest,
    SubscriptionStatus,
};

use std::collections::BTreeMap;

/// Query parameters for list requests
pub type Params = BTreeMap<String, String>;

/// A loosely typed backend record, as returned by list endpoints
pub type Record = serde_json::Value;
