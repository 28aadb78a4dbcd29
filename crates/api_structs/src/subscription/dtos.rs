use remind_domain::{PushSubscription, ID};
use serde::{Deserialize, Serialize};

/// Key material is write-only: it is accepted at subscribe time but
/// never echoed back to clients.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionDTO {
    pub id: ID,
    pub endpoint: String,
}

impl PushSubscriptionDTO {
    pub fn new(subscription: PushSubscription) -> Self {
        Self {
            id: subscription.id.clone(),
            endpoint: subscription.endpoint,
        }
    }
}
