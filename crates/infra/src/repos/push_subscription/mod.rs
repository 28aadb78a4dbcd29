mod inmemory;
mod postgres;

pub use inmemory::InMemoryPushSubscriptionRepo;
pub use postgres::PostgresPushSubscriptionRepo;
use remind_domain::{PushSubscription, ID};

#[async_trait::async_trait]
pub trait IPushSubscriptionRepo: Send + Sync {
    /// Insert the subscription, or refresh the key material of the
    /// existing record for the same `(owner_id, endpoint)` pair
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<()>;
    async fn find_by_owner(&self, owner_id: &ID) -> anyhow::Result<Vec<PushSubscription>>;
    async fn delete_by_endpoint(&self, owner_id: &ID, endpoint: &str) -> Option<PushSubscription>;
}
