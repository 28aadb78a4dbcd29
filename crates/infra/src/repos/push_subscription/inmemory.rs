use super::IPushSubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use remind_domain::{PushSubscription, ID};

pub struct InMemoryPushSubscriptionRepo {
    subscriptions: std::sync::Mutex<Vec<PushSubscription>>,
}

impl InMemoryPushSubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for InMemoryPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        let existing = find_and_delete_by(&self.subscriptions, |s: &PushSubscription| {
            s.owner_id == subscription.owner_id && s.endpoint == subscription.endpoint
        });
        let mut refreshed = subscription.clone();
        if let Some(old) = existing.into_iter().next() {
            refreshed.id = old.id;
        }
        insert(&refreshed, &self.subscriptions);
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &ID) -> anyhow::Result<Vec<PushSubscription>> {
        Ok(find_by(&self.subscriptions, |s: &PushSubscription| {
            s.owner_id == *owner_id
        }))
    }

    async fn delete_by_endpoint(&self, owner_id: &ID, endpoint: &str) -> Option<PushSubscription> {
        find_and_delete_by(&self.subscriptions, |s: &PushSubscription| {
            s.owner_id == *owner_id && s.endpoint == endpoint
        })
        .into_iter()
        .next()
    }
}
