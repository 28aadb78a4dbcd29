use super::IPushSubscriptionRepo;
use remind_domain::{PushSubscription, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresPushSubscriptionRepo {
    pool: PgPool,
}

impl PostgresPushSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PushSubscriptionRaw {
    subscription_uid: Uuid,
    owner_uid: Uuid,
    endpoint: String,
    auth_secret: String,
    encryption_key: String,
}

impl From<PushSubscriptionRaw> for PushSubscription {
    fn from(e: PushSubscriptionRaw) -> Self {
        Self {
            id: e.subscription_uid.into(),
            owner_id: e.owner_uid.into(),
            endpoint: e.endpoint,
            auth_secret: e.auth_secret,
            encryption_key: e.encryption_key,
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for PostgresPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO push_subscriptions
            (subscription_uid, owner_uid, endpoint, auth_secret, encryption_key)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (owner_uid, endpoint)
            DO UPDATE SET auth_secret = $4, encryption_key = $5
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(subscription.owner_id.inner_ref())
        .bind(&subscription.endpoint)
        .bind(&subscription.auth_secret)
        .bind(&subscription.encryption_key)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to upsert push subscription: {:?}. DB returned error: {:?}",
                subscription, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &ID) -> anyhow::Result<Vec<PushSubscription>> {
        let subscriptions: Vec<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM push_subscriptions
            WHERE owner_uid = $1
            "#,
        )
        .bind(owner_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find push subscriptions for owner: {:?} failed. DB returned error: {:?}",
                owner_id, e
            );
            e
        })?;
        Ok(subscriptions.into_iter().map(|s| s.into()).collect())
    }

    async fn delete_by_endpoint(&self, owner_id: &ID, endpoint: &str) -> Option<PushSubscription> {
        let res: Option<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            DELETE FROM push_subscriptions
            WHERE owner_uid = $1 AND endpoint = $2
            RETURNING *
            "#,
        )
        .bind(owner_id.inner_ref())
        .bind(endpoint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete push subscription for owner: {:?} failed. DB returned error: {:?}",
                owner_id, e
            );
            e
        })
        .ok()?;
        res.map(|s| s.into())
    }
}
