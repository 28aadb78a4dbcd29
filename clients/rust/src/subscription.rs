use crate::base::{APIError, APIResponse, BaseClient};
use crate::push_manager::{DeviceSubscription, IPushApi};
use remind_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SubscriptionClient {
    base: Arc<BaseClient>,
}

impl SubscriptionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn get_key(&self) -> APIResponse<get_push_key::APIResponse> {
        self.base.get("push/key".into(), StatusCode::OK).await
    }

    pub async fn create(
        &self,
        endpoint: String,
        auth_secret: String,
        encryption_key: String,
    ) -> APIResponse<create_push_subscription::APIResponse> {
        let body = create_push_subscription::RequestBody {
            endpoint,
            auth_secret,
            encryption_key,
        };
        self.base
            .put(body, "push/subscriptions".into(), StatusCode::CREATED)
            .await
    }

    pub async fn delete(
        &self,
        endpoint: String,
    ) -> APIResponse<delete_push_subscription::APIResponse> {
        let body = delete_push_subscription::RequestBody { endpoint };
        self.base
            .delete_with_body(body, "push/subscriptions".into(), StatusCode::OK)
            .await
    }
}

#[async_trait::async_trait]
impl IPushApi for SubscriptionClient {
    async fn get_key(&self) -> Result<String, APIError> {
        let res = SubscriptionClient::get_key(self).await?;
        Ok(res.public_key)
    }

    async fn persist(&self, subscription: &DeviceSubscription) -> Result<(), APIError> {
        SubscriptionClient::create(
            self,
            subscription.endpoint.clone(),
            subscription.auth_secret.clone(),
            subscription.encryption_key.clone(),
        )
        .await?;
        Ok(())
    }

    async fn remove(&self, endpoint: &str) -> Result<(), APIError> {
        SubscriptionClient::delete(self, endpoint.to_string()).await?;
        Ok(())
    }
}
