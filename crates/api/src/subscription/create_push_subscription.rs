use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::create_push_subscription::*;
use remind_api_structs::dtos::PushSubscriptionDTO;
use remind_domain::{PushSubscription, ID};
use remind_infra::Context;

pub async fn create_push_subscription_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreatePushSubscriptionUseCase {
        owner_id,
        endpoint: body.endpoint,
        auth_secret: body.auth_secret,
        encryption_key: body.encryption_key,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| {
            HttpResponse::Created().json(APIResponse {
                subscription: PushSubscriptionDTO::new(subscription),
            })
        })
        .map_err(RemindError::from)
}

/// Registers one device of the calling user for push delivery. A device
/// subscribing again with the same endpoint refreshes its key material
/// instead of creating a duplicate, which also heals a record that went
/// missing server side.
#[derive(Debug)]
pub struct CreatePushSubscriptionUseCase {
    pub owner_id: ID,
    pub endpoint: String,
    pub auth_secret: String,
    pub encryption_key: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidSubscription(String),
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidSubscription(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreatePushSubscriptionUseCase {
    type Response = PushSubscription;

    type Error = UseCaseError;

    const NAME: &'static str = "CreatePushSubscription";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let subscription = PushSubscription::new(
            self.owner_id.clone(),
            self.endpoint.clone(),
            self.auth_secret.clone(),
            self.encryption_key.clone(),
        )
        .map_err(|e| UseCaseError::InvalidSubscription(e.to_string()))?;

        ctx.repos
            .push_subscriptions
            .upsert(&subscription)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(subscription)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use remind_infra::setup_context_inmemory;

    #[actix_web::test]
    async fn subscribing_twice_refreshes_instead_of_duplicating() {
        let ctx = setup_context_inmemory();
        let owner_id = ID::new();

        let mut usecase = CreatePushSubscriptionUseCase {
            owner_id: owner_id.clone(),
            endpoint: "https://push.example/send/device-1".into(),
            auth_secret: "auth-old".into(),
            encryption_key: "p256dh-old".into(),
        };
        usecase.execute(&ctx).await.unwrap();

        let mut usecase = CreatePushSubscriptionUseCase {
            owner_id: owner_id.clone(),
            endpoint: "https://push.example/send/device-1".into(),
            auth_secret: "auth-new".into(),
            encryption_key: "p256dh-new".into(),
        };
        usecase.execute(&ctx).await.unwrap();

        let subscriptions = ctx
            .repos
            .push_subscriptions
            .find_by_owner(&owner_id)
            .await
            .unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].auth_secret, "auth-new");
    }

    #[actix_web::test]
    async fn rejects_invalid_endpoint() {
        let ctx = setup_context_inmemory();
        let mut usecase = CreatePushSubscriptionUseCase {
            owner_id: ID::new(),
            endpoint: "not a url".into(),
            auth_secret: "auth".into(),
            encryption_key: "p256dh".into(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidSubscription(_)
        ));
    }
}
