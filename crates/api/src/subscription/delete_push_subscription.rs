use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::delete_push_subscription::*;
use remind_api_structs::dtos::PushSubscriptionDTO;
use remind_domain::{PushSubscription, ID};
use remind_infra::Context;

pub async fn delete_push_subscription_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let usecase = DeletePushSubscriptionUseCase {
        owner_id,
        endpoint: body.0.endpoint,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| {
            HttpResponse::Ok().json(APIResponse {
                subscription: subscription.map(PushSubscriptionDTO::new),
            })
        })
        .map_err(RemindError::from)
}

/// Removing a subscription that is already gone is a success: the
/// client deletes the server record before tearing down its platform
/// subscription and may retry after a partial failure.
#[derive(Debug)]
pub struct DeletePushSubscriptionUseCase {
    pub owner_id: ID,
    pub endpoint: String,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeletePushSubscriptionUseCase {
    type Response = Option<PushSubscription>;

    type Error = UseCaseError;

    const NAME: &'static str = "DeletePushSubscription";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        Ok(ctx
            .repos
            .push_subscriptions
            .delete_by_endpoint(&self.owner_id, &self.endpoint)
            .await)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use remind_infra::setup_context_inmemory;

    #[actix_web::test]
    async fn deletes_and_tolerates_missing_subscription() {
        let ctx = setup_context_inmemory();
        let owner_id = ID::new();
        let subscription = PushSubscription::new(
            owner_id.clone(),
            "https://push.example/send/device-1".into(),
            "auth".into(),
            "p256dh".into(),
        )
        .unwrap();
        ctx.repos
            .push_subscriptions
            .upsert(&subscription)
            .await
            .unwrap();

        let mut usecase = DeletePushSubscriptionUseCase {
            owner_id: owner_id.clone(),
            endpoint: subscription.endpoint.clone(),
        };
        assert!(usecase.execute(&ctx).await.unwrap().is_some());

        // second delete is a harmless no-op
        let mut usecase = DeletePushSubscriptionUseCase {
            owner_id,
            endpoint: subscription.endpoint,
        };
        assert!(usecase.execute(&ctx).await.unwrap().is_none());
    }
}
