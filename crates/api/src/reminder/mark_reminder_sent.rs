use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::mark_reminder_sent::*;
use remind_domain::{Reminder, ID};
use remind_infra::Context;

pub async fn mark_reminder_sent_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let usecase = MarkReminderSentUseCase {
        reminder_id: path_params.reminder_id.clone(),
        owner_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(RemindError::from)
}

/// Records a delivery attempt for the current `fire_time`. The flag is
/// a check-and-set in storage, so the client poller and the delivery
/// sweep can both call this for the same reminder and the second call
/// is a no-op instead of an error.
#[derive(Debug)]
pub struct MarkReminderSentUseCase {
    pub reminder_id: ID,
    pub owner_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for MarkReminderSentUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkReminderSent";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.owner_id == self.owner_id => (),
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        ctx.repos
            .reminders
            .mark_sent(&self.reminder_id, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        ctx.repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or(UseCaseError::StorageError)
    }
}
