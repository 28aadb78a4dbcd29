use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::dtos::ReminderDTO;
use remind_api_structs::get_reminder_by_item::*;
use remind_domain::{Reminder, ID};
use remind_infra::Context;

pub async fn get_reminder_by_item_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let usecase = GetReminderByItemUseCase {
        item_id: path_params.item_id.clone(),
        owner_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| {
            HttpResponse::Ok().json(APIResponse {
                reminder: reminder.map(ReminderDTO::new),
            })
        })
        .map_err(RemindError::from)
}

/// Resolves the reminder the UI should show for an item: an unsent one
/// if it exists, otherwise the last sent one so the user still sees
/// "last known" state after a reminder fired.
#[derive(Debug)]
pub struct GetReminderByItemUseCase {
    pub item_id: ID,
    pub owner_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderByItemUseCase {
    type Response = Option<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminderByItem";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find_by_item(&self.item_id)
            .await
            .filter(|reminder| reminder.owner_id == self.owner_id);
        Ok(reminder)
    }
}
