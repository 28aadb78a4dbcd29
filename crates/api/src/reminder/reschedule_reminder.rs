use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::reschedule_reminder::*;
use remind_domain::{Recurrence, Reminder, ID};
use remind_infra::Context;

pub async fn reschedule_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = RescheduleReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
        owner_id,
        fire_time: body.fire_time,
        recurrence: body.recurrence,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(RemindError::from)
}

/// The sole re-arming path for recurring reminders. A stale base time
/// combined with a recurrence rule is advanced to the next future
/// occurrence; the `sent` flag always resets so the reminder becomes
/// deliverable again.
#[derive(Debug)]
pub struct RescheduleReminderUseCase {
    pub reminder_id: ID,
    pub owner_id: ID,
    pub fire_time: i64,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    FireTimeInThePast,
    InvalidRecurrence,
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::FireTimeInThePast => {
                Self::BadClientData("The reminder fire time must be in the future".into())
            }
            UseCaseError::InvalidRecurrence => {
                Self::BadClientData("Invalid recurrence rule specified for the reminder".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RescheduleReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "RescheduleReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.owner_id == self.owner_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        if let Some(rule) = &self.recurrence {
            if !rule.is_valid() {
                return Err(UseCaseError::InvalidRecurrence);
            }
        }

        let now = ctx.sys.get_timestamp_millis();
        let fire_time = if self.fire_time > now {
            self.fire_time
        } else {
            // a stale base is only acceptable when a recurrence rule
            // can project it into the future
            match &self.recurrence {
                Some(rule) => rule
                    .next_occurrence(self.fire_time, now)
                    .ok_or(UseCaseError::FireTimeInThePast)?,
                None => return Err(UseCaseError::FireTimeInThePast),
            }
        };

        reminder.fire_time = fire_time;
        reminder.recurrence = self.recurrence;
        reminder.sent = false;
        reminder.sent_at = None;

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
