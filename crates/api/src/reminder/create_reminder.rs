use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::create_reminder::*;
use remind_domain::{Recurrence, Reminder, ID};
use remind_infra::Context;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        owner_id,
        item_id: body.item_id,
        fire_time: body.fire_time,
        recurrence: body.recurrence,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub owner_id: ID,
    pub item_id: ID,
    pub fire_time: i64,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    FireTimeInThePast,
    InvalidRecurrence,
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
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
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        if self.fire_time <= now {
            return Err(UseCaseError::FireTimeInThePast);
        }
        if let Some(rule) = &self.recurrence {
            if !rule.is_valid() {
                return Err(UseCaseError::InvalidRecurrence);
            }
        }

        let reminder = Reminder::new(
            self.owner_id.clone(),
            self.item_id.clone(),
            self.fire_time,
            self.recurrence,
        );

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use remind_domain::RecurrenceUnit;
    use remind_infra::{setup_context_inmemory, ISys};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    fn setup() -> Context {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        ctx
    }

    #[actix_web::test]
    async fn creates_one_shot_reminder() {
        let ctx = setup();
        let mut usecase = CreateReminderUseCase {
            owner_id: ID::new(),
            item_id: ID::new(),
            fire_time: NOW + 1000 * 60,
            recurrence: None,
        };

        let reminder = usecase.execute(&ctx).await.unwrap();
        assert!(!reminder.sent);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await,
            Some(reminder)
        );
    }

    #[actix_web::test]
    async fn creates_recurring_reminder() {
        let ctx = setup();
        let mut usecase = CreateReminderUseCase {
            owner_id: ID::new(),
            item_id: ID::new(),
            fire_time: NOW + 1000,
            recurrence: Some(Recurrence {
                unit: RecurrenceUnit::Daily,
                interval: 1,
            }),
        };

        assert!(usecase.execute(&ctx).await.is_ok());
    }

    #[actix_web::test]
    async fn rejects_fire_time_in_the_past() {
        let ctx = setup();
        let mut usecase = CreateReminderUseCase {
            owner_id: ID::new(),
            item_id: ID::new(),
            fire_time: NOW - 1,
            recurrence: None,
        };

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::FireTimeInThePast
        );
    }

    #[actix_web::test]
    async fn rejects_invalid_recurrence() {
        let ctx = setup();
        let mut usecase = CreateReminderUseCase {
            owner_id: ID::new(),
            item_id: ID::new(),
            fire_time: NOW + 1000,
            recurrence: Some(Recurrence {
                unit: RecurrenceUnit::Weekly,
                interval: 0,
            }),
        };

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidRecurrence
        );
    }
}
