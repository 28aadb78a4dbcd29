use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::list_due_reminders::*;
use remind_domain::{Reminder, ID};
use remind_infra::{Context, TimeWindow};

/// Default reach into the past: catches reminders that came due while
/// the app was closed
const DEFAULT_LOOKBACK_MILLIS: i64 = 1000 * 60 * 60;
/// Default reach into the future: lets the poller alert slightly early
/// instead of up to one poll interval late
const DEFAULT_LOOKAHEAD_MILLIS: i64 = 1000 * 60 * 5;
/// Window bounds are capped so a client cannot ask for years of data
const MAX_RANGE_MILLIS: i64 = 1000 * 60 * 60 * 24 * 31;

pub async fn list_due_reminders_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let owner_id = protect_route(&http_req)?;

    let usecase = ListDueRemindersUseCase {
        owner_id,
        lookback: query_params.lookback.unwrap_or(DEFAULT_LOOKBACK_MILLIS),
        lookahead: query_params.lookahead.unwrap_or(DEFAULT_LOOKAHEAD_MILLIS),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct ListDueRemindersUseCase {
    pub owner_id: ID,
    pub lookback: i64,
    pub lookahead: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidWindow,
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidWindow => {
                Self::BadClientData("The provided due window is not valid".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListDueRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListDueReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.lookback < 0
            || self.lookahead < 0
            || self.lookback > MAX_RANGE_MILLIS
            || self.lookahead > MAX_RANGE_MILLIS
        {
            return Err(UseCaseError::InvalidWindow);
        }

        let now = ctx.sys.get_timestamp_millis();
        let window = TimeWindow::around(now, self.lookback, self.lookahead);

        ctx.repos
            .reminders
            .find_due_for_owner(&self.owner_id, &window)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
