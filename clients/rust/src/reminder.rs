use crate::base::{APIError, APIResponse, BaseClient};
use remind_api_structs::dtos::ReminderDTO;
use remind_api_structs::*;
use remind_domain::{Recurrence, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub item_id: ID,
    pub fire_time: i64,
    pub recurrence: Option<Recurrence>,
}

pub struct RescheduleReminderInput {
    pub reminder_id: ID,
    pub fire_time: i64,
    pub recurrence: Option<Recurrence>,
}

pub struct ListDueRemindersInput {
    pub lookback: Option<i64>,
    pub lookahead: Option<i64>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            item_id: input.item_id,
            fire_time: input.fire_time,
            recurrence: input.recurrence,
        };
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn reschedule(
        &self,
        input: RescheduleReminderInput,
    ) -> APIResponse<reschedule_reminder::APIResponse> {
        let body = reschedule_reminder::RequestBody {
            fire_time: input.fire_time,
            recurrence: input.recurrence,
        };
        self.base
            .put(
                body,
                format!("reminders/{}", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn mark_sent(&self, reminder_id: ID) -> APIResponse<mark_reminder_sent::APIResponse> {
        self.base
            .post((), format!("reminders/{}/sent", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn get_by_item(&self, item_id: ID) -> APIResponse<get_reminder_by_item::APIResponse> {
        self.base
            .get(format!("reminders/item/{}", item_id), StatusCode::OK)
            .await
    }

    pub async fn list_due(
        &self,
        input: ListDueRemindersInput,
    ) -> APIResponse<list_due_reminders::APIResponse> {
        let mut query = Vec::new();
        if let Some(lookback) = input.lookback {
            query.push(format!("lookback={}", lookback));
        }
        if let Some(lookahead) = input.lookahead {
            query.push(format!("lookahead={}", lookahead));
        }
        let path = if query.is_empty() {
            "reminders/due".to_string()
        } else {
            format!("reminders/due?{}", query.join("&"))
        };
        self.base.get(path, StatusCode::OK).await
    }
}

/// The slice of the reminder API the client poller depends on, kept as
/// a trait so the poller can be exercised without a server.
#[async_trait::async_trait]
pub trait IReminderApi: Send + Sync {
    async fn list_due(&self, lookback: i64, lookahead: i64) -> Result<Vec<ReminderDTO>, APIError>;
    async fn mark_sent(&self, reminder_id: &ID) -> Result<(), APIError>;
}

#[async_trait::async_trait]
impl IReminderApi for ReminderClient {
    async fn list_due(&self, lookback: i64, lookahead: i64) -> Result<Vec<ReminderDTO>, APIError> {
        let res = ReminderClient::list_due(
            self,
            ListDueRemindersInput {
                lookback: Some(lookback),
                lookahead: Some(lookahead),
            },
        )
        .await?;
        Ok(res.reminders)
    }

    async fn mark_sent(&self, reminder_id: &ID) -> Result<(), APIError> {
        ReminderClient::mark_sent(self, reminder_id.clone()).await?;
        Ok(())
    }
}
