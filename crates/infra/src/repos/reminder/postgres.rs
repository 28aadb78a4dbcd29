use super::IReminderRepo;
use crate::repos::shared::query_structs::TimeWindow;
use remind_domain::{Recurrence, Reminder, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    owner_uid: Uuid,
    item_uid: Uuid,
    fire_time: i64,
    recurrence: Option<serde_json::Value>,
    sent: bool,
    sent_at: Option<i64>,
}

impl From<ReminderRaw> for Reminder {
    fn from(e: ReminderRaw) -> Self {
        Self {
            id: e.reminder_uid.into(),
            owner_id: e.owner_uid.into(),
            item_id: e.item_uid.into(),
            fire_time: e.fire_time,
            recurrence: e
                .recurrence
                .and_then(|value| serde_json::from_value::<Recurrence>(value).ok()),
            sent: e.sent,
            sent_at: e.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, owner_uid, item_uid, fire_time, recurrence, sent, sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.owner_id.inner_ref())
        .bind(reminder.item_id.inner_ref())
        .bind(reminder.fire_time)
        .bind(reminder.recurrence.as_ref().map(Json))
        .bind(reminder.sent)
        .bind(reminder.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET fire_time = $2,
            recurrence = $3,
            sent = $4,
            sent_at = $5
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.fire_time)
        .bind(reminder.recurrence.as_ref().map(Json))
        .bind(reminder.sent)
        .bind(reminder.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminder with id: {:?} failed. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })
        .ok()?;
        res.map(|reminder| reminder.into())
    }

    async fn find_by_item(&self, item_id: &ID) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE item_uid = $1
            ORDER BY sent ASC, fire_time DESC
            LIMIT 1
            "#,
        )
        .bind(item_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminder for item: {:?} failed. DB returned error: {:?}",
                item_id, e
            );
            e
        })
        .ok()?;
        res.map(|reminder| reminder.into())
    }

    async fn find_due_for_owner(
        &self,
        owner_id: &ID,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<Reminder>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE owner_uid = $1 AND sent = FALSE
            AND fire_time >= $2 AND fire_time <= $3
            ORDER BY fire_time ASC
            "#,
        )
        .bind(owner_id.inner_ref())
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find due reminders for owner: {:?} in window: {:?} failed. DB returned error: {:?}",
                owner_id, window, e
            );
            e
        })?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn find_due_in_window(&self, window: &TimeWindow) -> anyhow::Result<Vec<Reminder>> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE sent = FALSE
            AND fire_time >= $1 AND fire_time <= $2
            ORDER BY fire_time ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find due reminders in window: {:?} failed. DB returned error: {:?}",
                window, e
            );
            e
        })?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn mark_sent(&self, reminder_id: &ID, sent_at: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET sent = TRUE,
            sent_at = $2
            WHERE reminder_uid = $1 AND sent = FALSE
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Mark reminder: {:?} as sent failed. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete reminder with id: {:?} failed. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })
        .ok()?;
        res.map(|reminder| reminder.into())
    }
}
