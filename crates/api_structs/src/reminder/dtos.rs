use remind_domain::{Recurrence, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub owner_id: ID,
    pub item_id: ID,
    pub fire_time: i64,
    pub recurrence: Option<Recurrence>,
    pub sent: bool,
    pub sent_at: Option<i64>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            owner_id: reminder.owner_id.clone(),
            item_id: reminder.item_id.clone(),
            fire_time: reminder.fire_time,
            recurrence: reminder.recurrence,
            sent: reminder.sent,
            sent_at: reminder.sent_at,
        }
    }
}
