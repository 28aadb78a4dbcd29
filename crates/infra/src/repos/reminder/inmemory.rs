use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::query_structs::TimeWindow;
use remind_domain::{Reminder, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_item(&self, item_id: &ID) -> Option<Reminder> {
        let mut matches = find_by(&self.reminders, |r: &Reminder| r.item_id == *item_id);
        matches.sort_by_key(|r| (r.sent, -r.fire_time));
        matches.into_iter().next()
    }

    async fn find_due_for_owner(
        &self,
        owner_id: &ID,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut due = find_by(&self.reminders, |r: &Reminder| {
            r.owner_id == *owner_id && !r.sent && window.contains(r.fire_time)
        });
        due.sort_by_key(|r| r.fire_time);
        Ok(due)
    }

    async fn find_due_in_window(&self, window: &TimeWindow) -> anyhow::Result<Vec<Reminder>> {
        let mut due = find_by(&self.reminders, |r: &Reminder| {
            !r.sent && window.contains(r.fire_time)
        });
        due.sort_by_key(|r| r.fire_time);
        Ok(due)
    }

    async fn mark_sent(&self, reminder_id: &ID, sent_at: i64) -> anyhow::Result<bool> {
        let mut reminders = self.reminders.lock().unwrap();
        for reminder in reminders.iter_mut() {
            if reminder.id == *reminder_id {
                if reminder.sent {
                    return Ok(false);
                }
                reminder.sent = true;
                reminder.sent_at = Some(sent_at);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }
}
