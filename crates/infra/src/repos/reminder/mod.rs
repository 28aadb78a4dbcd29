mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use remind_domain::{Reminder, ID};

use crate::repos::shared::query_structs::TimeWindow;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// The reminder the UI should show for an item: the most recent
    /// unsent one, falling back to the most recent sent one
    async fn find_by_item(&self, item_id: &ID) -> Option<Reminder>;
    /// Unsent reminders of one owner with `fire_time` inside `window`
    async fn find_due_for_owner(
        &self,
        owner_id: &ID,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<Reminder>>;
    /// Unsent reminders across all owners with `fire_time` inside
    /// `window`. Only the delivery sweep may call this.
    async fn find_due_in_window(&self, window: &TimeWindow) -> anyhow::Result<Vec<Reminder>>;
    /// Check-and-set of the `sent` flag. Returns `true` when this call
    /// flipped the flag, `false` when the reminder was already sent or
    /// does not exist.
    async fn mark_sent(&self, reminder_id: &ID, sent_at: i64) -> anyhow::Result<bool>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}
