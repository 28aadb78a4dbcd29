use crate::shared::entity::{Entity, ID};
use crate::shared::recurrence::Recurrence;

/// A `Reminder` is a scheduled alert attached to one list item. At
/// `fire_time` the owner should be notified, either by the client
/// poller while the app is open or by the server side delivery sweep.
///
/// `sent` is the single source of truth for "has this reminder already
/// alerted" across all execution contexts. The delivery path only ever
/// flips it to `true`; advancing a recurring reminder to its next
/// occurrence happens through an explicit reschedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The user that owns the underlying item and receives the alert
    pub owner_id: ID,
    /// The list item this reminder is attached to. The item itself is
    /// not owned by this subsystem.
    pub item_id: ID,
    /// The next moment this reminder should alert, unix millis UTC
    pub fire_time: i64,
    pub recurrence: Option<Recurrence>,
    pub sent: bool,
    pub sent_at: Option<i64>,
}

impl Reminder {
    pub fn new(owner_id: ID, item_id: ID, fire_time: i64, recurrence: Option<Recurrence>) -> Self {
        Self {
            id: Default::default(),
            owner_id,
            item_id,
            fire_time,
            recurrence,
            sent: false,
            sent_at: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::recurrence::RecurrenceUnit;

    #[test]
    fn new_reminder_starts_unsent() {
        let reminder = Reminder::new(ID::new(), ID::new(), 1000, None);
        assert!(!reminder.sent);
        assert!(reminder.sent_at.is_none());
        assert!(!reminder.is_recurring());
    }

    #[test]
    fn recurrence_marks_reminder_recurring() {
        let rule = Recurrence {
            unit: RecurrenceUnit::Weekly,
            interval: 1,
        };
        let reminder = Reminder::new(ID::new(), ID::new(), 1000, Some(rule));
        assert!(reminder.is_recurring());
    }
}
