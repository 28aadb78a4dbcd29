use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<ID>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ID>,
}

/// The payload carried by a push message and rendered as a system
/// notification. The same shape is used for locally triggered alerts so
/// the presentation handler has a single input type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: NotificationData,
}

impl NotificationMessage {
    /// Shown when an inbound payload cannot be interpreted at all. An
    /// unreadable alert still has to reach the user.
    pub fn fallback() -> Self {
        Self {
            title: "Reminder".into(),
            body: "You have a reminder".into(),
            data: Default::default(),
        }
    }

    /// Payload the delivery sweep pushes to a device. Item contents
    /// live outside this subsystem, so the text stays generic and the
    /// receiving client enriches it from its own item store via
    /// `data.item_id`.
    pub fn from_due_reminder(reminder: &crate::reminder::Reminder) -> Self {
        Self {
            title: "Reminder".into(),
            body: "One of your items is due".into(),
            data: NotificationData {
                reminder_id: Some(reminder.id.clone()),
                item_id: Some(reminder.item_id.clone()),
            },
        }
    }

    pub fn due_now(item_label: &str, reminder_id: ID, item_id: ID) -> Self {
        Self {
            title: format!("Reminder: {}", item_label),
            body: format!("\"{}\" is due now", item_label),
            data: NotificationData {
                reminder_id: Some(reminder_id),
                item_id: Some(item_id),
            },
        }
    }

    pub fn due_in_minutes(item_label: &str, minutes: i64, reminder_id: ID, item_id: ID) -> Self {
        Self {
            title: format!("Reminder: {}", item_label),
            body: format!("\"{}\" is due in {} minutes", item_label, minutes),
            data: NotificationData {
                reminder_id: Some(reminder_id),
                item_id: Some(item_id),
            },
        }
    }

    pub fn overdue(item_label: &str, reminder_id: ID, item_id: ID) -> Self {
        Self {
            title: format!("Overdue: {}", item_label),
            body: format!("\"{}\" is past its due time", item_label),
            data: NotificationData {
                reminder_id: Some(reminder_id),
                item_id: Some(item_id),
            },
        }
    }

    /// Defensive parse of raw push bytes. A well formed JSON payload is
    /// taken as is, readable text becomes the body of a generic
    /// notification and anything else degrades to [`Self::fallback`].
    pub fn from_push_bytes(bytes: &[u8]) -> Self {
        if let Ok(message) = serde_json::from_slice::<NotificationMessage>(bytes) {
            return message;
        }
        match std::str::from_utf8(bytes) {
            Ok(text) if !text.trim().is_empty() => Self {
                body: text.trim().to_string(),
                ..Self::fallback()
            },
            _ => Self::fallback(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_well_formed_payload() {
        let reminder_id = ID::new();
        let raw = format!(
            r#"{{"title":"Reminder: Milk","body":"now","data":{{"reminderId":"{}"}}}}"#,
            reminder_id
        );
        let message = NotificationMessage::from_push_bytes(raw.as_bytes());
        assert_eq!(message.title, "Reminder: Milk");
        assert_eq!(message.data.reminder_id, Some(reminder_id));
        assert_eq!(message.data.item_id, None);
    }

    #[test]
    fn malformed_json_still_produces_a_notification() {
        let message = NotificationMessage::from_push_bytes(b"{\"title\": ");
        assert_eq!(message.body, "{\"title\":");
        assert_eq!(message.title, NotificationMessage::fallback().title);
    }

    #[test]
    fn plain_text_becomes_the_body() {
        let message = NotificationMessage::from_push_bytes(b"Buy milk");
        assert_eq!(message.body, "Buy milk");
    }

    #[test]
    fn garbage_bytes_fall_back_to_the_generic_notification() {
        let message = NotificationMessage::from_push_bytes(&[0xff, 0xfe, 0x00]);
        assert_eq!(message, NotificationMessage::fallback());
    }

    #[test]
    fn empty_payload_falls_back() {
        let message = NotificationMessage::from_push_bytes(b"");
        assert_eq!(message, NotificationMessage::fallback());
    }
}
