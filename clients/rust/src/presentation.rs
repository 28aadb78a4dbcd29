use crate::dedup::DedupLedger;
use remind_domain::{NotificationData, NotificationMessage};
use std::sync::{Arc, Mutex};

/// A notification as handed to the platform for display
#[derive(Debug, Clone, PartialEq)]
pub struct SystemNotification {
    pub title: String,
    pub body: String,
    /// Stable per reminder stream, so rapid successive alerts collapse
    /// in the tray instead of flooding it
    pub tag: String,
    /// The alert must stay visible until the user interacts with it
    pub require_interaction: bool,
    pub data: NotificationData,
}

/// Platform bridge that shows and closes system notifications
pub trait INotificationDisplay: Send + Sync {
    fn show(&self, notification: &SystemNotification);
    fn close(&self, tag: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientWindow {
    pub id: String,
    pub url: String,
}

/// Platform bridge over the open windows of the app
pub trait IClientWindows: Send + Sync {
    fn list(&self) -> Vec<ClientWindow>;
    fn focus(&self, window_id: &str) -> bool;
    fn open(&self, url: &str);
}

/// Turns inbound alerts, whether raised locally by the poller or
/// delivered as a push message to the background context, into
/// displayed system notifications, and routes notification clicks back
/// into the app.
pub struct PresentationHandler {
    display: Arc<dyn INotificationDisplay>,
    windows: Arc<dyn IClientWindows>,
    /// Origin of the app, also used as the root url to open on click
    origin: String,
    ledger: Mutex<DedupLedger>,
}

impl PresentationHandler {
    pub fn new(
        display: Arc<dyn INotificationDisplay>,
        windows: Arc<dyn IClientWindows>,
        origin: String,
        dedup_capacity: usize,
    ) -> Self {
        Self {
            display,
            windows,
            origin,
            ledger: Mutex::new(DedupLedger::new(dedup_capacity)),
        }
    }

    /// Displays the message unless this device already alerted on the
    /// same reminder. Returns whether a notification was shown.
    pub fn present(&self, message: &NotificationMessage) -> bool {
        if let Some(reminder_id) = &message.data.reminder_id {
            let mut ledger = self.ledger.lock().unwrap();
            if !ledger.insert(reminder_id.clone()) {
                return false;
            }
        }
        self.display.show(&Self::to_system_notification(message));
        true
    }

    /// Entry point for raw push payloads received in the background
    /// context. An unparseable payload still alerts with the generic
    /// fallback instead of being dropped.
    pub fn present_push(&self, raw_payload: &[u8]) -> bool {
        let message = NotificationMessage::from_push_bytes(raw_payload);
        self.present(&message)
    }

    /// Close the notification, then focus an already open app window if
    /// one exists, else open a fresh one at the app root. Windows are
    /// matched by origin, there may be zero or many of them.
    pub fn handle_click(&self, notification: &SystemNotification) {
        self.display.close(&notification.tag);

        for window in self.windows.list() {
            if window.url.starts_with(&self.origin) && self.windows.focus(&window.id) {
                return;
            }
        }
        self.windows.open(&self.origin);
    }

    fn to_system_notification(message: &NotificationMessage) -> SystemNotification {
        let tag = match &message.data.item_id {
            Some(item_id) => format!("reminder-{}", item_id),
            None => "reminders".to_string(),
        };
        SystemNotification {
            title: message.title.clone(),
            body: message.body.clone(),
            tag,
            require_interaction: true,
            data: message.data.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use remind_domain::ID;

    #[derive(Default)]
    struct FakeDisplay {
        shown: Mutex<Vec<SystemNotification>>,
        closed: Mutex<Vec<String>>,
    }

    impl INotificationDisplay for FakeDisplay {
        fn show(&self, notification: &SystemNotification) {
            self.shown.lock().unwrap().push(notification.clone());
        }
        fn close(&self, tag: &str) {
            self.closed.lock().unwrap().push(tag.to_string());
        }
    }

    #[derive(Default)]
    struct FakeWindows {
        windows: Vec<ClientWindow>,
        focused: Mutex<Vec<String>>,
        opened: Mutex<Vec<String>>,
    }

    impl IClientWindows for FakeWindows {
        fn list(&self) -> Vec<ClientWindow> {
            self.windows.clone()
        }
        fn focus(&self, window_id: &str) -> bool {
            self.focused.lock().unwrap().push(window_id.to_string());
            true
        }
        fn open(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }
    }

    fn handler(
        windows: Arc<FakeWindows>,
    ) -> (PresentationHandler, Arc<FakeDisplay>) {
        let display = Arc::new(FakeDisplay::default());
        let handler = PresentationHandler::new(
            display.clone(),
            windows,
            "https://app.example".into(),
            100,
        );
        (handler, display)
    }

    #[test]
    fn malformed_push_payload_still_alerts() {
        let (handler, display) = handler(Arc::new(FakeWindows::default()));

        assert!(handler.present_push(b"\xff\xfe not json"));

        let shown = display.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, NotificationMessage::fallback().title);
        assert!(shown[0].require_interaction);
    }

    #[test]
    fn poller_and_push_for_the_same_reminder_alert_once() {
        let (handler, display) = handler(Arc::new(FakeWindows::default()));
        let reminder_id = ID::new();

        let local = NotificationMessage {
            title: "Reminder: Milk".into(),
            body: "due now".into(),
            data: NotificationData {
                reminder_id: Some(reminder_id.clone()),
                item_id: Some(ID::new()),
            },
        };
        assert!(handler.present(&local));

        let push_payload = format!(
            r#"{{"title":"Reminder","body":"due","data":{{"reminderId":"{}"}}}}"#,
            reminder_id
        );
        assert!(!handler.present_push(push_payload.as_bytes()));

        assert_eq!(display.shown.lock().unwrap().len(), 1);
    }

    #[test]
    fn tag_is_stable_per_item() {
        let (handler, display) = handler(Arc::new(FakeWindows::default()));
        let item_id = ID::new();

        for _ in 0..2 {
            let message = NotificationMessage {
                title: "Reminder".into(),
                body: "due".into(),
                data: NotificationData {
                    reminder_id: Some(ID::new()),
                    item_id: Some(item_id.clone()),
                },
            };
            handler.present(&message);
        }

        let shown = display.shown.lock().unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].tag, shown[1].tag);
        assert_eq!(shown[0].tag, format!("reminder-{}", item_id));
    }

    #[test]
    fn click_focuses_an_existing_window_of_the_app() {
        let windows = Arc::new(FakeWindows {
            windows: vec![
                ClientWindow {
                    id: "other".into(),
                    url: "https://unrelated.example/page".into(),
                },
                ClientWindow {
                    id: "app".into(),
                    url: "https://app.example/lists".into(),
                },
            ],
            ..Default::default()
        });
        let (handler, display) = handler(windows.clone());

        let notification = SystemNotification {
            title: "Reminder".into(),
            body: "due".into(),
            tag: "reminders".into(),
            require_interaction: true,
            data: Default::default(),
        };
        handler.handle_click(&notification);

        assert_eq!(*windows.focused.lock().unwrap(), vec!["app".to_string()]);
        assert!(windows.opened.lock().unwrap().is_empty());
        assert_eq!(*display.closed.lock().unwrap(), vec!["reminders".to_string()]);
    }

    #[test]
    fn click_opens_the_app_root_when_no_window_matches() {
        let windows = Arc::new(FakeWindows {
            windows: vec![ClientWindow {
                id: "other".into(),
                url: "https://unrelated.example".into(),
            }],
            ..Default::default()
        });
        let (handler, _display) = handler(windows.clone());

        let notification = SystemNotification {
            title: "Reminder".into(),
            body: "due".into(),
            tag: "reminders".into(),
            require_interaction: true,
            data: Default::default(),
        };
        handler.handle_click(&notification);

        assert!(windows.focused.lock().unwrap().is_empty());
        assert_eq!(
            *windows.opened.lock().unwrap(),
            vec!["https://app.example".to_string()]
        );
    }
}
