use crate::presentation::PresentationHandler;
use crate::reminder::IReminderApi;
use crate::settings::NotificationSettings;
use remind_api_structs::dtos::ReminderDTO;
use remind_domain::{NotificationMessage, ID};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

const MINUTE_MILLIS: i64 = 1000 * 60;

/// Item names live in the surrounding list UI, not in this subsystem.
/// The host supplies them so alerts can say what is actually due.
pub trait IItemLabels: Send + Sync {
    fn label(&self, item_id: &ID) -> Option<String>;
}

pub struct PollerConfig {
    pub interval: Duration,
    /// Millis to reach into the past, so reminders that came due while
    /// the app was closed still alert
    pub lookback: i64,
    /// Millis to reach into the future, so alerts land slightly early
    /// instead of up to one interval late
    pub lookahead: i64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            lookback: 60 * MINUTE_MILLIS,
            lookahead: 5 * MINUTE_MILLIS,
        }
    }
}

/// Foreground companion to the server side delivery sweep: while the
/// app has the user's attention it checks for due reminders on a fixed
/// interval and alerts locally, trading an occasional duplicate
/// (absorbed by the presenter's dedup ledger and the server `sent`
/// flag) for near-instant feedback.
pub struct NotificationPoller {
    api: Arc<dyn IReminderApi>,
    presenter: Arc<PresentationHandler>,
    settings: Arc<NotificationSettings>,
    labels: Arc<dyn IItemLabels>,
    config: PollerConfig,
}

/// Cancellation handle for a running poller. Stopping lets an in-flight
/// check finish but schedules no further tick.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Waits until the poller task has fully wound down
    pub async fn stopped(self) {
        let _ = self.task.await;
    }
}

impl NotificationPoller {
    pub fn new(
        api: Arc<dyn IReminderApi>,
        presenter: Arc<PresentationHandler>,
        settings: Arc<NotificationSettings>,
        labels: Arc<dyn IItemLabels>,
        config: PollerConfig,
    ) -> Self {
        Self {
            api,
            presenter,
            settings,
            labels,
            config,
        }
    }

    /// Runs an immediate check, then one per interval, until the handle
    /// is stopped. One cooperative task, a check always completes
    /// before the next tick is considered.
    pub fn start(self) -> PollerHandle {
        let (shutdown, mut rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            loop {
                tokio::select! {
                    _ = rx.changed() => break,
                    _ = ticker.tick() => {
                        if !self.settings.is_enabled() {
                            continue;
                        }
                        self.check().await;
                    }
                }
            }
        });
        PollerHandle { shutdown, task }
    }

    async fn check(&self) {
        let due = match self
            .api
            .list_due(self.config.lookback, self.config.lookahead)
            .await
        {
            Ok(due) => due,
            Err(e) => {
                error!("Checking due reminders failed: {:?}", e);
                return;
            }
        };

        let now = now_millis();
        for reminder in due {
            let message = self.to_message(now, &reminder);
            if self.presenter.present(&message) {
                if let Err(e) = self.api.mark_sent(&reminder.id).await {
                    error!("Unable to mark reminder: {} as sent: {:?}", reminder.id, e);
                }
            }
        }
    }

    fn to_message(&self, now: i64, reminder: &ReminderDTO) -> NotificationMessage {
        let label = self
            .labels
            .label(&reminder.item_id)
            .unwrap_or_else(|| "Item".to_string());
        build_message(
            now,
            reminder.fire_time,
            &label,
            reminder.id.clone(),
            reminder.item_id.clone(),
        )
    }
}

fn build_message(
    now: i64,
    fire_time: i64,
    label: &str,
    reminder_id: ID,
    item_id: ID,
) -> NotificationMessage {
    let diff = fire_time - now;
    if diff < 0 {
        NotificationMessage::overdue(label, reminder_id, item_id)
    } else if diff <= MINUTE_MILLIS {
        NotificationMessage::due_now(label, reminder_id, item_id)
    } else {
        let minutes = (diff + MINUTE_MILLIS - 1) / MINUTE_MILLIS;
        NotificationMessage::due_in_minutes(label, minutes, reminder_id, item_id)
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::APIError;
    use crate::presentation::{
        ClientWindow, IClientWindows, INotificationDisplay, SystemNotification,
    };
    use crate::settings::ISettingsStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeDisplay {
        shown: Mutex<Vec<SystemNotification>>,
    }

    impl INotificationDisplay for FakeDisplay {
        fn show(&self, notification: &SystemNotification) {
            self.shown.lock().unwrap().push(notification.clone());
        }
        fn close(&self, _tag: &str) {}
    }

    struct NoWindows;
    impl IClientWindows for NoWindows {
        fn list(&self) -> Vec<ClientWindow> {
            Vec::new()
        }
        fn focus(&self, _window_id: &str) -> bool {
            false
        }
        fn open(&self, _url: &str) {}
    }

    struct FixedStore(bool);
    impl ISettingsStore for FixedStore {
        fn load_enabled(&self) -> bool {
            self.0
        }
        fn save_enabled(&self, _enabled: bool) {}
    }

    struct NoLabels;
    impl IItemLabels for NoLabels {
        fn label(&self, _item_id: &ID) -> Option<String> {
            Some("Milk".to_string())
        }
    }

    struct FakeApi {
        due: Mutex<Vec<ReminderDTO>>,
        list_calls: Mutex<usize>,
        marked: Mutex<Vec<ID>>,
    }

    impl FakeApi {
        fn with_due(due: Vec<ReminderDTO>) -> Self {
            Self {
                due: Mutex::new(due),
                list_calls: Mutex::new(0),
                marked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl IReminderApi for FakeApi {
        async fn list_due(
            &self,
            _lookback: i64,
            _lookahead: i64,
        ) -> Result<Vec<ReminderDTO>, APIError> {
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.due.lock().unwrap().clone())
        }

        async fn mark_sent(&self, reminder_id: &ID) -> Result<(), APIError> {
            self.marked.lock().unwrap().push(reminder_id.clone());
            self.due
                .lock()
                .unwrap()
                .retain(|reminder| reminder.id != *reminder_id);
            Ok(())
        }
    }

    fn due_reminder(fire_time: i64) -> ReminderDTO {
        ReminderDTO {
            id: ID::new(),
            owner_id: ID::new(),
            item_id: ID::new(),
            fire_time,
            recurrence: None,
            sent: false,
            sent_at: None,
        }
    }

    fn build_poller(
        api: Arc<FakeApi>,
        enabled: bool,
        interval: Duration,
    ) -> (NotificationPoller, Arc<FakeDisplay>) {
        let display = Arc::new(FakeDisplay::default());
        let presenter = Arc::new(PresentationHandler::new(
            display.clone(),
            Arc::new(NoWindows),
            "https://app.example".into(),
            100,
        ));
        let settings = Arc::new(NotificationSettings::load(Arc::new(FixedStore(enabled))));
        let poller = NotificationPoller::new(
            api,
            presenter,
            settings,
            Arc::new(NoLabels),
            PollerConfig {
                interval,
                ..Default::default()
            },
        );
        (poller, display)
    }

    #[tokio::test]
    async fn alerts_once_and_marks_sent() {
        let reminder = due_reminder(now_millis() - 30 * 1000);
        let reminder_id = reminder.id.clone();
        let api = Arc::new(FakeApi::with_due(vec![reminder]));
        let (poller, display) = build_poller(api.clone(), true, Duration::from_millis(20));

        let handle = poller.start();
        tokio::time::sleep(Duration::from_millis(90)).await;
        handle.stop();
        handle.stopped().await;

        // several ticks ran, the reminder alerted exactly once
        assert!(*api.list_calls.lock().unwrap() >= 2);
        assert_eq!(display.shown.lock().unwrap().len(), 1);
        assert_eq!(*api.marked.lock().unwrap(), vec![reminder_id]);
    }

    #[tokio::test]
    async fn stopping_prevents_further_checks() {
        let api = Arc::new(FakeApi::with_due(Vec::new()));
        let (poller, _display) = build_poller(api.clone(), true, Duration::from_millis(20));

        let handle = poller.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.stop();
        handle.stopped().await;

        let calls_at_stop = *api.list_calls.lock().unwrap();
        assert!(calls_at_stop >= 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(*api.list_calls.lock().unwrap(), calls_at_stop);
    }

    #[tokio::test]
    async fn disabled_notifications_suppress_all_work() {
        let api = Arc::new(FakeApi::with_due(vec![due_reminder(now_millis())]));
        let (poller, display) = build_poller(api.clone(), false, Duration::from_millis(20));

        let handle = poller.start();
        tokio::time::sleep(Duration::from_millis(70)).await;
        handle.stop();
        handle.stopped().await;

        assert_eq!(*api.list_calls.lock().unwrap(), 0);
        assert!(display.shown.lock().unwrap().is_empty());
    }

    #[test]
    fn message_reflects_how_overdue_the_reminder_is() {
        let now = 10 * MINUTE_MILLIS;

        let overdue = build_message(now, now - 1000, "Milk", ID::new(), ID::new());
        assert!(overdue.title.starts_with("Overdue"));

        let due_now = build_message(now, now + 30 * 1000, "Milk", ID::new(), ID::new());
        assert_eq!(due_now.body, "\"Milk\" is due now");

        let later = build_message(now, now + 3 * MINUTE_MILLIS + 1, "Milk", ID::new(), ID::new());
        assert_eq!(later.body, "\"Milk\" is due in 4 minutes");
    }
}
