mod base;
mod dedup;
mod poller;
mod presentation;
mod push_manager;
mod reminder;
mod settings;
mod status;
mod subscription;

pub use base::{APIError, APIResponse};
pub(crate) use base::BaseClient;
pub use dedup::DedupLedger;
pub use poller::{IItemLabels, NotificationPoller, PollerConfig, PollerHandle};
pub use presentation::{
    ClientWindow, IClientWindows, INotificationDisplay, PresentationHandler, SystemNotification,
};
pub use push_manager::{
    DeviceSubscription, IPushApi, IPushRegistration, PushManagerError, PushSubscriptionManager,
};
use reminder::ReminderClient;
pub use reminder::{
    CreateReminderInput, IReminderApi, ListDueRemindersInput, RescheduleReminderInput,
};
pub use settings::{detect_capability, IPlatformProbe, ISettingsStore, NotificationSettings};
use status::StatusClient;
use std::sync::Arc;
use subscription::SubscriptionClient;

// Domain
pub use remind_api_structs::dtos::PushSubscriptionDTO as PushSubscription;
pub use remind_api_structs::dtos::ReminderDTO as Reminder;
pub use remind_domain::{
    NotificationCapability, NotificationData, NotificationMessage, PermissionState, Recurrence,
    RecurrenceUnit, ID,
};

/// Remind Server SDK
///
/// The SDK contains methods for interacting with the Remind server API
/// together with the client side halves of the reminder subsystem: the
/// notification poller, the push subscription manager and the
/// notification presentation handler.
#[derive(Clone)]
pub struct RemindSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub subscription: SubscriptionClient,
}

impl RemindSDK {
    pub fn new<T: Into<String>>(address: String, user_id: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_user_id(user_id.into());
        let base = Arc::new(base);
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let subscription = SubscriptionClient::new(base);

        Self {
            reminder,
            status,
            subscription,
        }
    }
}
