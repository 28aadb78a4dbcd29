mod capability;
mod notification;
mod reminder;
mod shared;
mod subscription;

pub use capability::{NotificationCapability, PermissionState};
pub use notification::{NotificationData, NotificationMessage};
pub use reminder::Reminder;
pub use shared::entity::{Entity, ID};
pub use shared::recurrence::{Recurrence, RecurrenceUnit};
pub use subscription::PushSubscription;
