use serde::{Deserialize, Serialize};

/// Permission state reported by the host platform for showing system
/// notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Default,
    Granted,
    Denied,
}

/// What the current platform can do about notifications, derived once
/// by capability detection and consumed uniformly by the UI instead of
/// scattering user agent checks through the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCapability {
    /// Notifications are available and permission can still be asked for
    Supported,
    /// The platform denied permission or lacks the APIs entirely
    Blocked,
    /// Embedded browser context that cannot show a native prompt until
    /// the app is installed to the home screen
    NeedsInstall,
    /// Permission already granted
    Granted,
    /// Permission prompt has not been answered yet
    Default,
}

impl NotificationCapability {
    /// Whether alerts can be shown right now without further user action
    pub fn can_notify(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Whether asking for permission is worthwhile on this platform
    pub fn can_request(&self) -> bool {
        matches!(self, Self::Supported | Self::Default)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_granted_can_notify() {
        assert!(NotificationCapability::Granted.can_notify());
        assert!(!NotificationCapability::Supported.can_notify());
        assert!(!NotificationCapability::Blocked.can_notify());
        assert!(!NotificationCapability::NeedsInstall.can_notify());
    }

    #[test]
    fn blocked_and_needs_install_cannot_request() {
        assert!(!NotificationCapability::Blocked.can_request());
        assert!(!NotificationCapability::NeedsInstall.can_request());
        assert!(NotificationCapability::Supported.can_request());
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&NotificationCapability::NeedsInstall).unwrap(),
            r#""needs-install""#
        );
    }
}
