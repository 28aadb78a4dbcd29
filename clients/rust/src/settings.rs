use remind_domain::{NotificationCapability, PermissionState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Persistence for the process-wide "notifications enabled" toggle,
/// implemented by the host over whatever storage it has
pub trait ISettingsStore: Send + Sync {
    fn load_enabled(&self) -> bool;
    fn save_enabled(&self, enabled: bool);
}

/// The in-app notification toggle. Loaded once at startup, written
/// through on every change and readable by every component without
/// touching the store again. Distinct from the platform permission: a
/// user can disable alerts in-app while the permission stays granted.
pub struct NotificationSettings {
    store: Arc<dyn ISettingsStore>,
    enabled: AtomicBool,
}

impl NotificationSettings {
    pub fn load(store: Arc<dyn ISettingsStore>) -> Self {
        let enabled = store.load_enabled();
        Self {
            store,
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        self.store.save_enabled(enabled);
    }
}

/// What the host platform reports about its notification facilities
pub trait IPlatformProbe: Send + Sync {
    fn supports_notifications(&self) -> bool;
    fn supports_push(&self) -> bool;
    fn permission(&self) -> PermissionState;
    /// Running inside an embedded browser view that cannot show native
    /// permission prompts
    fn is_embedded_browser(&self) -> bool;
    /// Installed to the home screen / running standalone
    fn is_installed(&self) -> bool;
}

/// Collapses the platform quirks into one tagged status the UI can
/// switch on
pub fn detect_capability(probe: &dyn IPlatformProbe) -> NotificationCapability {
    if !probe.supports_notifications() {
        if probe.is_embedded_browser() && !probe.is_installed() {
            return NotificationCapability::NeedsInstall;
        }
        return NotificationCapability::Blocked;
    }
    match probe.permission() {
        PermissionState::Granted => NotificationCapability::Granted,
        PermissionState::Denied => NotificationCapability::Blocked,
        PermissionState::Default => {
            if probe.is_embedded_browser() && !probe.is_installed() {
                NotificationCapability::NeedsInstall
            } else {
                NotificationCapability::Supported
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    struct FakeStore {
        enabled: Mutex<bool>,
        writes: Mutex<usize>,
    }

    impl FakeStore {
        fn new(enabled: bool) -> Self {
            Self {
                enabled: Mutex::new(enabled),
                writes: Mutex::new(0),
            }
        }
    }

    impl ISettingsStore for FakeStore {
        fn load_enabled(&self) -> bool {
            *self.enabled.lock().unwrap()
        }
        fn save_enabled(&self, enabled: bool) {
            *self.enabled.lock().unwrap() = enabled;
            *self.writes.lock().unwrap() += 1;
        }
    }

    struct FakeProbe {
        notifications: bool,
        push: bool,
        permission: PermissionState,
        embedded: bool,
        installed: bool,
    }

    impl IPlatformProbe for FakeProbe {
        fn supports_notifications(&self) -> bool {
            self.notifications
        }
        fn supports_push(&self) -> bool {
            self.push
        }
        fn permission(&self) -> PermissionState {
            self.permission
        }
        fn is_embedded_browser(&self) -> bool {
            self.embedded
        }
        fn is_installed(&self) -> bool {
            self.installed
        }
    }

    fn desktop(permission: PermissionState) -> FakeProbe {
        FakeProbe {
            notifications: true,
            push: true,
            permission,
            embedded: false,
            installed: false,
        }
    }

    #[test]
    fn toggle_is_written_through_to_the_store() {
        let store = Arc::new(FakeStore::new(true));
        let settings = NotificationSettings::load(store.clone());
        assert!(settings.is_enabled());

        settings.set_enabled(false);
        assert!(!settings.is_enabled());
        assert!(!store.load_enabled());
        assert_eq!(*store.writes.lock().unwrap(), 1);
    }

    #[test]
    fn detects_desktop_permission_states() {
        assert_eq!(
            detect_capability(&desktop(PermissionState::Granted)),
            NotificationCapability::Granted
        );
        assert_eq!(
            detect_capability(&desktop(PermissionState::Denied)),
            NotificationCapability::Blocked
        );
        assert_eq!(
            detect_capability(&desktop(PermissionState::Default)),
            NotificationCapability::Supported
        );
    }

    #[test]
    fn embedded_browser_needs_install_before_prompting() {
        let probe = FakeProbe {
            notifications: false,
            push: false,
            permission: PermissionState::Default,
            embedded: true,
            installed: false,
        };
        assert_eq!(detect_capability(&probe), NotificationCapability::NeedsInstall);

        // once installed the regular flow applies
        let probe = FakeProbe {
            notifications: true,
            push: true,
            permission: PermissionState::Default,
            embedded: true,
            installed: true,
        };
        assert_eq!(detect_capability(&probe), NotificationCapability::Supported);
    }

    #[test]
    fn missing_apis_outside_embedded_browsers_are_blocked() {
        let probe = FakeProbe {
            notifications: false,
            push: false,
            permission: PermissionState::Default,
            embedded: false,
            installed: false,
        };
        assert_eq!(detect_capability(&probe), NotificationCapability::Blocked);
    }
}
