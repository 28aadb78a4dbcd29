use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct VapidConfig {
    /// Contact URI included in every signed push assertion, usually a
    /// `mailto:` address the push service can reach the operator at
    pub subject: String,
    /// Base64url encoded public key, handed to clients at subscribe time
    pub public_key: String,
    /// EC private key in PEM form. When absent the server cannot sign
    /// push messages and delivery degrades to the client poller.
    pub private_key_pem: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Half width in millis of the window the delivery sweep scans
    /// around "now". Matches the cadence of the external trigger so no
    /// reminder can fall between two invocations.
    pub delivery_window_millis: i64,
    /// Upper bound for a single push transmission, so one unresponsive
    /// endpoint cannot stall a whole sweep
    pub delivery_send_timeout_secs: u64,
    /// Maximum number of concurrent push transmissions per sweep
    pub delivery_concurrency_limit: usize,
    /// Also run the sweep on an in-process timer instead of relying on
    /// the external trigger alone. Safe to combine with it because every
    /// sweep is idempotent per reminder.
    pub internal_sweep_enabled: bool,
    pub vapid: VapidConfig,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let subject = std::env::var("VAPID_SUBJECT")
            .unwrap_or_else(|_| "mailto:reminders@localhost".into());
        let public_key = match std::env::var("VAPID_PUBLIC_KEY") {
            Ok(key) => key,
            Err(_) => {
                warn!("Did not find VAPID_PUBLIC_KEY environment variable. Clients will not be able to register push subscriptions.");
                String::new()
            }
        };
        let private_key_pem = match std::env::var("VAPID_PRIVATE_KEY") {
            Ok(pem) => Some(pem),
            Err(_) => {
                info!("Did not find VAPID_PRIVATE_KEY environment variable. Push delivery is disabled, in-app reminders keep working.");
                None
            }
        };

        let internal_sweep_enabled = std::env::var("INTERNAL_SWEEP_ENABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            port,
            delivery_window_millis: 1000 * 60,
            delivery_send_timeout_secs: 5,
            delivery_concurrency_limit: 8,
            internal_sweep_enabled,
            vapid: VapidConfig {
                subject,
                public_key,
                private_key_pem,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
