use crate::base::APIError;
use crate::settings::IPlatformProbe;
use remind_domain::PermissionState;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// The subscription bundle the platform push registration hands back
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSubscription {
    pub endpoint: String,
    pub auth_secret: String,
    pub encryption_key: String,
}

/// Platform bridge over the push registration of this device
#[async_trait::async_trait]
pub trait IPushRegistration: Send + Sync {
    async fn get_subscription(&self) -> Option<DeviceSubscription>;
    /// Register with the push transport using the server's public key
    async fn subscribe(&self, server_key: &str) -> Result<DeviceSubscription, String>;
    async fn unsubscribe(&self) -> Result<(), String>;
}

/// The slice of the server API the subscription manager depends on
#[async_trait::async_trait]
pub trait IPushApi: Send + Sync {
    async fn get_key(&self) -> Result<String, APIError>;
    async fn persist(&self, subscription: &DeviceSubscription) -> Result<(), APIError>;
    async fn remove(&self, endpoint: &str) -> Result<(), APIError>;
}

#[derive(Debug, Error)]
pub enum PushManagerError {
    #[error("Push notifications are not supported in this environment")]
    Unsupported,
    #[error("Notification permission has not been granted")]
    PermissionDenied,
    #[error("Push platform error: {0}")]
    Platform(String),
    #[error("Remind server error: {0:?}")]
    Api(APIError),
}

impl From<APIError> for PushManagerError {
    fn from(e: APIError) -> Self {
        Self::Api(e)
    }
}

/// Keeps the device's push registration and its server side record in
/// step. Both directions are idempotent: subscribing while already
/// subscribed refreshes the server record, unsubscribing twice is a
/// no-op.
pub struct PushSubscriptionManager {
    api: Arc<dyn IPushApi>,
    registration: Arc<dyn IPushRegistration>,
    probe: Arc<dyn IPlatformProbe>,
}

impl PushSubscriptionManager {
    pub fn new(
        api: Arc<dyn IPushApi>,
        registration: Arc<dyn IPushRegistration>,
        probe: Arc<dyn IPlatformProbe>,
    ) -> Self {
        Self {
            api,
            registration,
            probe,
        }
    }

    pub async fn subscribe(&self) -> Result<DeviceSubscription, PushManagerError> {
        if !self.probe.supports_push() {
            return Err(PushManagerError::Unsupported);
        }
        if self.probe.permission() != PermissionState::Granted {
            return Err(PushManagerError::PermissionDenied);
        }

        // an existing platform subscription is reused, persisting it
        // again heals a server record that went missing
        if let Some(existing) = self.registration.get_subscription().await {
            self.api.persist(&existing).await?;
            return Ok(existing);
        }

        let server_key = self.api.get_key().await?;
        let subscription = self
            .registration
            .subscribe(&server_key)
            .await
            .map_err(PushManagerError::Platform)?;
        self.api.persist(&subscription).await?;
        Ok(subscription)
    }

    /// The server record goes first: a failure mid teardown then leaves
    /// a stale local subscription the next `subscribe` reconciles,
    /// never a server record nothing will clean up.
    pub async fn unsubscribe(&self) -> Result<(), PushManagerError> {
        let subscription = match self.registration.get_subscription().await {
            Some(subscription) => subscription,
            None => return Ok(()),
        };

        self.api.remove(&subscription.endpoint).await?;
        if let Err(e) = self.registration.unsubscribe().await {
            warn!("Platform push teardown failed, a later subscribe will reconcile: {}", e);
            return Err(PushManagerError::Platform(e));
        }
        Ok(())
    }
}
