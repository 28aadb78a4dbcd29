use crate::config::VapidConfig;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use remind_domain::{NotificationMessage, PushSubscription};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// How long a push service may hold on to an undelivered message
const PUSH_TTL_SECS: u64 = 60 * 60 * 24;
/// Lifetime of a signed assertion. Push services reject anything
/// above 24h, the reference recommendation is 12h.
const VAPID_TOKEN_EXP_SECS: i64 = 60 * 60 * 12;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The push service reported the endpoint as permanently gone. The
    /// subscription should be deleted and never retried.
    #[error("Push endpoint is gone")]
    Gone,
    /// Anything that may succeed on a later cycle
    #[error("Transient push transport failure: {0}")]
    Transient(String),
}

#[async_trait::async_trait]
pub trait IPushTransport: Send + Sync {
    async fn send(
        &self,
        subscription: &PushSubscription,
        message: &NotificationMessage,
    ) -> Result<(), TransportError>;
}

#[derive(Debug, Serialize)]
struct VapidClaims {
    aud: String,
    exp: i64,
    sub: String,
}

/// Sends Web Push messages over HTTP, authorized by a short-lived
/// ES256 assertion bound to the destination origin.
pub struct WebPushTransport {
    client: reqwest::Client,
    subject: String,
    public_key: String,
    signing_key: EncodingKey,
}

impl WebPushTransport {
    pub fn new(vapid: &VapidConfig, send_timeout_secs: u64) -> anyhow::Result<Self> {
        let pem = vapid
            .private_key_pem
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("VAPID private key is not configured"))?;
        let signing_key = EncodingKey::from_ec_pem(pem.as_bytes())?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(send_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            subject: vapid.subject.clone(),
            public_key: vapid.public_key.clone(),
            signing_key,
        })
    }

    fn vapid_token(&self, audience: &str) -> Result<String, TransportError> {
        let claims = VapidClaims {
            aud: audience.to_string(),
            exp: chrono::Utc::now().timestamp() + VAPID_TOKEN_EXP_SECS,
            sub: self.subject.clone(),
        };
        encode(&Header::new(Algorithm::ES256), &claims, &self.signing_key).map_err(|e| {
            error!("Unable to sign vapid assertion: {:?}", e);
            TransportError::Transient(format!("vapid signing failed: {}", e))
        })
    }
}

/// The origin the signed assertion is bound to: scheme and host of the
/// subscription endpoint, without the path.
pub fn push_audience(endpoint: &str) -> Result<String, TransportError> {
    let parsed = url::Url::parse(endpoint)
        .map_err(|_| TransportError::Transient(format!("invalid endpoint url: {}", endpoint)))?;
    Ok(parsed.origin().ascii_serialization())
}

#[async_trait::async_trait]
impl IPushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        message: &NotificationMessage,
    ) -> Result<(), TransportError> {
        let audience = push_audience(&subscription.endpoint)?;
        let token = self.vapid_token(&audience)?;

        let res = self
            .client
            .post(&subscription.endpoint)
            .header("TTL", PUSH_TTL_SECS.to_string())
            .header(
                "Authorization",
                format!("vapid t={}, k={}", token, self.public_key),
            )
            .header("Crypto-Key", format!("p256ecdsa={}", self.public_key))
            .json(message)
            .send()
            .await
            .map_err(|e| TransportError::Transient(format!("push send failed: {}", e)))?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Err(TransportError::Gone);
        }
        Err(TransportError::Transient(format!(
            "push service responded with status: {}",
            status
        )))
    }
}

/// Stand-in used when no VAPID key material is configured. Every send
/// fails transiently, which leaves subscriptions intact and lets the
/// client poller carry the alerts.
pub struct DisabledPushTransport;

#[async_trait::async_trait]
impl IPushTransport for DisabledPushTransport {
    async fn send(
        &self,
        _subscription: &PushSubscription,
        _message: &NotificationMessage,
    ) -> Result<(), TransportError> {
        warn!("Push transport is not configured, dropping push message");
        Err(TransportError::Transient(
            "push transport not configured".into(),
        ))
    }
}

/// Records sends instead of performing them. Used by tests the same
/// way the inmemory repos are.
pub struct InMemoryPushTransport {
    sent: Mutex<Vec<(String, NotificationMessage)>>,
    failures: Mutex<HashMap<String, TransportError>>,
}

impl InMemoryPushTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Make every send to `endpoint` fail with `error`
    pub fn fail_endpoint(&self, endpoint: &str, error: TransportError) {
        self.failures
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), error);
    }

    pub fn sent(&self) -> Vec<(String, NotificationMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryPushTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushTransport for InMemoryPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        message: &NotificationMessage,
    ) -> Result<(), TransportError> {
        if let Some(error) = self.failures.lock().unwrap().get(&subscription.endpoint) {
            return Err(error.clone());
        }
        self.sent
            .lock()
            .unwrap()
            .push((subscription.endpoint.clone(), message.clone()));
        Ok(())
    }
}
