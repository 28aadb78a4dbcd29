use crate::shared::entity::{Entity, ID};

/// A `PushSubscription` is the addressing and credential bundle that
/// lets the server deliver a message to one specific device without an
/// open connection. One user may hold several, one per device. The
/// `(owner_id, endpoint)` pair is unique: a device subscribing again
/// refreshes its record instead of duplicating it.
#[derive(Debug, Clone, PartialEq)]
pub struct PushSubscription {
    pub id: ID,
    pub owner_id: ID,
    /// Transport specific delivery address for this device
    pub endpoint: String,
    /// Client generated authentication secret
    pub auth_secret: String,
    /// The p256dh public key of the device
    pub encryption_key: String,
}

impl PushSubscription {
    pub fn new(
        owner_id: ID,
        endpoint: String,
        auth_secret: String,
        encryption_key: String,
    ) -> anyhow::Result<Self> {
        let parsed = url::Url::parse(&endpoint)
            .map_err(|_| anyhow::anyhow!("Invalid push endpoint url: {}", endpoint))?;
        let allowed_schemes = vec!["https", "http"];
        if !allowed_schemes.contains(&parsed.scheme()) {
            anyhow::bail!("Invalid push endpoint scheme: {}", parsed.scheme());
        }
        if auth_secret.is_empty() || encryption_key.is_empty() {
            anyhow::bail!("Push subscription key material must not be empty");
        }

        Ok(Self {
            id: Default::default(),
            owner_id,
            endpoint,
            auth_secret,
            encryption_key,
        })
    }
}

impl Entity for PushSubscription {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_https_endpoint() {
        let sub = PushSubscription::new(
            ID::new(),
            "https://fcm.googleapis.com/fcm/send/abc123".into(),
            "auth".into(),
            "p256dh".into(),
        );
        assert!(sub.is_ok());
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(PushSubscription::new(ID::new(), "not a url".into(), "a".into(), "k".into()).is_err());
        assert!(
            PushSubscription::new(ID::new(), "ftp://push.example".into(), "a".into(), "k".into())
                .is_err()
        );
    }

    #[test]
    fn rejects_empty_key_material() {
        assert!(PushSubscription::new(
            ID::new(),
            "https://push.example/send/1".into(),
            "".into(),
            "k".into()
        )
        .is_err());
    }
}
