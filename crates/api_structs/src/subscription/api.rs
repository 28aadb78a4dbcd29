use crate::dtos::PushSubscriptionDTO;
use serde::{Deserialize, Serialize};

pub mod get_push_key {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Base64url encoded VAPID public key for
        /// `PushManager.subscribe`
        pub public_key: String,
    }
}

pub mod create_push_subscription {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub endpoint: String,
        pub auth_secret: String,
        pub encryption_key: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub subscription: PushSubscriptionDTO,
    }
}

pub mod delete_push_subscription {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub endpoint: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub subscription: Option<PushSubscriptionDTO>,
    }
}
