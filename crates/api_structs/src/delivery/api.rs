use serde::{Deserialize, Serialize};

pub mod check_due_reminders {
    use super::*;

    /// Summary of one delivery sweep
    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Number of due reminders considered in this invocation
        pub checked: usize,
        /// Number of push transmissions accepted by a push service
        pub sent: usize,
    }
}
