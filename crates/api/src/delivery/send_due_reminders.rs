use crate::error::RemindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use futures::stream::{self, StreamExt};
use remind_api_structs::check_due_reminders::*;
use remind_domain::{NotificationMessage, PushSubscription, Reminder};
use remind_infra::{Context, TimeWindow, TransportError};
use tracing::{error, info};

/// Stateless entry point for the external minutely trigger. Safe to hit
/// twice in a row: a reminder that was already marked sent by the first
/// invocation is simply not part of the second one's due set.
pub async fn check_due_reminders_controller(
    ctx: web::Data<Context>,
) -> Result<HttpResponse, RemindError> {
    let usecase = SendDueRemindersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|report| {
            HttpResponse::Ok().json(APIResponse {
                checked: report.checked,
                sent: report.sent,
            })
        })
        .map_err(RemindError::from)
}

#[derive(Debug)]
pub struct SendDueRemindersUseCase {}

#[derive(Debug)]
pub struct DeliveryReport {
    /// Due reminders considered in this invocation
    pub checked: usize,
    /// Push transmissions accepted by a push service
    pub sent: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = DeliveryReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    /// This runs every minute, triggered externally or by the optional
    /// in-process job
    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let window = TimeWindow::around(
            now,
            ctx.config.delivery_window_millis,
            ctx.config.delivery_window_millis,
        );

        // A fetch failure aborts the whole invocation, the next cycle
        // retries naturally
        let due = ctx
            .repos
            .reminders
            .find_due_in_window(&window)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let checked = due.len();
        let mut sent = 0;
        for reminder in due {
            sent += deliver_reminder(&reminder, ctx).await;
        }

        info!(
            "Delivery sweep done, checked: {} reminder(s), sent: {} push message(s)",
            checked, sent
        );
        Ok(DeliveryReport { checked, sent })
    }
}

/// Fans the reminder out to every subscription of its owner and records
/// the delivery attempt. Returns the number of accepted transmissions.
async fn deliver_reminder(reminder: &Reminder, ctx: &Context) -> usize {
    let subscriptions = match ctx
        .repos
        .push_subscriptions
        .find_by_owner(&reminder.owner_id)
        .await
    {
        Ok(subscriptions) => subscriptions,
        Err(e) => {
            // leave the reminder unsent so the next cycle retries it
            error!(
                "Unable to fetch push subscriptions for reminder: {}. Error: {:?}",
                reminder.id, e
            );
            return 0;
        }
    };

    // No addressable device: the reminder stays unsent and the client
    // poller picks it up on next app open
    if subscriptions.is_empty() {
        return 0;
    }

    let message = NotificationMessage::from_due_reminder(reminder);
    let sent = stream::iter(subscriptions)
        .map(|subscription| {
            let message = message.clone();
            async move { send_to_subscription(subscription, message, ctx).await }
        })
        .buffer_unordered(ctx.config.delivery_concurrency_limit)
        .filter(|delivered| futures::future::ready(*delivered))
        .count()
        .await;

    mark_sent_with_retry(reminder, ctx).await;
    sent
}

/// One push transmission, isolated so a failing endpoint never aborts
/// its siblings
async fn send_to_subscription(
    subscription: PushSubscription,
    message: NotificationMessage,
    ctx: &Context,
) -> bool {
    match ctx.push.send(&subscription, &message).await {
        Ok(()) => true,
        Err(TransportError::Gone) => {
            // the push service told us this device no longer exists
            info!(
                "Push endpoint gone, removing subscription: {}",
                subscription.endpoint
            );
            ctx.repos
                .push_subscriptions
                .delete_by_endpoint(&subscription.owner_id, &subscription.endpoint)
                .await;
            false
        }
        Err(TransportError::Transient(e)) => {
            error!(
                "Transient push failure for endpoint: {}. Error: {}",
                subscription.endpoint, e
            );
            false
        }
    }
}

/// The `sent` flag is the only guard against eternal re-alerting, so a
/// failed write is retried once and then escalated in the logs.
async fn mark_sent_with_retry(reminder: &Reminder, ctx: &Context) {
    let sent_at = ctx.sys.get_timestamp_millis();
    if ctx
        .repos
        .reminders
        .mark_sent(&reminder.id, sent_at)
        .await
        .is_ok()
    {
        return;
    }
    error!(
        "Unable to mark reminder: {} as sent, retrying once",
        reminder.id
    );
    if let Err(e) = ctx.repos.reminders.mark_sent(&reminder.id, sent_at).await {
        error!(
            "IMPORTANT: reminder: {} could not be marked as sent and will alert again next cycle. Error: {:?}",
            reminder.id, e
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use remind_domain::ID;
    use remind_infra::{setup_context_inmemory, InMemoryPushTransport, ISys};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    fn setup() -> (Context, Arc<InMemoryPushTransport>) {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let transport = Arc::new(InMemoryPushTransport::new());
        ctx.push = transport.clone();
        (ctx, transport)
    }

    async fn insert_subscription(ctx: &Context, owner_id: &ID, endpoint: &str) -> PushSubscription {
        let subscription = PushSubscription::new(
            owner_id.clone(),
            endpoint.into(),
            "auth".into(),
            "p256dh".into(),
        )
        .unwrap();
        ctx.repos
            .push_subscriptions
            .upsert(&subscription)
            .await
            .unwrap();
        subscription
    }

    #[actix_web::test]
    async fn sends_once_and_marks_sent() {
        let (ctx, transport) = setup();
        let owner_id = ID::new();
        insert_subscription(&ctx, &owner_id, "https://push.example/send/1").await;

        let reminder = Reminder::new(owner_id, ID::new(), NOW - 30 * 1000, None);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let report = SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(transport.sent().len(), 1);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(stored.sent);
        assert_eq!(stored.sent_at, Some(NOW));

        // an immediately following invocation is a no-op
        let report = SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();
        assert_eq!(report.checked, 0);
        assert_eq!(report.sent, 0);
        assert_eq!(transport.sent().len(), 1);
    }

    #[actix_web::test]
    async fn push_payload_references_the_reminder() {
        let (ctx, transport) = setup();
        let owner_id = ID::new();
        insert_subscription(&ctx, &owner_id, "https://push.example/send/1").await;

        let reminder = Reminder::new(owner_id, ID::new(), NOW, None);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].1.data.reminder_id, Some(reminder.id));
        assert_eq!(sent[0].1.data.item_id, Some(reminder.item_id));
    }

    #[actix_web::test]
    async fn without_subscriptions_the_reminder_stays_unsent() {
        // Owner has no device: the client poller is their only path, so
        // the sweep must not consume the reminder
        let (ctx, transport) = setup();
        let reminder = Reminder::new(ID::new(), ID::new(), NOW - 1000, None);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let report = SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.sent, 0);
        assert!(transport.sent().is_empty());

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(!stored.sent);
    }

    #[actix_web::test]
    async fn gone_endpoint_is_removed_and_siblings_still_receive() {
        let (ctx, transport) = setup();
        let owner_id = ID::new();
        insert_subscription(&ctx, &owner_id, "https://push.example/send/stale").await;
        insert_subscription(&ctx, &owner_id, "https://push.example/send/active").await;
        transport.fail_endpoint("https://push.example/send/stale", TransportError::Gone);

        let reminder = Reminder::new(owner_id.clone(), ID::new(), NOW, None);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let report = SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();
        assert_eq!(report.sent, 1);

        let remaining = ctx
            .repos
            .push_subscriptions
            .find_by_owner(&owner_id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].endpoint, "https://push.example/send/active");

        // the attempt was made, so the reminder is consumed
        assert!(ctx.repos.reminders.find(&reminder.id).await.unwrap().sent);
    }

    #[actix_web::test]
    async fn transient_failure_keeps_the_subscription_but_consumes_the_reminder() {
        let (ctx, transport) = setup();
        let owner_id = ID::new();
        insert_subscription(&ctx, &owner_id, "https://push.example/send/flaky").await;
        transport.fail_endpoint(
            "https://push.example/send/flaky",
            TransportError::Transient("503".into()),
        );

        let reminder = Reminder::new(owner_id.clone(), ID::new(), NOW, None);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let report = SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.sent, 0);

        let remaining = ctx
            .repos
            .push_subscriptions
            .find_by_owner(&owner_id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        // a missed push degrades to "seen on next app open", it must not
        // cause a resend storm
        assert!(ctx.repos.reminders.find(&reminder.id).await.unwrap().sent);
    }

    #[actix_web::test]
    async fn reminders_outside_the_window_are_left_alone() {
        let (ctx, transport) = setup();
        let owner_id = ID::new();
        insert_subscription(&ctx, &owner_id, "https://push.example/send/1").await;

        let too_old = Reminder::new(owner_id.clone(), ID::new(), NOW - 10 * 60 * 1000, None);
        let too_far = Reminder::new(owner_id, ID::new(), NOW + 10 * 60 * 1000, None);
        ctx.repos.reminders.insert(&too_old).await.unwrap();
        ctx.repos.reminders.insert(&too_far).await.unwrap();

        let report = SendDueRemindersUseCase {}.execute(&ctx).await.unwrap();
        assert_eq!(report.checked, 0);
        assert!(transport.sent().is_empty());
    }
}
