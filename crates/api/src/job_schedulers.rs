use crate::delivery::send_due_reminders::SendDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep};
use remind_infra::Context;
use std::time::Duration;

/// Seconds until the next minute boundary, so the in-process sweep
/// fires at the same cadence an external cron trigger would
pub fn get_start_delay(now_ts: i64) -> u64 {
    (60 - (now_ts / 1000) % 60) as u64
}

/// Optional in-process replacement for the external trigger. Running it
/// alongside the external caller only produces double invocations,
/// which the sweep is idempotent against.
pub fn start_delivery_sweep_job(ctx: Context) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        sleep(Duration::from_secs(get_start_delay(now))).await;

        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;

            let usecase = SendDueRemindersUseCase {};
            let _ = execute(usecase, &ctx).await;
        }
    });
}
