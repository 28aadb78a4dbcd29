use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;
const MILLIS_PER_WEEK: i64 = MILLIS_PER_DAY * 7;

/// Upper bound for the user supplied interval. A reminder repeating
/// less often than every 1000 years is a data entry error.
const MAX_INTERVAL: u32 = 1000;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// How often a `Reminder` repeats after its base `fire_time`.
///
/// Daily and weekly steps are fixed length. Monthly and yearly steps
/// follow the civil calendar in UTC: the day of month is taken from the
/// base occurrence and clamped to the last day of the target month when
/// that month is shorter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub unit: RecurrenceUnit,
    pub interval: u32,
}

impl Recurrence {
    pub fn is_valid(&self) -> bool {
        self.interval >= 1 && self.interval <= MAX_INTERVAL
    }

    /// Returns the smallest `base + k * interval` (`k >= 0`, in this
    /// rule's unit) that is strictly greater than `now`. Both
    /// timestamps are unix millis. Every candidate is derived from
    /// `base`, never from a previously clamped step, so a reminder
    /// anchored on the 31st returns to the 31st in long months.
    ///
    /// Monthly and yearly rules step through the missed occurrences one
    /// by one, so the cost is proportional to how stale `base` is.
    /// Returns `None` only when the timestamps fall outside the
    /// supported calendar range.
    pub fn next_occurrence(&self, base: i64, now: i64) -> Option<i64> {
        if !self.is_valid() {
            return None;
        }
        if base > now {
            return Some(base);
        }

        match self.unit {
            RecurrenceUnit::Daily => {
                Some(next_fixed_step(base, now, self.interval as i64 * MILLIS_PER_DAY))
            }
            RecurrenceUnit::Weekly => {
                Some(next_fixed_step(base, now, self.interval as i64 * MILLIS_PER_WEEK))
            }
            RecurrenceUnit::Monthly => next_calendar_step(base, now, self.interval as i64),
            RecurrenceUnit::Yearly => next_calendar_step(base, now, self.interval as i64 * 12),
        }
    }
}

fn next_fixed_step(base: i64, now: i64, step: i64) -> i64 {
    let missed = (now - base) / step;
    base + (missed + 1) * step
}

fn next_calendar_step(base: i64, now: i64, step_months: i64) -> Option<i64> {
    let base_dt = Utc.timestamp_millis_opt(base).single()?;
    let base_day = base_dt.day();
    let time = base_dt.time();
    let base_months = base_dt.year() as i64 * 12 + base_dt.month0() as i64;

    let mut k: i64 = 1;
    loop {
        let total = base_months + k * step_months;
        let year = total.div_euclid(12);
        if year < i32::MIN as i64 || year > i32::MAX as i64 {
            return None;
        }
        let year = year as i32;
        let month = (total.rem_euclid(12) + 1) as u32;
        let day = base_day.min(days_in_month(year, month)?);
        let date = NaiveDate::from_ymd_opt(year, month, day)?.and_time(time);
        let candidate = Utc.from_utc_datetime(&date).timestamp_millis();
        if candidate > now {
            return Some(candidate);
        }
        k += 1;
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.pred_opt()?.day())
}
