/// Inclusive timestamp range in unix millis used for due-reminder
/// queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// Window centered on `now`, reaching `lookback` millis into the
    /// past and `lookahead` millis into the future.
    pub fn around(now: i64, lookback: i64, lookahead: i64) -> Self {
        Self {
            start: now - lookback,
            end: now + lookahead,
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts <= self.end
    }
}
