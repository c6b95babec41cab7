use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::scheduling::types::{GuardDecision, SkipReason};

/// Half-open local-time window `[start, end)` in the exchange timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl GuardWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// Wall-clock precondition for a run. Disabled guards always proceed.
#[derive(Debug, Clone, Copy)]
pub struct TimeGuard {
    pub enabled: bool,
    pub window: GuardWindow,
    pub timezone: Tz,
    /// Whether to also skip Saturday/Sunday
    pub weekend_pause: bool,
}

impl TimeGuard {
    pub fn new(enabled: bool, window: GuardWindow, timezone: Tz, weekend_pause: bool) -> Self {
        Self {
            enabled,
            window,
            timezone,
            weekend_pause,
        }
    }

    pub fn check(&self, now: DateTime<Utc>) -> GuardDecision {
        if !self.enabled {
            return GuardDecision::Proceed;
        }

        let local = now.with_timezone(&self.timezone);

        if self.weekend_pause && matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return GuardDecision::Skip(SkipReason::WeekendPause);
        }

        let local_time = local.time();
        if !self.window.contains(local_time) {
            return GuardDecision::Skip(SkipReason::OutsideWindow {
                local_time,
                start: self.window.start,
                end: self.window.end,
            });
        }

        GuardDecision::Proceed
    }
}
