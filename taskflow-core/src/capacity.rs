//! Capacity model: a virtual clock that spends a per-day minute budget.
//!
//! Day boundaries are calendar midnights in the configured timezone. Work on a
//! given day stops when either its budget is spent or the day ends, whichever
//! comes first; the clock then jumps to the next midnight with a fresh budget.
//!
//! Long tasks skip whole days arithmetically instead of walking them one by
//! one. Past the last representable date the clock saturates at
//! [`DateTime::<Utc>::MAX_UTC`] and stays there.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::time::{start_of_day_after, start_of_next_day};

/// Validated minutes of work available per day, within `[30, 1440]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct DailyCapacity(u32);

impl DailyCapacity {
    pub const MIN: u32 = 30;
    pub const MAX: u32 = 1440;

    pub fn new(minutes: i64) -> Result<Self, ScheduleError> {
        if minutes < Self::MIN as i64 || minutes > Self::MAX as i64 {
            return Err(ScheduleError::InvalidCapacity {
                got: minutes,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(minutes as u32))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for DailyCapacity {
    type Error = ScheduleError;

    fn try_from(minutes: i64) -> Result<Self, Self::Error> {
        Self::new(minutes)
    }
}

impl From<DailyCapacity> for u32 {
    fn from(c: DailyCapacity) -> Self {
        c.0
    }
}

impl fmt::Display for DailyCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min/day", self.0)
    }
}

/// Shortest calendar day any zone produces, DST transitions included.
/// Budgets up to this length are spent in full on every whole day.
const SHORTEST_DAY_MINUTES: u32 = 22 * 60;

/// Cursor over the day-bounded budget. One instance per simulation run.
#[derive(Debug, Clone)]
pub struct CapacityModel {
    tz: Tz,
    per_day: u32,
    cursor: DateTime<Utc>,
    day_end: DateTime<Utc>,
    remaining_today: u32,
}

impl CapacityModel {
    /// The first day starts at `now` with its full budget.
    pub fn new(capacity: DailyCapacity, now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            tz,
            per_day: capacity.minutes(),
            cursor: now,
            day_end: start_of_next_day(now, tz).unwrap_or(DateTime::<Utc>::MAX_UTC),
            remaining_today: capacity.minutes(),
        }
    }

    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }

    pub fn remaining_today(&self) -> u32 {
        self.remaining_today
    }

    /// True once the clock has run off the end of the calendar.
    pub fn is_saturated(&self) -> bool {
        self.cursor == DateTime::<Utc>::MAX_UTC
    }

    /// Spend `minutes` of work and return the instant it completes.
    ///
    /// Work longer than what is left today continues at the start of the next
    /// day, possibly over several days.
    pub fn consume(&mut self, minutes: u32) -> DateTime<Utc> {
        let mut left = i64::from(minutes);

        while left > 0 && !self.is_saturated() {
            let window = self.usable_today();
            if window == 0 {
                let skipped = self.whole_days_before_last(left);
                self.roll_over(skipped);
                left -= skipped as i64 * i64::from(self.per_day);
                continue;
            }

            let step = left.min(window);
            let Some(next) = self.cursor.checked_add_signed(Duration::minutes(step)) else {
                self.saturate();
                break;
            };
            self.cursor = next;
            self.remaining_today -= step as u32;
            left -= step;
        }

        self.cursor
    }

    /// Minutes that can still be worked before either the budget or the day runs out.
    fn usable_today(&self) -> i64 {
        let until_midnight = (self.day_end - self.cursor).num_minutes().max(0);
        i64::from(self.remaining_today).min(until_midnight)
    }

    /// Fresh days that `left` minutes fill completely, leaving a final day
    /// with between 1 and `per_day` minutes. Zero when a DST-shortened day
    /// could cut a full budget short; those days are walked individually.
    fn whole_days_before_last(&self, left: i64) -> u64 {
        if self.per_day > SHORTEST_DAY_MINUTES {
            return 0;
        }
        ((left - 1) / i64::from(self.per_day)) as u64
    }

    /// Move to the start of the day `skipped` days after the next one, with a
    /// fresh budget.
    fn roll_over(&mut self, skipped: u64) {
        if self.day_end == DateTime::<Utc>::MAX_UTC {
            self.saturate();
            return;
        }
        let start = match skipped {
            0 => Some(self.day_end),
            n => start_of_day_after(self.day_end, n, self.tz),
        };
        let Some(start) = start else {
            self.saturate();
            return;
        };

        self.cursor = start;
        self.day_end = start_of_next_day(start, self.tz).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.remaining_today = self.per_day;
    }

    fn saturate(&mut self) {
        self.cursor = DateTime::<Utc>::MAX_UTC;
        self.day_end = DateTime::<Utc>::MAX_UTC;
        self.remaining_today = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    fn cap(minutes: i64) -> DailyCapacity {
        DailyCapacity::new(minutes).unwrap()
    }

    #[test]
    fn capacity_bounds() {
        assert!(DailyCapacity::new(30).is_ok());
        assert!(DailyCapacity::new(1440).is_ok());
        assert!(matches!(
            DailyCapacity::new(29),
            Err(ScheduleError::InvalidCapacity { got: 29, .. })
        ));
        assert!(DailyCapacity::new(1441).is_err());
        assert!(DailyCapacity::new(-480).is_err());
    }

    #[test]
    fn capacity_deserializes_through_validation() {
        let ok: DailyCapacity = serde_json::from_str("480").unwrap();
        assert_eq!(ok.minutes(), 480);
        assert!(serde_json::from_str::<DailyCapacity>("10").is_err());
    }

    #[test]
    fn consume_within_one_day() {
        let mut model = CapacityModel::new(cap(480), at(9, 0), Tz::UTC);
        assert_eq!(model.consume(60), at(10, 0));
        assert_eq!(model.consume(90), at(11, 30));
        assert_eq!(model.remaining_today(), 330);
    }

    #[test]
    fn budget_exhaustion_moves_to_next_midnight() {
        let mut model = CapacityModel::new(cap(120), at(9, 0), Tz::UTC);
        assert_eq!(model.consume(120), at(11, 0));
        // Nothing left today: next task starts at 00:00 tomorrow.
        let done = model.consume(30);
        assert_eq!(done, Utc.with_ymd_and_hms(2026, 3, 3, 0, 30, 0).unwrap());
    }

    #[test]
    fn long_task_spans_several_days() {
        let mut model = CapacityModel::new(cap(60), at(9, 0), Tz::UTC);
        // 60 today, 60 on the 3rd, 30 on the 4th.
        let done = model.consume(150);
        assert_eq!(done, Utc.with_ymd_and_hms(2026, 3, 4, 0, 30, 0).unwrap());
    }

    #[test]
    fn day_end_caps_first_day() {
        // 23:00 start: only 60 minutes remain in the calendar day.
        let mut model = CapacityModel::new(cap(480), at(23, 0), Tz::UTC);
        let done = model.consume(90);
        assert_eq!(done, Utc.with_ymd_and_hms(2026, 3, 3, 0, 30, 0).unwrap());
        assert_eq!(model.remaining_today(), 450);
    }

    #[test]
    fn rollover_uses_configured_zone() {
        // Bucharest is UTC+2 in early March: local midnight is 22:00 UTC.
        let tz: Tz = "Europe/Bucharest".parse().unwrap();
        let mut model = CapacityModel::new(cap(60), at(20, 0), tz);
        model.consume(60);
        let done = model.consume(30);
        assert_eq!(done, at(22, 30));
    }

    #[test]
    fn whole_days_are_skipped_exactly() {
        let mut model = CapacityModel::new(cap(30), at(9, 0), Tz::UTC);
        // 30 today, then 17_519 fresh days starting on the 3rd; the last one
        // takes the final 30 minutes.
        let done = model.consume(525_600);
        let last_day = NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .checked_add_days(Days::new(17_518))
            .unwrap();
        assert_eq!(done, Utc.from_utc_datetime(&last_day.and_hms_opt(0, 30, 0).unwrap()));
        assert_eq!(model.remaining_today(), 0);
    }

    #[test]
    fn skipping_matches_day_by_day_walk() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).unwrap();
        let mut skipping = CapacityModel::new(cap(45), start, tz);
        let done = skipping.consume(45 * 20 + 10);

        let mut walking = CapacityModel::new(cap(45), start, tz);
        for _ in 0..20 {
            walking.consume(45);
        }
        assert_eq!(done, walking.consume(10));
    }

    #[test]
    fn huge_task_at_minimum_capacity_saturates() {
        // u32::MAX minutes at 30 a day runs past the end of the calendar.
        let mut model = CapacityModel::new(cap(30), at(9, 0), Tz::UTC);
        assert_eq!(model.consume(2_900_000_000), DateTime::<Utc>::MAX_UTC);
        assert!(model.is_saturated());
        // Later work cannot move the clock backwards.
        assert_eq!(model.consume(30), DateTime::<Utc>::MAX_UTC);

        let mut model = CapacityModel::new(cap(30), at(9, 0), Tz::UTC);
        assert_eq!(model.consume(u32::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn clock_saturates_on_last_calendar_day() {
        let last = Utc.from_utc_datetime(&NaiveDate::MAX.and_hms_opt(12, 0, 0).unwrap());
        let mut model = CapacityModel::new(cap(60), last, Tz::UTC);
        assert_eq!(model.consume(60), last + Duration::minutes(60));
        // No next day to roll into.
        assert_eq!(model.consume(1), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn zero_minutes_does_not_move_clock() {
        let mut model = CapacityModel::new(cap(30), at(9, 0), Tz::UTC);
        assert_eq!(model.consume(0), at(9, 0));
    }
}
