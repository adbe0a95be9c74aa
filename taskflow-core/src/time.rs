//! Time utilities: timezone-aware deadlines and calendar-day boundaries.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ScheduleError;

pub fn parse_timezone(tz: &str) -> Result<Tz, ScheduleError> {
    tz.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(tz.to_string()))
}

/// Parse a deadline given either as RFC3339 ("2026-02-20T23:59:00Z") or as a
/// local wall-clock time like "2026-02-20 23:59" in `tz`, returning UTC.
pub fn parse_deadline(input: &str, tz: Tz) -> Result<DateTime<Utc>, ScheduleError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let invalid = |reason: String| ScheduleError::InvalidDeadline {
        input: input.to_string(),
        reason,
    };

    let ndt = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .map_err(|e| invalid(e.to_string()))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| invalid(format!("ambiguous or nonexistent local time in {} (DST?)", tz.name())))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// First instant of `date` in `tz`, as UTC.
///
/// If local midnight falls into a DST gap, the first valid hour after it is used.
/// `None` only at the edge of the representable calendar.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::default());
    (0..4)
        .find_map(|shift| {
            let local = midnight.checked_add_signed(Duration::hours(shift))?;
            tz.from_local_datetime(&local).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Start of the calendar day `days` after the one `instant` falls on in `tz`.
///
/// Returns `None` when that day is past the last representable date, so the
/// result is always strictly later than `instant` for `days >= 1`.
pub fn start_of_day_after(instant: DateTime<Utc>, days: u64, tz: Tz) -> Option<DateTime<Utc>> {
    let local_date = instant.with_timezone(&tz).date_naive();
    let target = local_date.checked_add_days(Days::new(days))?;
    start_of_day(target, tz)
}

/// Start of the calendar day following the one `instant` falls on in `tz`.
pub fn start_of_next_day(instant: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    start_of_day_after(instant, 1, tz)
}

/// Signed distance from `from` to `to` in fractional minutes.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 60.0
}

pub fn format_local(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}
