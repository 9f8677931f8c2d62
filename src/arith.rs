//! Calendar unit arithmetic: applies signed deltas to wall-clock fields and
//! reconstructs the instant in the target timezone.
//!
//! Date-class units rebuild the wall calendar date with day overflow rolling
//! into the next month (adding a year to Feb 29 lands on Mar 1); time-class
//! units shift the wall clock. Both funnel through `zone::resolve_wall`, the
//! single wall-time normalization path, so DST folds and gaps are handled the
//! same way everywhere.

use crate::consts::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::types::{Instant, Primitive};
use crate::zone;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use chrono_tz::Tz;

/// Applies a signed delta of one primitive unit. `None` when the result falls
/// outside the representable range, which callers surface as the invalid
/// moment rather than a panic.
pub(crate) fn shift(instant: Instant, tz: Tz, unit: Primitive, amount: i64) -> Option<Instant> {
    let wall = zone::zoned(instant, &tz)?.naive_local();
    let wall = match unit {
        Primitive::Year => set_calendar_date(
            wall,
            i64::from(wall.year()) + amount,
            wall.month0().into(),
            wall.day().into(),
        ),
        Primitive::Month => {
            let months = i64::from(wall.year()) * 12 + i64::from(wall.month0()) + amount;
            set_calendar_date(
                wall,
                months.div_euclid(12),
                months.rem_euclid(12),
                wall.day().into(),
            )
        }
        Primitive::Day => wall.checked_add_signed(TimeDelta::try_days(amount)?),
        Primitive::Hour => wall.checked_add_signed(TimeDelta::try_hours(amount)?),
        Primitive::Minute => wall.checked_add_signed(TimeDelta::try_minutes(amount)?),
        Primitive::Second => wall.checked_add_signed(TimeDelta::try_seconds(amount)?),
        Primitive::Millisecond => wall.checked_add_signed(TimeDelta::try_milliseconds(amount)?),
    }?;
    commit(tz, wall)
}

/// Overwrites one primitive field with an absolute value, keeping the others.
/// Out-of-range values carry: month 13 rolls into the next year, day 0 is the
/// last day of the previous month, hour 24 is midnight of the next day.
pub(crate) fn set_field(instant: Instant, tz: Tz, unit: Primitive, value: i64) -> Option<Instant> {
    let wall = zone::zoned(instant, &tz)?.naive_local();
    let millis = i64::from(wall.nanosecond() / 1_000_000);
    let wall = match unit {
        Primitive::Year => {
            set_calendar_date(wall, value, wall.month0().into(), wall.day().into())
        }
        Primitive::Month => {
            // External 1-based month.
            let months = i64::from(wall.year()) * 12 + value - 1;
            set_calendar_date(
                wall,
                months.div_euclid(12),
                months.rem_euclid(12),
                wall.day().into(),
            )
        }
        Primitive::Day => set_calendar_date(wall, wall.year().into(), wall.month0().into(), value),
        Primitive::Hour => set_wall_time(
            wall,
            value,
            wall.minute().into(),
            wall.second().into(),
            millis,
        ),
        Primitive::Minute => set_wall_time(
            wall,
            wall.hour().into(),
            value,
            wall.second().into(),
            millis,
        ),
        Primitive::Second => set_wall_time(
            wall,
            wall.hour().into(),
            wall.minute().into(),
            value,
            millis,
        ),
        Primitive::Millisecond => set_wall_time(
            wall,
            wall.hour().into(),
            wall.minute().into(),
            wall.second().into(),
            value,
        ),
    }?;
    commit(tz, wall)
}

fn commit(tz: Tz, wall: NaiveDateTime) -> Option<Instant> {
    zone::resolve_wall(&tz, wall).map(|dt| Instant::from_millis(dt.timestamp_millis()))
}

/// Rebuilds a calendar date, rolling an overflowing day into the following
/// month the way a mutable calendar-date setter would.
fn set_calendar_date(
    wall: NaiveDateTime,
    year: i64,
    month0: i64,
    day: i64,
) -> Option<NaiveDateTime> {
    let year = i32::try_from(year).ok()?;
    let month0 = u32::try_from(month0).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let date = first.checked_add_signed(TimeDelta::try_days(day - 1)?)?;
    Some(date.and_time(wall.time()))
}

/// Rebuilds the wall time from midnight, carrying overflow into the date.
fn set_wall_time(
    wall: NaiveDateTime,
    hour: i64,
    minute: i64,
    second: i64,
    millisecond: i64,
) -> Option<NaiveDateTime> {
    let midnight = wall.date().and_hms_opt(0, 0, 0)?;
    let total = hour
        .checked_mul(MS_PER_HOUR)?
        .checked_add(minute.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(second.checked_mul(MS_PER_SECOND)?)?
        .checked_add(millisecond)?;
    midnight.checked_add_signed(TimeDelta::try_milliseconds(total)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant_utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Instant {
        let dt = Tz::UTC.with_ymd_and_hms(y, m, d, h, min, s).unwrap();
        Instant::from_millis(dt.timestamp_millis())
    }

    fn fields(instant: Instant, tz: Tz) -> String {
        let dt = zone::zoned(instant, &tz).unwrap();
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[test]
    fn test_shift_year_leap_day_rolls_to_march() {
        let start = instant_utc(2024, 2, 29, 10, 0, 0);
        let shifted = shift(start, Tz::UTC, Primitive::Year, 1).unwrap();
        assert_eq!(fields(shifted, Tz::UTC), "2025-03-01 10:00:00");
    }

    #[test]
    fn test_shift_month_day_overflow() {
        let start = instant_utc(2024, 1, 31, 0, 0, 0);
        let shifted = shift(start, Tz::UTC, Primitive::Month, 1).unwrap();
        // January 31 + 1 month overflows February into March 2 (leap year).
        assert_eq!(fields(shifted, Tz::UTC), "2024-03-02 00:00:00");
    }

    #[test]
    fn test_shift_month_across_year_boundary() {
        let start = instant_utc(2024, 11, 15, 6, 30, 0);
        let forward = shift(start, Tz::UTC, Primitive::Month, 3).unwrap();
        assert_eq!(fields(forward, Tz::UTC), "2025-02-15 06:30:00");
        let back = shift(start, Tz::UTC, Primitive::Month, -12).unwrap();
        assert_eq!(fields(back, Tz::UTC), "2023-11-15 06:30:00");
    }

    #[test]
    fn test_shift_day_keeps_wall_time_across_dst() {
        // CET springs forward during the night of 2024-03-31.
        let start = zone::resolve_wall(
            &Tz::CET,
            NaiveDate::from_ymd_opt(2024, 3, 30)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
        )
        .map(|dt| Instant::from_millis(dt.timestamp_millis()))
        .unwrap();
        let next = shift(start, Tz::CET, Primitive::Day, 1).unwrap();
        assert_eq!(fields(next, Tz::CET), "2024-03-31 12:00:00");
        // The real elapsed time is 23 hours.
        assert_eq!(next.millis() - start.millis(), 23 * 3_600_000);
    }

    #[test]
    fn test_shift_time_units_round_trip() {
        let start = instant_utc(2024, 5, 15, 10, 30, 0);
        for (unit, amount) in [
            (Primitive::Hour, 5),
            (Primitive::Minute, 90),
            (Primitive::Second, 3601),
            (Primitive::Millisecond, 1500),
        ] {
            let there = shift(start, Tz::UTC, unit, amount).unwrap();
            let back = shift(there, Tz::UTC, unit, -amount).unwrap();
            assert_eq!(back, start, "{unit:?}");
        }
    }

    #[test]
    fn test_shift_out_of_range_is_none() {
        let start = instant_utc(2024, 1, 1, 0, 0, 0);
        assert_eq!(shift(start, Tz::UTC, Primitive::Year, 1_000_000), None);
    }

    #[test]
    fn test_set_field_carries_overflow() {
        let start = instant_utc(2024, 5, 15, 10, 30, 0);
        let set = set_field(start, Tz::UTC, Primitive::Month, 13).unwrap();
        assert_eq!(fields(set, Tz::UTC), "2025-01-15 10:30:00");
        let set = set_field(start, Tz::UTC, Primitive::Day, 0).unwrap();
        assert_eq!(fields(set, Tz::UTC), "2024-04-30 10:30:00");
        let set = set_field(start, Tz::UTC, Primitive::Hour, 24).unwrap();
        assert_eq!(fields(set, Tz::UTC), "2024-05-16 00:30:00");
    }

    #[test]
    fn test_set_field_plain_values() {
        let start = instant_utc(2024, 5, 15, 10, 30, 0);
        let set = set_field(start, Tz::UTC, Primitive::Year, 1999).unwrap();
        assert_eq!(fields(set, Tz::UTC), "1999-05-15 10:30:00");
        let set = set_field(start, Tz::UTC, Primitive::Minute, 0).unwrap();
        assert_eq!(fields(set, Tz::UTC), "2024-05-15 10:00:00");
    }
}
