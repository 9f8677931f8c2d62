use crate::MomentError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
};
use crate::prelude::*;
use chrono::{DateTime, Datelike, NaiveDate, Offset, TimeDelta, Timelike};
use chrono_tz::Tz;
use std::str::FromStr;

/// A timezone-independent point in time: milliseconds since the Unix epoch.
///
/// Immutable once constructed; all arithmetic produces a new `Instant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(i64);

impl Instant {
    /// Creates an instant from milliseconds since the Unix epoch.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the instant as milliseconds since the Unix epoch.
    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }
}

/// A calendar field readable from a `Moment`.
///
/// Closed enumeration: unknown names only exist at the string boundary
/// (`Field::from_str`), everything past it is exhaustiveness-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    /// Month number, 1 (January) to 12 (December).
    Month,
    Day,
    /// Day of week, 0 (Sunday) to 6 (Saturday).
    Weekday,
    Hour,
    Minute,
    Second,
    Millisecond,
    /// Unsupported precision; reading it always fails.
    Microsecond,
    /// Day of year, 0-based.
    DayOfYear,
    /// Whole seconds since the Unix epoch.
    Timestamp,
}

impl FromStr for Field {
    type Err = MomentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "year" => Self::Year,
            "month" => Self::Month,
            "day" | "date" => Self::Day,
            "weekday" | "day_of_week" | "dayofweek" => Self::Weekday,
            "hour" => Self::Hour,
            "minute" => Self::Minute,
            "second" => Self::Second,
            "millisecond" => Self::Millisecond,
            "microsecond" => Self::Microsecond,
            "day_of_year" | "dayofyear" => Self::DayOfYear,
            "timestamp" | "unix" => Self::Timestamp,
            _ => return Err(MomentError::UnknownField(s.to_owned())),
        })
    }
}

/// A calendar unit accepted by the arithmetic engine.
///
/// Compound units normalize onto primitives through a fixed factor table:
/// millennium/century/decade are 1000/100/10 years, a quarter is 3 months,
/// a week is 7 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Unit {
    #[display(fmt = "millennium")]
    Millennium,
    #[display(fmt = "century")]
    Century,
    #[display(fmt = "decade")]
    Decade,
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "quarter")]
    Quarter,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "week")]
    Week,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "second")]
    Second,
    #[display(fmt = "millisecond")]
    Millisecond,
    /// Unsupported precision; every arithmetic use fails.
    #[display(fmt = "microsecond")]
    Microsecond,
}

/// The primitive units the arithmetic engine actually applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Primitive {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Unit {
    /// Rewrites a compound unit and amount onto its primitive.
    /// `None` for microseconds, which have no primitive mapping.
    pub(crate) const fn normalize(self, amount: i64) -> Option<(Primitive, i64)> {
        match self {
            Self::Millennium => Some((Primitive::Year, amount.saturating_mul(1_000))),
            Self::Century => Some((Primitive::Year, amount.saturating_mul(100))),
            Self::Decade => Some((Primitive::Year, amount.saturating_mul(10))),
            Self::Year => Some((Primitive::Year, amount)),
            Self::Quarter => Some((Primitive::Month, amount.saturating_mul(3))),
            Self::Month => Some((Primitive::Month, amount)),
            Self::Week => Some((Primitive::Day, amount.saturating_mul(7))),
            Self::Day => Some((Primitive::Day, amount)),
            Self::Hour => Some((Primitive::Hour, amount)),
            Self::Minute => Some((Primitive::Minute, amount)),
            Self::Second => Some((Primitive::Second, amount)),
            Self::Millisecond => Some((Primitive::Millisecond, amount)),
            Self::Microsecond => None,
        }
    }

    /// The primitive a unit can be set to directly; compound units and
    /// microseconds have none.
    pub(crate) const fn as_primitive(self) -> Option<Primitive> {
        match self {
            Self::Year => Some(Primitive::Year),
            Self::Month => Some(Primitive::Month),
            Self::Day => Some(Primitive::Day),
            Self::Hour => Some(Primitive::Hour),
            Self::Minute => Some(Primitive::Minute),
            Self::Second => Some(Primitive::Second),
            Self::Millisecond => Some(Primitive::Millisecond),
            Self::Millennium
            | Self::Century
            | Self::Decade
            | Self::Quarter
            | Self::Week
            | Self::Microsecond => None,
        }
    }
}

impl FromStr for Unit {
    type Err = MomentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "millennium" | "millennia" | "millenniums" => Self::Millennium,
            "century" | "centuries" => Self::Century,
            "decade" | "decades" => Self::Decade,
            "year" | "years" => Self::Year,
            "quarter" | "quarters" => Self::Quarter,
            "month" | "months" => Self::Month,
            "week" | "weeks" => Self::Week,
            "day" | "days" => Self::Day,
            "hour" | "hours" => Self::Hour,
            "minute" | "minutes" => Self::Minute,
            "second" | "seconds" => Self::Second,
            "millisecond" | "milliseconds" | "ms" => Self::Millisecond,
            "microsecond" | "microseconds" | "us" => Self::Microsecond,
            _ => return Err(MomentError::UnknownUnit(s.to_owned())),
        })
    }
}

/// Wall-clock fields of an instant as observed in one timezone.
///
/// Derived, never stored: recomputed on every formatting call so a moment can
/// never go stale against the timezone database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldSet {
    pub year: i32,
    /// 0-based month, January = 0.
    pub month0: u32,
    pub day: u32,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u32,
    /// 0-based day of year.
    pub day_of_year: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    /// UTC offset in seconds, east positive.
    pub offset_seconds: i32,
}

impl FieldSet {
    pub(crate) fn from_zoned(dt: &DateTime<Tz>) -> Self {
        Self {
            year: dt.year(),
            month0: dt.month0(),
            day: dt.day(),
            weekday: dt.weekday().num_days_from_sunday(),
            day_of_year: dt.ordinal0(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            millisecond: dt.timestamp_subsec_millis(),
            offset_seconds: dt.offset().fix().local_minus_utc(),
        }
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!(month != 0 && month <= 12);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// English ordinal suffix for a day of month.
pub const fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// ISO-8601 week number via the Thursday-of-week rule: shift the date to the
/// Thursday of its ISO week, then count whole weeks from that year's January 1.
pub(crate) fn iso_week(date: NaiveDate) -> u32 {
    let monday0 = i64::from(date.weekday().num_days_from_monday());
    let thursday = TimeDelta::try_days(3 - monday0)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(date);
    thursday.ordinal0() / 7 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_leap_year_cases() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2021));
        assert!(!is_leap_year(2023));
        // Century years not divisible by 400
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        // Divisible by 400
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2400));
    }

    #[test]
    fn test_days_in_month() {
        for month in [1, 3, 5, 7, 8, 10, 12] {
            assert_eq!(days_in_month(2023, month), 31, "month {month}");
        }
        for month in [4, 6, 9, 11] {
            assert_eq!(days_in_month(2023, month), 30, "month {month}");
        }
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn test_iso_week_thursday_rule() {
        // 2024-02-29 is a Thursday in ISO week 9.
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(iso_week(date), 9);

        // 2024-01-01 is a Monday, week 1.
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(iso_week(date), 1);

        // 2024-12-31 is a Tuesday belonging to week 1 of 2025.
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(iso_week(date), 1);

        // 2021-01-01 is a Friday belonging to week 53 of 2020.
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(iso_week(date), 53);
    }

    #[test]
    fn test_unit_normalize_factors() {
        assert_eq!(Unit::Millennium.normalize(1), Some((Primitive::Year, 1000)));
        assert_eq!(Unit::Century.normalize(2), Some((Primitive::Year, 200)));
        assert_eq!(Unit::Decade.normalize(-3), Some((Primitive::Year, -30)));
        assert_eq!(Unit::Quarter.normalize(2), Some((Primitive::Month, 6)));
        assert_eq!(Unit::Week.normalize(4), Some((Primitive::Day, 28)));
        assert_eq!(Unit::Hour.normalize(5), Some((Primitive::Hour, 5)));
        assert_eq!(Unit::Microsecond.normalize(1), None);
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("week".parse::<Unit>().unwrap(), Unit::Week);
        assert_eq!("Weeks".parse::<Unit>().unwrap(), Unit::Week);
        assert_eq!("centuries".parse::<Unit>().unwrap(), Unit::Century);
        assert_eq!("ms".parse::<Unit>().unwrap(), Unit::Millisecond);
        let err = "fortnight".parse::<Unit>().unwrap_err();
        assert!(matches!(err, MomentError::UnknownUnit(_)));
        assert_eq!(err.to_string(), "Unknown unit: fortnight");
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("year".parse::<Field>().unwrap(), Field::Year);
        assert_eq!("day_of_week".parse::<Field>().unwrap(), Field::Weekday);
        assert_eq!("unix".parse::<Field>().unwrap(), Field::Timestamp);
        assert!(matches!(
            "era".parse::<Field>(),
            Err(MomentError::UnknownField(_))
        ));
    }

    #[test]
    fn test_instant_millis_round_trip() {
        let instant = Instant::from_millis(1_709_190_547_654);
        assert_eq!(instant.millis(), 1_709_190_547_654);
        assert!(Instant::from_millis(-1) < Instant::from_millis(0));
    }
}
