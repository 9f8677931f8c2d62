//! Carbon-style date/time values: a timezone-aware instant with PHP-style
//! format tokens, named calendar getters, comparison predicates, and fluent
//! unit arithmetic.
//!
//! A [`Moment`] owns one instant (milliseconds since the Unix epoch) and one
//! optional timezone label; everything else is derived fresh per call. Bad
//! *data* fails softly: an unparseable input produces a moment whose string
//! form is the literal `"Invalid Date"`. Bad *usage* fails loudly: unknown
//! unit or field names, unknown timezone labels, and any request for
//! microsecond precision return descriptive errors.

mod arith;
mod consts;
mod format;
mod prelude;
mod types;
mod zone;

pub use consts::*;
pub use types::{Field, Instant, Unit};
pub use zone::ZoneError;

use crate::prelude::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// Errors for the loud failure paths: unsupported precision, unknown
/// identifiers, and reads against an invalid date.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MomentError {
    #[display(fmt = "Microsecond precision is not supported")]
    MicrosecondsUnsupported,
    #[display(fmt = "Unknown unit: {_0}")]
    UnknownUnit(String),
    #[display(fmt = "Unknown field: {_0}")]
    UnknownField(String),
    #[display(fmt = "Cannot set compound unit: {_0}")]
    CompoundSet(Unit),
    #[display(fmt = "Invalid date")]
    InvalidDate,
    #[display(fmt = "Array conversion is not supported")]
    ArrayUnsupported,
    #[display(fmt = "{_0}")]
    Zone(ZoneError),
}

impl std::error::Error for MomentError {}

impl From<ZoneError> for MomentError {
    fn from(err: ZoneError) -> Self {
        Self::Zone(err)
    }
}

/// A date/time value: one instant plus one optional timezone label.
///
/// The label (`None` = host local timezone) only affects how fields are
/// observed; the instant is the sole source of truth for *when*. Every
/// operation returns a new value, nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Moment {
    instant: Option<Instant>,
    zone: Option<String>,
}

impl Moment {
    /// The current instant in the host's local timezone.
    pub fn now() -> Self {
        Self {
            instant: Some(Instant::from_millis(Utc::now().timestamp_millis())),
            zone: None,
        }
    }

    /// The current instant observed in a named timezone.
    ///
    /// # Errors
    /// Fails when the label names no known timezone.
    pub fn now_in(zone: &str) -> Result<Self, MomentError> {
        zone::effective_tz(Some(zone))?;
        Ok(Self {
            instant: Some(Instant::from_millis(Utc::now().timestamp_millis())),
            zone: Some(zone.to_owned()),
        })
    }

    /// Parses a date/time string, observed in the host's local timezone.
    ///
    /// Empty input or the literal `"now"` means the current instant. Input
    /// that no parser accepts yields the invalid moment whose string form is
    /// `"Invalid Date"`; this constructor never fails.
    pub fn parse(input: &str) -> Self {
        let tz = zone::host_zone();
        Self {
            instant: parse_instant(input, &tz),
            zone: None,
        }
    }

    /// Parses a date/time string, observed in a named timezone. Input without
    /// an explicit offset is interpreted as a wall-clock reading in that zone.
    ///
    /// # Errors
    /// Fails when the label names no known timezone; bad date input still
    /// yields the invalid moment.
    pub fn parse_in(input: &str, zone: &str) -> Result<Self, MomentError> {
        let tz = zone::effective_tz(Some(zone))?;
        Ok(Self {
            instant: parse_instant(input, &tz),
            zone: Some(zone.to_owned()),
        })
    }

    /// A moment from milliseconds since the Unix epoch, host local timezone.
    pub fn from_timestamp_millis(millis: i64) -> Self {
        Self {
            instant: Some(Instant::from_millis(millis)),
            zone: None,
        }
    }

    /// False when construction failed to parse the input.
    pub const fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    /// The timezone label, `None` meaning the host's local timezone.
    pub fn timezone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Milliseconds since the Unix epoch.
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn timestamp_millis(&self) -> Result<i64, MomentError> {
        self.instant
            .map(Instant::millis)
            .ok_or(MomentError::InvalidDate)
    }

    /// Whole seconds since the Unix epoch, floored.
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn timestamp(&self) -> Result<i64, MomentError> {
        Ok(self.timestamp_millis()?.div_euclid(1000))
    }

    /// The same instant observed in another timezone. Returns a new value;
    /// `self` is untouched.
    ///
    /// # Errors
    /// Fails when the label names no known timezone.
    pub fn with_timezone(&self, zone: &str) -> Result<Self, MomentError> {
        zone::effective_tz(Some(zone))?;
        Ok(Self {
            instant: self.instant,
            zone: Some(zone.to_owned()),
        })
    }

    /// The same instant observed in UTC. Returns a new value; `self` keeps
    /// its own timezone label.
    pub fn to_utc(&self) -> Self {
        Self {
            instant: self.instant,
            zone: Some("UTC".to_owned()),
        }
    }

    /// Formats the moment with the PHP-style token mini-language.
    ///
    /// An invalid moment renders the `"Invalid Date"` sentinel for any
    /// pattern, except that the `u` directive fails on every call.
    ///
    /// # Errors
    /// Fails for the `u` directive or an unknown timezone label.
    pub fn format(&self, pattern: &str) -> Result<String, MomentError> {
        let Some(instant) = self.instant else {
            if format::has_microsecond_directive(pattern) {
                return Err(MomentError::MicrosecondsUnsupported);
            }
            return Ok(INVALID_DATE.to_owned());
        };
        let tz = zone::effective_tz(self.zone.as_deref())?;
        match format::Renderer::new(instant, tz) {
            Some(renderer) => renderer.render(pattern),
            None => Ok(INVALID_DATE.to_owned()),
        }
    }

    /// Reads one calendar field as observed in the moment's timezone.
    ///
    /// # Errors
    /// Fails for an invalid moment or a microsecond request.
    pub fn get(&self, field: Field) -> Result<i64, MomentError> {
        if field == Field::Microsecond {
            return Err(MomentError::MicrosecondsUnsupported);
        }
        let (instant, tz) = self.resolved()?;
        let f = zone::resolve_fields(instant, &tz).ok_or(MomentError::InvalidDate)?;
        Ok(match field {
            Field::Year => f.year.into(),
            Field::Month => i64::from(f.month0 + 1),
            Field::Day => f.day.into(),
            Field::Weekday => f.weekday.into(),
            Field::Hour => f.hour.into(),
            Field::Minute => f.minute.into(),
            Field::Second => f.second.into(),
            Field::Millisecond => f.millisecond.into(),
            Field::DayOfYear => f.day_of_year.into(),
            Field::Timestamp => instant.millis().div_euclid(1000),
            Field::Microsecond => return Err(MomentError::MicrosecondsUnsupported),
        })
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn year(&self) -> Result<i64, MomentError> {
        self.get(Field::Year)
    }

    /// Month number, 1 (January) to 12 (December).
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn month(&self) -> Result<i64, MomentError> {
        self.get(Field::Month)
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn day(&self) -> Result<i64, MomentError> {
        self.get(Field::Day)
    }

    /// Day of week, 0 (Sunday) to 6 (Saturday).
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn day_of_week(&self) -> Result<i64, MomentError> {
        self.get(Field::Weekday)
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn hour(&self) -> Result<i64, MomentError> {
        self.get(Field::Hour)
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn minute(&self) -> Result<i64, MomentError> {
        self.get(Field::Minute)
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn second(&self) -> Result<i64, MomentError> {
        self.get(Field::Second)
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn millisecond(&self) -> Result<i64, MomentError> {
        self.get(Field::Millisecond)
    }

    /// Day of year, 0-based.
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn day_of_year(&self) -> Result<i64, MomentError> {
        self.get(Field::DayOfYear)
    }

    /// ISO-8601 week number.
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn week(&self) -> Result<i64, MomentError> {
        let (instant, tz) = self.resolved()?;
        let dt = zone::zoned(instant, &tz).ok_or(MomentError::InvalidDate)?;
        Ok(types::iso_week(dt.date_naive()).into())
    }

    /// Quarter of the year, 1 to 4.
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn quarter(&self) -> Result<i64, MomentError> {
        Ok((self.get(Field::Month)? - 1).div_euclid(3) + 1)
    }

    /// Number of days in the moment's month.
    ///
    /// # Errors
    /// Fails for an invalid moment.
    pub fn days_in_month(&self) -> Result<i64, MomentError> {
        let (instant, tz) = self.resolved()?;
        let f = zone::resolve_fields(instant, &tz).ok_or(MomentError::InvalidDate)?;
        Ok(types::days_in_month(f.year, f.month0 + 1).into())
    }

    /// # Errors
    /// Fails for an invalid moment.
    pub fn is_leap_year(&self) -> Result<bool, MomentError> {
        let (instant, tz) = self.resolved()?;
        let f = zone::resolve_fields(instant, &tz).ok_or(MomentError::InvalidDate)?;
        Ok(types::is_leap_year(f.year))
    }

    /// Adds a signed amount of a calendar unit, honoring wall-clock semantics
    /// in the moment's timezone. Compound units normalize to primitives first.
    /// An invalid moment passes through unchanged; a result outside the
    /// representable range becomes the invalid moment.
    ///
    /// # Errors
    /// Fails for the microsecond unit or an unknown timezone label.
    pub fn add(&self, unit: Unit, amount: i64) -> Result<Self, MomentError> {
        let Some((primitive, amount)) = unit.normalize(amount) else {
            return Err(MomentError::MicrosecondsUnsupported);
        };
        let Some(instant) = self.instant else {
            return Ok(self.clone());
        };
        let tz = zone::effective_tz(self.zone.as_deref())?;
        Ok(Self {
            instant: arith::shift(instant, tz, primitive, amount),
            zone: self.zone.clone(),
        })
    }

    /// `add` with the amount negated.
    ///
    /// # Errors
    /// Fails for the microsecond unit or an unknown timezone label.
    pub fn sub(&self, unit: Unit, amount: i64) -> Result<Self, MomentError> {
        self.add(unit, amount.saturating_neg())
    }

    /// Overwrites one primitive field with an absolute value, keeping the
    /// others; out-of-range values carry (month 13 rolls into January).
    ///
    /// # Errors
    /// Fails for compound units, microseconds, or an unknown timezone label.
    pub fn set(&self, unit: Unit, value: i64) -> Result<Self, MomentError> {
        let Some(primitive) = unit.as_primitive() else {
            return Err(match unit {
                Unit::Microsecond => MomentError::MicrosecondsUnsupported,
                other => MomentError::CompoundSet(other),
            });
        };
        let Some(instant) = self.instant else {
            return Ok(self.clone());
        };
        let tz = zone::effective_tz(self.zone.as_deref())?;
        Ok(Self {
            instant: arith::set_field(instant, tz, primitive, value),
            zone: self.zone.clone(),
        })
    }

    /// Whether two moments fall in the same calendar bucket of `unit`, each
    /// observed in its own timezone. Two invalid moments compare equal at
    /// string granularities (both render the sentinel).
    ///
    /// # Errors
    /// Fails for same-microsecond comparison, and at the numeric
    /// granularities (millennium/century/decade/quarter) for invalid moments.
    pub fn is_same(&self, other: &Self, unit: Unit) -> Result<bool, MomentError> {
        let pattern = match unit {
            Unit::Microsecond => return Err(MomentError::MicrosecondsUnsupported),
            Unit::Millennium | Unit::Century | Unit::Decade => {
                let span = match unit {
                    Unit::Millennium => 1000,
                    Unit::Century => 100,
                    _ => 10,
                };
                return Ok(self.get(Field::Year)?.div_euclid(span)
                    == other.get(Field::Year)?.div_euclid(span));
            }
            Unit::Quarter => {
                return Ok(self.get(Field::Year)? == other.get(Field::Year)?
                    && self.quarter()? == other.quarter()?);
            }
            Unit::Year => "Y",
            Unit::Month => "Y-m",
            Unit::Week => "o-W",
            Unit::Day => "Y-m-d",
            Unit::Hour => "Y-m-d H",
            Unit::Minute => "Y-m-d H:i",
            Unit::Second => "Y-m-d H:i:s",
            Unit::Millisecond => "Y-m-d H:i:s.v",
        };
        Ok(self.format(pattern)? == other.format(pattern)?)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn is_same_day(&self, other: &Self) -> Result<bool, MomentError> {
        self.is_same(other, Unit::Day)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn is_same_week(&self, other: &Self) -> Result<bool, MomentError> {
        self.is_same(other, Unit::Week)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn is_same_month(&self, other: &Self) -> Result<bool, MomentError> {
        self.is_same(other, Unit::Month)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn is_same_year(&self, other: &Self) -> Result<bool, MomentError> {
        self.is_same(other, Unit::Year)
    }

    /// Instant comparison; false when either moment is invalid.
    pub fn is_before(&self, other: &Self) -> bool {
        matches!((self.instant, other.instant), (Some(a), Some(b)) if a < b)
    }

    /// Instant comparison; false when either moment is invalid.
    pub fn is_after(&self, other: &Self) -> bool {
        matches!((self.instant, other.instant), (Some(a), Some(b)) if a > b)
    }

    /// Array-representation conversion is not supported.
    ///
    /// # Errors
    /// Always fails; kept so the omission is loud rather than a partial
    /// structure.
    pub fn to_array(&self) -> Result<Vec<i64>, MomentError> {
        Err(MomentError::ArrayUnsupported)
    }

    fn resolved(&self) -> Result<(Instant, Tz), MomentError> {
        let instant = self.instant.ok_or(MomentError::InvalidDate)?;
        let tz = zone::effective_tz(self.zone.as_deref())?;
        Ok((instant, tz))
    }
}

// Preset string conversions. Each is one fixed pattern from the process-wide
// table; the UTC-forced ones view the instant in UTC without touching `self`.
impl Moment {
    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_atom_string(&self) -> Result<String, MomentError> {
        self.format(ATOM)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_cookie_string(&self) -> Result<String, MomentError> {
        self.format(COOKIE)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_iso8601_string(&self) -> Result<String, MomentError> {
        self.format(ISO8601)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_iso8601_expanded_string(&self) -> Result<String, MomentError> {
        self.format(ISO8601_EXPANDED)
    }

    /// ISO 8601 zulu form with milliseconds, viewed in UTC. The receiver's
    /// timezone label is not modified.
    ///
    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_iso_string(&self) -> Result<String, MomentError> {
        self.to_utc().format(ISO8601_ZULU)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc822_string(&self) -> Result<String, MomentError> {
        self.format(RFC822)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc850_string(&self) -> Result<String, MomentError> {
        self.format(RFC850)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc1036_string(&self) -> Result<String, MomentError> {
        self.format(RFC1036)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc1123_string(&self) -> Result<String, MomentError> {
        self.format(RFC1123)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc2822_string(&self) -> Result<String, MomentError> {
        self.format(RFC2822)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc3339_string(&self) -> Result<String, MomentError> {
        self.format(RFC3339)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc3339_extended_string(&self) -> Result<String, MomentError> {
        self.format(RFC3339_EXTENDED)
    }

    /// HTTP-date: UTC wall-clock fields with a literal `GMT` suffix,
    /// regardless of the receiver's timezone. The receiver is not modified.
    ///
    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rfc7231_string(&self) -> Result<String, MomentError> {
        self.to_utc().format(RFC7231)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_rss_string(&self) -> Result<String, MomentError> {
        self.format(RSS)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_w3c_string(&self) -> Result<String, MomentError> {
        self.format(W3C)
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_date_string(&self) -> Result<String, MomentError> {
        self.format("Y-m-d")
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_time_string(&self) -> Result<String, MomentError> {
        self.format("H:i:s")
    }

    /// # Errors
    /// Fails for an unknown timezone label.
    pub fn to_datetime_string(&self) -> Result<String, MomentError> {
        self.format(DEFAULT_FORMAT)
    }
}

/// Delegates to the host parsers: RFC 3339 and RFC 2822 inputs carry their own
/// offset; anything else is tried as a wall-clock reading in `tz`.
fn parse_instant(input: &str, tz: &Tz) -> Option<Instant> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("now") {
        return Some(Instant::from_millis(Utc::now().timestamp_millis()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(Instant::from_millis(dt.timestamp_millis()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(Instant::from_millis(dt.timestamp_millis()));
    }
    for layout in WALL_FORMATS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return zone::resolve_wall(tz, wall)
                .map(|dt| Instant::from_millis(dt.timestamp_millis()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let wall = date.and_hms_opt(0, 0, 0)?;
        return zone::resolve_wall(tz, wall).map(|dt| Instant::from_millis(dt.timestamp_millis()));
    }
    None
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format(DEFAULT_FORMAT) {
            Ok(formatted) => f.write_str(&formatted),
            Err(_) => f.write_str(INVALID_DATE),
        }
    }
}

impl FromStr for Moment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl PartialOrd for Moment {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self.instant, other.instant) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }
}

impl serde::Serialize for Moment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Moment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
