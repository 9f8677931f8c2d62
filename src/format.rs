//! The format-token interpreter: a dispatch table mapping PHP-style directive
//! characters onto substrings computed from one instant viewed in one zone.
//!
//! Each directive resolves independently against the wall-clock field set and
//! the raw instant; the composites `c` and `r` re-invoke the interpreter with
//! their sub-pattern. Backslash escapes the next character, anything
//! unrecognized passes through verbatim.

use crate::MomentError;
use crate::consts::{self, MONTH_NAMES, WEEKDAY_NAMES};
use crate::types::{self, FieldSet, Instant};
use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Scans a pattern for an unescaped `u` directive. Used to fail microsecond
/// requests even when the moment itself is invalid.
pub(crate) fn has_microsecond_directive(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            'u' => return true,
            _ => {}
        }
    }
    false
}

/// One formatting call: an instant, its zone, and the derived views the
/// directives read from.
pub(crate) struct Renderer {
    instant: Instant,
    tz: Tz,
    utc: DateTime<Utc>,
    zoned: DateTime<Tz>,
    fields: FieldSet,
}

impl Renderer {
    /// `None` when the instant falls outside the representable range.
    pub(crate) fn new(instant: Instant, tz: Tz) -> Option<Self> {
        let utc = Utc.timestamp_millis_opt(instant.millis()).single()?;
        let zoned = utc.with_timezone(&tz);
        let fields = FieldSet::from_zoned(&zoned);
        Some(Self {
            instant,
            tz,
            utc,
            zoned,
            fields,
        })
    }

    pub(crate) fn render(&self, pattern: &str) -> Result<String, MomentError> {
        let mut out = String::with_capacity(pattern.len() * 2);
        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            if ch == '\\' {
                // Escaped character emits literally, dropping the backslash.
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else {
                self.emit(ch, &mut out)?;
            }
        }
        Ok(out)
    }

    #[allow(clippy::too_many_lines)]
    fn emit(&self, directive: char, out: &mut String) -> Result<(), MomentError> {
        let f = &self.fields;
        match directive {
            'd' => out.push_str(&format!("{:02}", f.day)),
            'D' => out.push_str(&WEEKDAY_NAMES[f.weekday as usize][..3]),
            'j' => out.push_str(&f.day.to_string()),
            'l' => out.push_str(WEEKDAY_NAMES[f.weekday as usize]),
            'N' => {
                let iso = if f.weekday == 0 { 7 } else { f.weekday };
                out.push_str(&iso.to_string());
            }
            'S' => out.push_str(types::ordinal_suffix(f.day)),
            'w' => out.push_str(&f.weekday.to_string()),
            'z' => out.push_str(&f.day_of_year.to_string()),
            'W' => out.push_str(&format!("{:02}", types::iso_week(self.zoned.date_naive()))),
            'F' => out.push_str(MONTH_NAMES[f.month0 as usize]),
            'm' => out.push_str(&format!("{:02}", f.month0 + 1)),
            'M' => out.push_str(&MONTH_NAMES[f.month0 as usize][..3]),
            'n' => out.push_str(&(f.month0 + 1).to_string()),
            't' => out.push_str(&types::days_in_month(f.year, f.month0 + 1).to_string()),
            'L' => out.push(if types::is_leap_year(f.year) { '1' } else { '0' }),
            // ISO week-numbering year, approximated as the UTC calendar year.
            // Diverges from the Thursday-shift in the days around New Year.
            'o' => out.push_str(&format!("{:04}", self.utc.year())),
            'X' => {
                let sign = if f.year < 0 { '-' } else { '+' };
                out.push_str(&format!("{sign}{:04}", f.year.abs()));
            }
            'x' => {
                if (0..=9999).contains(&f.year) {
                    out.push_str(&format!("{:04}", f.year));
                } else {
                    let sign = if f.year < 0 { '-' } else { '+' };
                    out.push_str(&format!("{sign}{:04}", f.year.abs()));
                }
            }
            'Y' => {
                // The sign sits outside the four-digit field.
                if f.year < 0 {
                    out.push_str(&format!("-{:04}", f.year.abs()));
                } else {
                    out.push_str(&format!("{:04}", f.year));
                }
            }
            // Two-digit year wraps modulo 100, BCE years included.
            'y' => out.push_str(&format!("{:02}", f.year.rem_euclid(100))),
            'a' => out.push_str(if f.hour < 12 { "am" } else { "pm" }),
            'A' => out.push_str(if f.hour < 12 { "AM" } else { "PM" }),
            'B' => {
                let seconds = i64::from(self.utc.num_seconds_from_midnight());
                out.push_str(&format!("{:03}", seconds * 10 / 864));
            }
            'g' => out.push_str(&hour12(f.hour).to_string()),
            'G' => out.push_str(&f.hour.to_string()),
            'h' => out.push_str(&format!("{:02}", hour12(f.hour))),
            'H' => out.push_str(&format!("{:02}", f.hour)),
            'i' => out.push_str(&format!("{:02}", f.minute)),
            's' => out.push_str(&format!("{:02}", f.second)),
            'u' => return Err(MomentError::MicrosecondsUnsupported),
            'v' => out.push_str(&format!("{:03}", f.millisecond)),
            'e' => out.push_str(self.tz.name()),
            'I' => out.push(if self.is_dst() { '1' } else { '0' }),
            'O' => out.push_str(&self.offset_string(false)),
            'P' => out.push_str(&self.offset_string(true)),
            'p' => {
                if f.offset_seconds == 0 {
                    out.push('Z');
                } else {
                    out.push_str(&self.offset_string(true));
                }
            }
            'T' => out.push_str(&self.zone_abbreviation()),
            'Z' => out.push_str(&f.offset_seconds.to_string()),
            'c' => out.push_str(&self.render(consts::ATOM)?),
            'r' => out.push_str(&self.render(consts::RFC2822)?),
            'U' => out.push_str(&self.instant.millis().div_euclid(1000).to_string()),
            other => out.push(other),
        }
        Ok(())
    }

    /// Offset as `±HHMM` or `±HH:MM`. Sub-minute components, which occur in
    /// historical local-mean-time offsets, are truncated; `Z` reports the
    /// untruncated offset in seconds.
    fn offset_string(&self, colon: bool) -> String {
        let offset = self.fields.offset_seconds;
        let sign = if offset < 0 { '-' } else { '+' };
        let abs = offset.abs();
        let (hours, minutes) = (abs / 3600, abs % 3600 / 60);
        if colon {
            format!("{sign}{hours:02}:{minutes:02}")
        } else {
            format!("{sign}{hours:02}{minutes:02}")
        }
    }

    /// Timezone abbreviation, falling back to the zone identifier when the
    /// zone has no alphabetic abbreviation (chrono-tz renders those as a
    /// numeric offset).
    fn zone_abbreviation(&self) -> String {
        let abbr = self.zoned.format("%Z").to_string();
        if abbr.starts_with(['+', '-']) {
            self.tz.name().to_owned()
        } else {
            abbr
        }
    }

    /// DST test: the standard offset is the smaller of the zone's January 1
    /// and July 1 offsets; DST is in effect when the current offset exceeds it.
    fn is_dst(&self) -> bool {
        let current = self.fields.offset_seconds;
        let jan = self.offset_at(1).unwrap_or(current);
        let jul = self.offset_at(7).unwrap_or(current);
        jan != jul && current == jan.max(jul)
    }

    fn offset_at(&self, month: u32) -> Option<i32> {
        self.tz
            .with_ymd_and_hms(self.fields.year, month, 1, 12, 0, 0)
            .earliest()
            .map(|dt| dt.offset().fix().local_minus_utc())
    }
}

/// 12-hour clock hour, with midnight and noon both reading 12.
const fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}
