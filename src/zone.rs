//! Timezone resolution: label → `Tz`, instant → wall-clock fields, and
//! wall-clock time → instant.
//!
//! All lookups go through the host's IANA timezone database (`chrono-tz`);
//! the host's own zone is discovered via `iana-time-zone`.

use crate::types::{FieldSet, Instant};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Error type for timezone resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// The label names no zone in the IANA database.
    #[error("Unknown timezone: {0}")]
    UnknownZone(String),
}

/// Resolves an optional timezone label to a concrete zone.
///
/// `None` means the host's local timezone; when the host zone cannot be
/// discovered or parsed, UTC is used. An explicit label that names no known
/// zone fails loudly.
pub(crate) fn effective_tz(label: Option<&str>) -> Result<Tz, ZoneError> {
    match label {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| ZoneError::UnknownZone(name.to_owned())),
        None => Ok(host_zone()),
    }
}

/// The host's local timezone, falling back to UTC.
pub(crate) fn host_zone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Views an instant in a timezone. `None` when the instant is outside the
/// representable range.
pub(crate) fn zoned(instant: Instant, tz: &Tz) -> Option<DateTime<Tz>> {
    Utc.timestamp_millis_opt(instant.millis())
        .single()
        .map(|utc| utc.with_timezone(tz))
}

/// Wall-clock fields of an instant as observed in a timezone.
/// Computed fresh on every call; nothing is cached.
pub(crate) fn resolve_fields(instant: Instant, tz: &Tz) -> Option<FieldSet> {
    zoned(instant, tz).map(|dt| FieldSet::from_zoned(&dt))
}

/// Resolves a wall-clock reading to an instant in a timezone.
///
/// An ambiguous reading (DST fold) picks the earlier instant; a nonexistent
/// reading (DST gap) shifts forward one hour, matching how a wall clock that
/// springs forward would land.
pub(crate) fn resolve_wall(tz: &Tz, wall: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => {
            let shifted = wall.checked_add_signed(TimeDelta::try_hours(1)?)?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .unwrap()
    }

    #[test]
    fn test_effective_tz_named_zones() {
        assert_eq!(effective_tz(Some("UTC")).unwrap(), Tz::UTC);
        assert!(effective_tz(Some("CET")).is_ok());
        assert!(effective_tz(Some("GMT")).is_ok());
        assert!(effective_tz(Some("Europe/Berlin")).is_ok());
        assert!(effective_tz(None).is_ok());
    }

    #[test]
    fn test_effective_tz_unknown_label() {
        let err = effective_tz(Some("Mars/Olympus_Mons")).unwrap_err();
        assert_eq!(err, ZoneError::UnknownZone("Mars/Olympus_Mons".to_owned()));
        assert_eq!(err.to_string(), "Unknown timezone: Mars/Olympus_Mons");
    }

    #[test]
    fn test_resolve_fields_cet_winter() {
        // 2024-02-29T07:09:07.654Z is 08:09:07.654 in CET (+01:00).
        let instant = Instant::from_millis(1_709_190_547_654);
        let fields = resolve_fields(instant, &Tz::CET).unwrap();
        assert_eq!(fields.year, 2024);
        assert_eq!(fields.month0, 1);
        assert_eq!(fields.day, 29);
        assert_eq!(fields.weekday, 4); // Thursday
        assert_eq!(fields.day_of_year, 59);
        assert_eq!(fields.hour, 8);
        assert_eq!(fields.minute, 9);
        assert_eq!(fields.second, 7);
        assert_eq!(fields.millisecond, 654);
        assert_eq!(fields.offset_seconds, 3600);
    }

    #[test]
    fn test_resolve_wall_single() {
        let dt = resolve_wall(&Tz::CET, wall(2024, 2, 29, 8, 9, 7)).unwrap();
        assert_eq!(dt.timestamp(), 1_709_190_547);
    }

    #[test]
    fn test_resolve_wall_dst_gap_shifts_forward() {
        // CET springs forward 2024-03-31 02:00 -> 03:00; 02:30 does not exist.
        let dt = resolve_wall(&Tz::CET, wall(2024, 3, 31, 2, 30, 0)).unwrap();
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.day(), 31);
    }

    #[test]
    fn test_resolve_wall_dst_fold_picks_earlier() {
        // CET falls back 2024-10-27 03:00 -> 02:00; 02:30 happens twice.
        let earlier = resolve_wall(&Tz::CET, wall(2024, 10, 27, 2, 30, 0)).unwrap();
        let after = resolve_wall(&Tz::CET, wall(2024, 10, 27, 3, 30, 0)).unwrap();
        assert!(after.timestamp() - earlier.timestamp() > 3600);
    }
}
