/// Sentinel emitted by every read/format operation on an unparseable date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Default pattern used by `Display`.
pub const DEFAULT_FORMAT: &str = "Y-m-d H:i:s";

/// RFC 3339 / Atom / W3C datetime.
pub const ATOM: &str = "Y-m-d\\TH:i:sP";
/// HTTP cookie expiry date.
pub const COOKIE: &str = "l, d-M-Y H:i:s T";
/// ISO 8601 with a compact offset.
pub const ISO8601: &str = "Y-m-d\\TH:i:sO";
/// ISO 8601 with an expanded (always signed) year.
pub const ISO8601_EXPANDED: &str = "X-m-d\\TH:i:sP";
/// ISO 8601 zulu form with milliseconds, rendered from a UTC view.
pub const ISO8601_ZULU: &str = "Y-m-d\\TH:i:s.vp";
pub const RFC822: &str = "D, d M y H:i:s O";
pub const RFC850: &str = "l, d-M-y H:i:s T";
pub const RFC1036: &str = "D, d M y H:i:s O";
pub const RFC1123: &str = "D, d M Y H:i:s O";
pub const RFC2822: &str = "D, d M Y H:i:s O";
pub const RFC3339: &str = "Y-m-d\\TH:i:sP";
pub const RFC3339_EXTENDED: &str = "Y-m-d\\TH:i:s.vP";
/// HTTP-date. Always rendered against UTC, hence the literal `GMT`.
pub const RFC7231: &str = "D, d M Y H:i:s \\G\\M\\T";
/// RSS uses a four-digit year, unlike RFC 822.
pub const RSS: &str = "D, d M Y H:i:s O";
pub const W3C: &str = "Y-m-d\\TH:i:sP";

/// Preset patterns keyed by name, shared process-wide.
pub const FORMAT_PRESETS: [(&str, &str); 15] = [
    ("ATOM", ATOM),
    ("COOKIE", COOKIE),
    ("ISO8601", ISO8601),
    ("ISO8601_EXPANDED", ISO8601_EXPANDED),
    ("ISO8601_ZULU", ISO8601_ZULU),
    ("RFC822", RFC822),
    ("RFC850", RFC850),
    ("RFC1036", RFC1036),
    ("RFC1123", RFC1123),
    ("RFC2822", RFC2822),
    ("RFC3339", RFC3339),
    ("RFC3339_EXTENDED", RFC3339_EXTENDED),
    ("RFC7231", RFC7231),
    ("RSS", RSS),
    ("W3C", W3C),
];

/// Looks up a preset pattern by its conventional name (case-insensitive).
pub fn preset(name: &str) -> Option<&'static str> {
    FORMAT_PRESETS
        .iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .map(|(_, pattern)| *pattern)
}

/// Full English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English weekday names, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Month number for February
pub const FEBRUARY: u32 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u32 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u32; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

pub(crate) const MS_PER_SECOND: i64 = 1_000;
pub(crate) const MS_PER_MINUTE: i64 = 60_000;
pub(crate) const MS_PER_HOUR: i64 = 3_600_000;

/// Wall-clock layouts tried for input without an explicit offset,
/// most specific first.
pub(crate) const WALL_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
