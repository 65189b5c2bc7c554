//! Ordered timestamp layout table
//!
//! Raw date strings are matched against a fixed list of known layouts and
//! the first successful parse wins. List order is part of the engine
//! contract: several inputs are ambiguous across layouts (`01/02/2006` is
//! US month-first here because that layout appears before any day-first
//! one), so reordering entries changes results.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// One way to interpret a raw date string
///
/// Zoneless layouts are read as UTC; date-only layouts start at midnight;
/// time-only layouts anchor to the Unix epoch date. Named-zone layouts
/// strip the trailing zone abbreviation and read the remainder as UTC.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Layout {
    Rfc3339,
    Rfc2822,
    /// Date and time with a numeric UTC offset
    Zoned(&'static str),
    /// Date and time, no zone
    Naive(&'static str),
    /// Date only
    Date(&'static str),
    /// Time only
    Time(&'static str),
    /// Date and time followed by a zone abbreviation (`CST`, `MST`, ...)
    NamedZone(&'static str),
}

/// The layout list, in match order
pub(crate) const TIME_LAYOUTS: &[Layout] = &[
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Rfc3339,
    Layout::Date("%Y-%m-%d"),
    Layout::Naive("%Y-%m-%dT%H:%M:%SZ"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.3f"),
    Layout::Date("%Y%m%d"),
    Layout::Date("%Y/%m/%d"),
    Layout::Rfc2822,
    Layout::Date("%m/%d/%Y"),
    Layout::Date("%m-%d-%y"),
    Layout::NamedZone("%b %d, %Y %I:%M:%S %p"),
    Layout::NamedZone("%d %b %y %H:%M"),
    Layout::Date("%d-%b-%Y"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
    Layout::Date("%d-%b-%y"),
    Layout::Naive("%m/%d/%y %H:%M"),
    Layout::Date("%B %d, %Y"),
    Layout::Naive("%Y-%m-%d %I:%M:%S %p"),
    Layout::Zoned("%Y-%m-%dT%H:%M:%S%:z"),
    Layout::Zoned("%Y-%m-%d %H:%M:%S %z"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.6f"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.9f"),
    Layout::Naive("%Y%m%d%H%M%S%.3f"),
    Layout::NamedZone("%Y-%m-%d %H:%M:%S"),
    Layout::Zoned("%Y-%m-%d %H:%M:%S %:z"),
    Layout::Naive("%m/%d/%Y %I:%M %p"),
    Layout::Naive("%b %d, %Y %I:%M %p"),
    Layout::Date("%d.%m.%Y"),
    Layout::Naive("%d.%m.%Y %H:%M"),
    Layout::Date("%Y.%m.%d"),
    Layout::Naive("%Y%m%d%H%M%S"),
    Layout::Time("%H%M%S"),
    Layout::Naive("%d-%b-%y %H:%M:%S"),
    Layout::Naive("%B %d, %Y, %I:%M:%S %p"),
    Layout::Date("%Y年%m月%d日"),
    Layout::Naive("%Y年%m月%d日 %H时%M分%S秒"),
];

impl Layout {
    /// Try to read `raw` under this layout
    fn parse(self, raw: &str) -> Option<DateTime<Utc>> {
        match self {
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Layout::Rfc2822 => DateTime::parse_from_rfc2822(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Layout::Zoned(fmt) => {
                if !year_width_matches(fmt, raw) {
                    return None;
                }
                DateTime::parse_from_str(raw, fmt)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
            Layout::Naive(fmt) => {
                if !year_width_matches(fmt, raw) {
                    return None;
                }
                NaiveDateTime::parse_from_str(raw, fmt)
                    .ok()
                    .map(|ndt| Utc.from_utc_datetime(&ndt))
            }
            Layout::Date(fmt) => {
                if !year_width_matches(fmt, raw) {
                    return None;
                }
                NaiveDate::parse_from_str(raw, fmt)
                    .ok()
                    .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
            }
            Layout::Time(fmt) => NaiveTime::parse_from_str(raw, fmt).ok().map(|t| {
                let epoch_date = DateTime::<Utc>::UNIX_EPOCH.date_naive();
                Utc.from_utc_datetime(&epoch_date.and_time(t))
            }),
            Layout::NamedZone(fmt) => {
                let rest = strip_named_zone(raw)?;
                if !year_width_matches(fmt, rest) {
                    return None;
                }
                NaiveDateTime::parse_from_str(rest, fmt)
                    .ok()
                    .map(|ndt| Utc.from_utc_datetime(&ndt))
            }
        }
    }
}

/// Layouts that open or close with a delimited `%Y` require exactly four
/// digits there
///
/// chrono accepts shorter years for `%Y`, which would let `2006-01-02`
/// style layouts also consume two-digit-year inputs meant for the later
/// `%y` layouts in the list.
fn year_width_matches(fmt: &str, raw: &str) -> bool {
    if let Some(rest) = fmt.strip_prefix("%Y") {
        if !rest.starts_with('%') {
            return raw.chars().take_while(|c| c.is_ascii_digit()).count() == 4;
        }
    }
    if fmt.ends_with("%Y") {
        return raw.chars().rev().take_while(|c| c.is_ascii_digit()).count() == 4;
    }
    true
}

/// Parse a timestamp by trying each layout in order
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    TIME_LAYOUTS.iter().find_map(|layout| layout.parse(raw))
}

/// Split a trailing zone abbreviation off `raw`
///
/// The token must be 2-4 ASCII letters; layouts that expect a zone fail
/// outright when none is present, matching the strictness of the layout
/// list.
fn strip_named_zone(raw: &str) -> Option<&str> {
    let (rest, zone) = raw.rsplit_once(' ')?;
    let looks_like_zone =
        (2..=4).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_uppercase());
    if looks_like_zone { Some(rest) } else { None }
}
