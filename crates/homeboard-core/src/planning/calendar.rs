//! ISO week numbering, day names and `HH:MM` time handling.
//!
//! Weeks follow ISO 8601: they start on Monday and week 1 is the week holding
//! the year's first Thursday. Wall-clock times are always localized through
//! the display timezone, so the UTC offset of a projected event is the one in
//! force on that date.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};
use chrono_tz::Tz;

/// ISO 8601 week of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoWeek {
    /// ISO week-year, which differs from the calendar year around New Year.
    pub year: i32,
    pub week: u32,
}

impl IsoWeek {
    pub fn is_odd(&self) -> bool {
        self.week % 2 == 1
    }

    /// `week % 2`, the key of alternating labels.
    pub fn parity(&self) -> u32 {
        self.week % 2
    }

    /// Key of a shift week override: `"{year}-{week}"`, unpadded.
    pub fn override_key(&self) -> String {
        format!("{}-{}", self.year, self.week)
    }
}

pub fn iso_week(date: NaiveDate) -> IsoWeek {
    let week = date.iso_week();
    IsoWeek {
        year: week.year(),
        week: week.week(),
    }
}

/// Lowercase English day name, the key used by schedules and exceptions.
pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse a 24-hour `HH:MM` string.
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn minutes_of_day(time: NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}

/// An `HH:MM-HH:MM` interval from a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn parse(raw: &str) -> Option<Self> {
        let (start, end) = raw.split_once('-')?;
        Some(Self {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// A night shift such as `21:00-05:00` ends on the following day.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Start and end timestamps of this slot on `date` in `tz`.
    pub fn resolve(&self, date: NaiveDate, tz: Tz) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        let end_date = if self.crosses_midnight() {
            date.succ_opt().unwrap_or(date)
        } else {
            date
        };
        (localize(tz, date, self.start), localize(tz, end_date, self.end))
    }
}

/// Resolve a local wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap move forward by one hour.
pub fn localize(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    let naive = NaiveDateTime::new(date, time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        .fixed_offset()
}

/// First instant of the day after `date` in `tz`.
pub fn end_of_day(tz: Tz, date: NaiveDate) -> DateTime<FixedOffset> {
    let next = date.succ_opt().unwrap_or(date);
    localize(tz, next, NaiveTime::MIN)
}
