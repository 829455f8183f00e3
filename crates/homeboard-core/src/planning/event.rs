//! Event shapes flowing through projection and merging.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::calendar::{end_of_day, format_hhmm, localize, minutes_of_day, TimeSlot};

/// Start or end of an event: a bare date for untimed items, otherwise a
/// timestamp carrying its UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventBound {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl EventBound {
    pub fn is_date_only(&self) -> bool {
        matches!(self, EventBound::Date(_))
    }

    /// Calendar date of this bound as seen in `tz`.
    pub fn date_in(&self, tz: Tz) -> NaiveDate {
        match self {
            EventBound::DateTime(dt) => dt.with_timezone(&tz).date_naive(),
            EventBound::Date(date) => *date,
        }
    }

    /// Wall-clock time in `tz`, `None` for date-only bounds.
    pub fn time_in(&self, tz: Tz) -> Option<NaiveTime> {
        match self {
            EventBound::DateTime(dt) => Some(dt.with_timezone(&tz).time()),
            EventBound::Date(_) => None,
        }
    }

    /// Instant a start bound refers to; a date means midnight in `tz`.
    pub fn start_instant(&self, tz: Tz) -> DateTime<Utc> {
        match self {
            EventBound::DateTime(dt) => dt.with_timezone(&Utc),
            EventBound::Date(date) => localize(tz, *date, NaiveTime::MIN).with_timezone(&Utc),
        }
    }

    /// Instant an end bound refers to; a date covers the whole day.
    pub fn end_instant(&self, tz: Tz) -> DateTime<Utc> {
        match self {
            EventBound::DateTime(dt) => dt.with_timezone(&Utc),
            EventBound::Date(date) => end_of_day(tz, *date).with_timezone(&Utc),
        }
    }

    /// The timestamp itself, if this bound carries one.
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            EventBound::DateTime(dt) => Some(*dt),
            EventBound::Date(_) => None,
        }
    }
}

impl fmt::Display for EventBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventBound::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            EventBound::Date(date) => write!(f, "{date}"),
        }
    }
}

/// Display category of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorType {
    Planning,
    /// Custody days and children exchanges.
    Custody,
    Event,
    Birthday,
    /// Categories coming from configuration, e.g. alternating bin colors.
    Other(String),
}

impl ColorType {
    pub fn as_str(&self) -> &str {
        match self {
            ColorType::Planning => "planning",
            ColorType::Custody => "garde-alternee",
            ColorType::Event => "event",
            ColorType::Birthday => "birthday",
            ColorType::Other(other) => other,
        }
    }
}

impl From<String> for ColorType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "planning" => ColorType::Planning,
            "garde-alternee" => ColorType::Custody,
            "event" => ColorType::Event,
            "birthday" => ColorType::Birthday,
            _ => ColorType::Other(value),
        }
    }
}

impl From<&str> for ColorType {
    fn from(value: &str) -> Self {
        ColorType::from(value.to_string())
    }
}

impl From<ColorType> for String {
    fn from(value: ColorType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event ready for display: either projected from a planning rule or
/// converted from an external calendar event.
///
/// Recomputed on every projection; the `id` is deterministic so it stays
/// stable across refreshes and can key notification de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedEvent {
    pub id: String,
    pub title: String,
    pub start: EventBound,
    #[serde(default)]
    pub end: Option<EventBound>,
    #[serde(default, with = "hhmm")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    pub is_planning: bool,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub no_notification: bool,
    pub color_type: ColorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectedEvent {
    /// A planning event covering `slot` on `date`.
    pub fn timed(id: String, title: &str, date: NaiveDate, slot: TimeSlot, tz: Tz) -> Self {
        let (start, end) = slot.resolve(date, tz);
        Self {
            id,
            title: title.to_string(),
            start: EventBound::DateTime(start),
            end: Some(EventBound::DateTime(end)),
            start_time: Some(slot.start),
            end_time: Some(slot.end),
            location: String::new(),
            shift: None,
            is_planning: true,
            is_all_day: false,
            no_notification: false,
            color_type: ColorType::Planning,
            description: None,
        }
    }

    /// An untimed planning event spanning `date`.
    pub fn all_day(id: String, title: &str, date: NaiveDate) -> Self {
        Self {
            id,
            title: title.to_string(),
            start: EventBound::Date(date),
            end: Some(EventBound::Date(date)),
            start_time: None,
            end_time: None,
            location: String::new(),
            shift: None,
            is_planning: true,
            is_all_day: true,
            no_notification: false,
            color_type: ColorType::Planning,
            description: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_color(mut self, color: ColorType) -> Self {
        self.color_type = color;
        self
    }

    pub fn with_shift(mut self, shift: impl Into<String>) -> Self {
        self.shift = Some(shift.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    pub fn without_notification(mut self) -> Self {
        self.no_notification = true;
        self
    }

    /// Sort key: `None` for untimed events so they come first.
    pub fn start_minutes(&self) -> Option<u32> {
        self.start_time.map(minutes_of_day)
    }

    /// `HH:MM-HH:MM`, `HH:MM`, or empty for untimed events.
    pub fn time_range(&self) -> String {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!("{}-{}", format_hhmm(start), format_hhmm(end)),
            (Some(start), None) => format_hhmm(start),
            _ => String::new(),
        }
    }
}

/// An event as delivered by the external calendar provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub start: EventBound,
    #[serde(default, deserialize_with = "blank_as_none::deserialize")]
    pub end: Option<EventBound>,
    #[serde(default, deserialize_with = "blank_as_none::deserialize")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none::deserialize")]
    pub location: Option<String>,
}

/// Provider fields that may be sent as `""` when absent.
pub(crate) mod blank_as_none {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => T::deserialize(value).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Serde adapter for optional `HH:MM` strings.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::planning::calendar::{format_hhmm, parse_hhmm};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_some(&format_hhmm(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_hhmm(&s).ok_or_else(|| D::Error::custom(format!("invalid HH:MM time: {s}"))))
            .transpose()
    }
}
