//! Merges projected planning events with external calendar events.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use super::event::{CalendarEvent, ColorType, ProjectedEvent};
use super::rules::{ProjectionContext, UNTITLED_EVENT};

/// Events stay visible for this long after they end.
pub const EXPIRY_GRACE_MINUTES: i64 = 60;

/// Converts an external event to the display shape, keeping its id.
pub fn convert_calendar_event(event: &CalendarEvent, ctx: &ProjectionContext) -> ProjectedEvent {
    let title = event
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNTITLED_EVENT)
        .to_string();
    let color_type = if ctx.rules.is_birthday(&title) {
        ColorType::Birthday
    } else {
        ColorType::Event
    };

    ProjectedEvent {
        id: event.id.clone(),
        start: event.start,
        end: event.end,
        start_time: event.start.time_in(ctx.tz),
        end_time: event.end.and_then(|end| end.time_in(ctx.tz)),
        location: event.location.clone().unwrap_or_default(),
        shift: None,
        is_planning: false,
        is_all_day: event.start.is_date_only(),
        no_notification: false,
        color_type,
        description: event.description.clone().filter(|d| !d.is_empty()),
        title,
    }
}

/// Instant after which `event` is no longer displayed; `None` for events
/// without an end, which never expire.
pub fn expires_at(event: &ProjectedEvent, tz: Tz) -> Option<DateTime<Utc>> {
    event
        .end
        .map(|end| end.end_instant(tz) + Duration::minutes(EXPIRY_GRACE_MINUTES))
}

pub fn is_expired(event: &ProjectedEvent, now: DateTime<Utc>, tz: Tz) -> bool {
    expires_at(event, tz).is_some_and(|expiry| now > expiry)
}

/// Display list for `date`: planning events first, then the calendar events
/// starting that day, minus expired ones, stably sorted by start time with
/// untimed events on top.
///
/// Calendar events naming the children are dropped unless they are at home.
pub fn merge_day(
    date: NaiveDate,
    planning: Vec<ProjectedEvent>,
    calendar: &[CalendarEvent],
    custody_location: &str,
    now: DateTime<Utc>,
    ctx: &ProjectionContext,
) -> Vec<ProjectedEvent> {
    let at_home = ctx.rules.is_home(custody_location);

    let external = calendar
        .iter()
        .filter(|event| event.start.date_in(ctx.tz) == date)
        .filter(|event| {
            let concerns_children = event
                .summary
                .as_deref()
                .is_some_and(|s| ctx.rules.is_child_event(s));
            if concerns_children && !at_home {
                debug!(id = %event.id, %date, "children away, hiding calendar event");
                return false;
            }
            true
        })
        .map(|event| convert_calendar_event(event, ctx));

    let mut merged: Vec<ProjectedEvent> = planning
        .into_iter()
        .chain(external)
        .filter(|event| !is_expired(event, now, ctx.tz))
        .collect();
    merged.sort_by_key(ProjectedEvent::start_minutes);
    merged
}
