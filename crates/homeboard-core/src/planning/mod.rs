//! Household planning: person rules, custody and the per-day event lists.
//!
//! Everything here is recomputed from scratch on each call; nothing is
//! cached between projections.

pub mod calendar;
pub mod custody;
pub mod event;
pub mod merger;
pub mod model;
pub mod projector;
pub mod rules;

pub use calendar::{day_name, iso_week, IsoWeek, TimeSlot};
pub use custody::{custody_group, custody_location, resolve_custody};
pub use event::{CalendarEvent, ColorType, EventBound, ProjectedEvent};
pub use merger::{convert_calendar_event, is_expired, merge_day};
pub use model::{Person, PersonKind};
pub use projector::project_day;
pub use rules::{ClassificationRules, ProjectionContext};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::holidays::{holiday_on, Holiday};

/// One day of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEvents {
    pub date: NaiveDate,
    /// Empty when custody cannot be resolved.
    pub custody_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<Holiday>,
    pub events: Vec<ProjectedEvent>,
}

impl DayEvents {
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.id.as_str())
    }
}

/// Projects and merges `count` consecutive days starting at `start`.
pub fn project_days(
    start: NaiveDate,
    count: u32,
    persons: &[Person],
    calendar: &[CalendarEvent],
    now: DateTime<Utc>,
    ctx: &ProjectionContext,
) -> Vec<DayEvents> {
    (0..count)
        .filter_map(|offset| start.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| {
            let location = custody_location(date, persons, &ctx.rules);
            let planning = project_day(date, persons, &location, ctx);
            let events = merge_day(date, planning, calendar, &location, now, ctx);
            DayEvents {
                date,
                holiday: holiday_on(date),
                custody_location: location,
                events,
            }
        })
        .collect()
}
