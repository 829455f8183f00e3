//! Notification scheduling: decides which events deserve a notification now.
//!
//! The scheduler is a pure function over the projected window plus a small
//! de-duplication state owned by the caller.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::planning::{DayEvents, ProjectedEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdKind {
    OneHour,
    ThirtyMinutes,
    /// Periodic reminder for today's all-day events.
    Reminder,
    Test,
}

impl ThresholdKind {
    /// Text shown in the notification header.
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdKind::OneHour => "1 heure",
            ThresholdKind::ThirtyMinutes => "30 minutes",
            ThresholdKind::Reminder => "Rappel",
            ThresholdKind::Test => "Test",
        }
    }
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A notification due for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub event: ProjectedEvent,
    pub kind: ThresholdKind,
}

impl Notification {
    pub fn new(event: ProjectedEvent, kind: ThresholdKind) -> Self {
        Self { event, kind }
    }

    /// One-line summary, e.g. `[30 minutes] 18:00-19:00 Rugby (Stade)`.
    pub fn headline(&self) -> String {
        let mut line = format!("[{}]", self.kind.label());
        let range = self.event.time_range();
        if !range.is_empty() {
            line.push(' ');
            line.push_str(&range);
        }
        line.push(' ');
        line.push_str(&self.event.title);
        if !self.event.location.is_empty() {
            line.push_str(&format!(" ({})", self.event.location));
        }
        line
    }
}

/// Lead times and tolerances of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPolicy {
    pub one_hour_lead: Duration,
    pub thirty_min_lead: Duration,
    /// Half-width of the window around each lead time.
    pub tolerance: Duration,
    /// Minimum spacing of reminders for one all-day event.
    pub all_day_interval: Duration,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            one_hour_lead: Duration::minutes(60),
            thirty_min_lead: Duration::minutes(30),
            tolerance: Duration::minutes(5),
            all_day_interval: Duration::hours(3),
        }
    }
}

/// What has already been announced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    one_hour: HashSet<String>,
    thirty_min: HashSet<String>,
    all_day: HashMap<String, DateTime<Utc>>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self, id: &str, kind: ThresholdKind) -> bool {
        match kind {
            ThresholdKind::OneHour => self.one_hour.contains(id),
            ThresholdKind::ThirtyMinutes => self.thirty_min.contains(id),
            ThresholdKind::Reminder => self.all_day.contains_key(id),
            ThresholdKind::Test => false,
        }
    }

    pub fn last_reminder(&self, id: &str) -> Option<DateTime<Utc>> {
        self.all_day.get(id).copied()
    }

    /// Forgets every id not in `known`, so the state stays bounded by the
    /// projected window.
    pub fn retain_known<'a>(&mut self, known: impl IntoIterator<Item = &'a str>) {
        let known: HashSet<&str> = known.into_iter().collect();
        self.one_hour.retain(|id| known.contains(id.as_str()));
        self.thirty_min.retain(|id| known.contains(id.as_str()));
        self.all_day.retain(|id, _| known.contains(id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.one_hour.len() + self.thirty_min.len() + self.all_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scans the projected window and returns the notifications due at `now`,
/// recording them in `state`.
///
/// All-day reminders only concern events of `today`. A timed event gets at
/// most one notification per scan, the one-hour kind taking precedence.
pub fn scan_notifications(
    days: &[DayEvents],
    state: &mut NotificationState,
    now: DateTime<Utc>,
    today: NaiveDate,
    policy: &NotificationPolicy,
    tz: Tz,
) -> Vec<Notification> {
    let mut due = Vec::new();

    for day in days {
        for event in day.events.iter().filter(|e| !e.no_notification) {
            if event.is_all_day {
                if day.date == today {
                    if let Some(n) = check_all_day(event, state, now, policy) {
                        due.push(n);
                    }
                }
                continue;
            }
            if let Some(n) = check_timed(event, state, now, policy, tz) {
                due.push(n);
            }
        }
    }

    due
}

fn check_all_day(
    event: &ProjectedEvent,
    state: &mut NotificationState,
    now: DateTime<Utc>,
    policy: &NotificationPolicy,
) -> Option<Notification> {
    let due = match state.all_day.get(&event.id) {
        Some(last) => now - *last >= policy.all_day_interval,
        None => true,
    };
    if !due {
        return None;
    }
    state.all_day.insert(event.id.clone(), now);
    Some(Notification::new(event.clone(), ThresholdKind::Reminder))
}

fn check_timed(
    event: &ProjectedEvent,
    state: &mut NotificationState,
    now: DateTime<Utc>,
    policy: &NotificationPolicy,
    tz: Tz,
) -> Option<Notification> {
    let delta = event.start.start_instant(tz) - now;
    let near = |lead: Duration| (delta - lead).abs() <= policy.tolerance;

    if near(policy.one_hour_lead) && !state.one_hour.contains(&event.id) {
        state.one_hour.insert(event.id.clone());
        return Some(Notification::new(event.clone(), ThresholdKind::OneHour));
    }
    if near(policy.thirty_min_lead) && !state.thirty_min.contains(&event.id) {
        state.thirty_min.insert(event.id.clone());
        return Some(Notification::new(event.clone(), ThresholdKind::ThirtyMinutes));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::TimeSlot;

    fn paris() -> Tz {
        chrono_tz::Europe::Paris
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn day_with(events: Vec<ProjectedEvent>) -> Vec<DayEvents> {
        vec![DayEvents {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            custody_location: String::new(),
            holiday: None,
            events,
        }]
    }

    fn rugby() -> ProjectedEvent {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        // 18:00 Paris is 16:00 UTC.
        ProjectedEvent::timed(
            "rugby".into(),
            "Rugby",
            date,
            TimeSlot::parse("18:00-19:00").unwrap(),
            paris(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn one_hour_fires_once_inside_tolerance() {
        let days = day_with(vec![rugby()]);
        let policy = NotificationPolicy::default();
        let mut state = NotificationState::new();

        let first = scan_notifications(&days, &mut state, at("2026-10-18T14:57:00Z"), today(), &policy, paris());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ThresholdKind::OneHour);

        let again = scan_notifications(&days, &mut state, at("2026-10-18T15:02:00Z"), today(), &policy, paris());
        assert!(again.is_empty());
        assert!(state.has_fired("rugby", ThresholdKind::OneHour));
    }

    #[test]
    fn outside_tolerance_nothing_fires() {
        let days = day_with(vec![rugby()]);
        let mut state = NotificationState::new();
        let policy = NotificationPolicy::default();
        // 66 minutes before.
        assert!(scan_notifications(&days, &mut state, at("2026-10-18T14:54:00Z"), today(), &policy, paris()).is_empty());
        // 45 minutes before.
        assert!(scan_notifications(&days, &mut state, at("2026-10-18T15:15:00Z"), today(), &policy, paris()).is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn thirty_minutes_fires_independently() {
        let days = day_with(vec![rugby()]);
        let mut state = NotificationState::new();
        let policy = NotificationPolicy::default();

        let n = scan_notifications(&days, &mut state, at("2026-10-18T15:30:00Z"), today(), &policy, paris());
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].kind, ThresholdKind::ThirtyMinutes);
        assert_eq!(n[0].headline(), "[30 minutes] 18:00-19:00 Rugby");
    }

    #[test]
    fn overlapping_windows_yield_one_kind_per_scan() {
        let days = day_with(vec![rugby()]);
        let mut state = NotificationState::new();
        let policy = NotificationPolicy {
            one_hour_lead: Duration::minutes(40),
            thirty_min_lead: Duration::minutes(35),
            ..NotificationPolicy::default()
        };

        let first = scan_notifications(&days, &mut state, at("2026-10-18T15:22:00Z"), today(), &policy, paris());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ThresholdKind::OneHour);

        let second = scan_notifications(&days, &mut state, at("2026-10-18T15:23:00Z"), today(), &policy, paris());
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].kind, ThresholdKind::ThirtyMinutes);
    }

    #[test]
    fn all_day_reminders_respect_interval_and_today() {
        let event = ProjectedEvent::all_day("poubelle".into(), "Poubelle", today());
        let mut days = day_with(vec![event.clone()]);
        let tomorrow = today().succ_opt().unwrap();
        days.push(DayEvents {
            date: tomorrow,
            custody_location: String::new(),
            holiday: None,
            events: vec![ProjectedEvent::all_day("demain".into(), "Demain", tomorrow)],
        });
        let mut state = NotificationState::new();
        let policy = NotificationPolicy::default();

        let first = scan_notifications(&days, &mut state, at("2026-10-18T06:00:00Z"), today(), &policy, paris());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ThresholdKind::Reminder);
        assert_eq!(first[0].event.id, "poubelle");

        let early = scan_notifications(&days, &mut state, at("2026-10-18T08:59:00Z"), today(), &policy, paris());
        assert!(early.is_empty());

        let later = scan_notifications(&days, &mut state, at("2026-10-18T09:00:00Z"), today(), &policy, paris());
        assert_eq!(later.len(), 1);
        assert_eq!(state.last_reminder("poubelle"), Some(at("2026-10-18T09:00:00Z")));
    }

    #[test]
    fn silenced_events_never_notify() {
        let event = ProjectedEvent::all_day("garde".into(), "Lyam & Noah", today()).without_notification();
        let days = day_with(vec![event, rugby().without_notification()]);
        let mut state = NotificationState::new();
        let n = scan_notifications(&days, &mut state, at("2026-10-18T15:00:00Z"), today(), &NotificationPolicy::default(), paris());
        assert!(n.is_empty());
    }

    #[test]
    fn retain_known_prunes_every_structure() {
        let days = day_with(vec![rugby(), ProjectedEvent::all_day("poubelle".into(), "Poubelle", today())]);
        let mut state = NotificationState::new();
        let policy = NotificationPolicy::default();
        scan_notifications(&days, &mut state, at("2026-10-18T15:00:00Z"), today(), &policy, paris());
        scan_notifications(&days, &mut state, at("2026-10-18T15:30:00Z"), today(), &policy, paris());
        assert_eq!(state.len(), 3);

        state.retain_known(["poubelle"]);
        assert_eq!(state.len(), 1);
        assert!(!state.has_fired("rugby", ThresholdKind::OneHour));
        assert!(!state.has_fired("rugby", ThresholdKind::ThirtyMinutes));
        assert!(state.has_fired("poubelle", ThresholdKind::Reminder));
    }
}
