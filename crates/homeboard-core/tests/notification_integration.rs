//! Integration tests for the notification pipeline.
//!
//! These tests drive a dashboard through refresh, scan and tick cycles the
//! way the watch loop does, with an explicit clock.

use chrono::{DateTime, Duration, Utc};
use homeboard_core::notify::dispatch;
use homeboard_core::{
    Dashboard, DashboardSettings, Event, Notification, NotificationSink, Person, ThresholdKind,
};
use serde_json::json;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

fn persons() -> Vec<Person> {
    // 2026-10-18 is a Sunday; 18:00 Paris is 16:00 UTC. Children at home
    // every week so the rugby practice is shown.
    serde_json::from_value(json!([
        { "name": "Rugby", "type": "fixed", "location": "Stade", "schedule": { "sunday": ["18:00-19:00"] } },
        { "name": "Poubelle", "type": "allday", "days": ["sunday"] },
        { "name": "Lyam & Noah", "type": "garde_alternee", "weeks": { "odd": "Chez Papa", "even": "Chez Papa" } }
    ]))
    .unwrap()
}

fn queued_kinds(events: &[Event]) -> Vec<(String, ThresholdKind)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::NotificationQueued { event_id, kind, .. } => Some((event_id.clone(), *kind)),
            _ => None,
        })
        .collect()
}

#[derive(Default)]
struct Screen {
    shown: Vec<String>,
    visible: usize,
    max_visible: usize,
}

impl NotificationSink for Screen {
    fn show(&mut self, n: &Notification) {
        self.shown.push(n.headline());
        self.visible += 1;
        self.max_visible = self.max_visible.max(self.visible);
    }

    fn hide(&mut self, _n: &Notification) {
        self.visible -= 1;
    }
}

#[test]
fn test_dedup_across_consecutive_scans() {
    let mut dashboard = Dashboard::default();
    let start = at("2026-10-18T14:56:00Z");
    dashboard.refresh(persons(), vec![], start);

    // Three scans 30 s apart inside the one-hour window.
    let mut all = Vec::new();
    for i in 0..3 {
        all.extend(queued_kinds(&dashboard.scan(start + Duration::seconds(30 * i))));
    }
    let rugby: Vec<_> = all.iter().filter(|(id, _)| id.contains("Rugby")).collect();
    assert_eq!(rugby.len(), 1);
    assert_eq!(rugby[0].1, ThresholdKind::OneHour);

    // Half an hour later the thirty-minute notification fires once.
    let later = queued_kinds(&dashboard.scan(at("2026-10-18T15:31:00Z")));
    assert!(later
        .iter()
        .any(|(id, kind)| id.contains("Rugby") && *kind == ThresholdKind::ThirtyMinutes));
    assert!(queued_kinds(&dashboard.scan(at("2026-10-18T15:32:00Z"))).is_empty());
}

#[test]
fn test_all_day_reminder_interval() {
    let mut dashboard = Dashboard::default();
    let first = at("2026-10-18T06:00:00Z");
    dashboard.refresh(persons(), vec![], first);

    let reminders = |events: Vec<Event>| -> usize {
        queued_kinds(&events)
            .into_iter()
            .filter(|(_, kind)| *kind == ThresholdKind::Reminder)
            .count()
    };

    assert_eq!(reminders(dashboard.scan(first)), 1);
    assert_eq!(reminders(dashboard.scan(first + Duration::minutes(179))), 0);
    assert_eq!(reminders(dashboard.scan(first + Duration::minutes(181))), 1);
}

#[test]
fn test_custody_day_is_silent() {
    let persons: Vec<Person> = serde_json::from_value(json!([
        { "name": "Lyam & Noah", "type": "garde_alternee", "weeks": { "odd": "Chez Papa", "even": "Chez Papa" } }
    ]))
    .unwrap();
    let mut dashboard = Dashboard::default();
    let now = at("2026-10-18T06:00:00Z");
    dashboard.refresh(persons, vec![], now);

    let today = &dashboard.days(now)[0];
    assert_eq!(today.events.len(), 1);
    assert!(dashboard.scan(now).is_empty());
}

#[test]
fn test_queue_shows_one_at_a_time() {
    let mut dashboard = Dashboard::new(DashboardSettings {
        display: Duration::seconds(15),
        cooldown: Duration::seconds(2),
        ..DashboardSettings::default()
    });
    let now = at("2026-10-18T15:00:00Z");
    dashboard.refresh(persons(), vec![], now);
    dashboard.scan(now);
    dashboard.test_notification("Essai", now);

    let mut screen = Screen::default();
    for second in 0..90 {
        let events = dashboard.tick(now + Duration::seconds(second));
        dispatch(&events, &mut screen);
    }

    assert_eq!(screen.max_visible, 1);
    assert_eq!(screen.shown.len(), 3);
    assert_eq!(screen.shown[0], "[Rappel] Poubelle");
    assert_eq!(screen.shown[1], "[1 heure] 18:00-19:00 Rugby (Stade)");
    assert_eq!(screen.shown[2], "[Test] Essai");
    assert!(dashboard.queue().is_idle());
}
