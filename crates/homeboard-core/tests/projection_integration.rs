//! Integration tests for day projection.
//!
//! These tests load a realistic household document and check the complete
//! window: custody, shift rotations, week overrides and calendar merging.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use homeboard_core::planning::{custody_location, project_day};
use homeboard_core::sources::{load_calendar, load_persons};
use homeboard_core::{project_days, CalendarEvent, ColorType, Person, ProjectionContext};
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

fn household() -> serde_json::Value {
    json!({
        "horaires": [
            {
                "name": "Lyam & Noah",
                "type": "garde_alternee",
                "weeks": { "odd": "Chez Papa", "even": "Chez Maman" },
                "overrides": [
                    { "month_start": 2, "day_start": 14, "month_end": 2, "day_end": 22, "location": "Chez Papa" }
                ]
            },
            {
                "name": "Caroline",
                "type": "shift",
                "location": "Hôpital",
                "cycleLength": 9,
                "offset": 6,
                "rotation": [
                    { "week": 1, "shift": "Matin", "hours": ["06:45-14:15"] },
                    { "week": 2, "shift": "Soir", "hours": ["13:45-21:15"] }
                ],
                "weekOverrides": {
                    "2026-5": {
                        "shift": "Nuit",
                        "hours": ["21:00-05:00"],
                        "exceptions": { "friday": ["19:00-02:00"] }
                    }
                }
            },
            {
                "name": "Luis",
                "type": "shift",
                "offset": 1,
                "rotation": [
                    { "week": 1, "shift": "Nuit", "hours": ["21:00-05:00"] },
                    { "week": 2, "shift": "Soir", "hours": ["13:00-21:00"] },
                    { "week": 3, "shift": "Matin", "hours": ["05:00-13:00"] }
                ]
            },
            {
                "name": "Rugby",
                "type": "fixed",
                "location": "Stade",
                "colorType": "rugby",
                "schedule": { "saturday": ["10:00-12:00"] }
            },
            {
                "name": "Poubelle",
                "type": "allday",
                "rotationType": "alternate",
                "alternating": [
                    { "weekMod2": 0, "type": "Jaune" },
                    { "weekMod2": 1, "type": "Noire" }
                ],
                "days": ["monday"]
            }
        ]
    })
}

fn persons() -> Vec<Person> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persons.json");
    std::fs::write(&path, household().to_string()).unwrap();
    load_persons(&path).unwrap()
}

#[test]
fn test_caroline_override_friday() {
    let persons = persons();
    let ctx = ProjectionContext::default();
    let friday = date(2026, 1, 30);

    let location = custody_location(friday, &persons, &ctx.rules);
    let events: Vec<_> = project_day(friday, &persons, &location, &ctx)
        .into_iter()
        .filter(|e| e.title == "Caroline")
        .collect();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time_range(), "19:00-02:00");
    assert_eq!(events[0].shift.as_deref(), Some("Nuit"));
    assert_eq!(events[0].location, "Hôpital");
    assert_eq!(
        events[0].end.and_then(|e| e.as_datetime()).map(|e| e.to_rfc3339()),
        Some("2026-01-31T02:00:00+01:00".to_string())
    );
}

#[test]
fn test_luis_rotation_week_five() {
    let persons = persons();
    let ctx = ProjectionContext::default();
    let friday = date(2026, 1, 30);

    let events: Vec<_> = project_day(friday, &persons, "", &ctx)
        .into_iter()
        .filter(|e| e.title == "Luis")
        .collect();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].shift.as_deref(), Some("Nuit"));
    assert_eq!(events[0].time_range(), "21:00-05:00");
}

#[test]
fn test_full_window_from_files() {
    let persons = persons();
    let dir = tempfile::tempdir().unwrap();
    let calendar_path = dir.path().join("calendar.json");
    std::fs::write(
        &calendar_path,
        json!({
            "events": [
                { "id": "g1", "summary": "Rendez-vous garage", "start": "2026-01-31T09:00:00+01:00", "end": "2026-01-31T10:00:00+01:00" },
                { "id": "n1", "summary": "Dentiste Noah", "start": "2026-02-03T17:00:00+01:00" },
                { "id": "b1", "summary": "Anniversaire Mamie", "start": "2026-02-01" }
            ]
        })
        .to_string(),
    )
    .unwrap();
    let calendar: Vec<CalendarEvent> = load_calendar(&calendar_path).unwrap();
    let ctx = ProjectionContext::default();
    let now = at("2026-01-30T06:00:00Z");

    let days = project_days(date(2026, 1, 30), 8, &persons, &calendar, now, &ctx);
    assert_eq!(days.len(), 8);

    // Saturday of an odd week: children at home, rugby shown.
    let saturday = &days[1];
    assert_eq!(saturday.custody_location, "Chez Papa");
    let titles: Vec<&str> = saturday.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Lyam & Noah", "Rendez-vous garage", "Rugby", "Caroline", "Luis"]);
    let rugby = saturday.events.iter().find(|e| e.title == "Rugby").unwrap();
    assert_eq!(rugby.color_type, ColorType::Other("rugby".into()));

    // Sunday birthday is an all-day calendar event.
    let sunday = &days[2];
    let birthday = sunday.events.iter().find(|e| e.id == "b1").unwrap();
    assert!(birthday.is_all_day);
    assert_eq!(birthday.color_type, ColorType::Birthday);

    // Monday of week 6: children away, even-week bin color.
    let monday = &days[3];
    assert_eq!(monday.custody_location, "Chez Maman");
    let bin = monday.events.iter().find(|e| e.title == "Poubelle").unwrap();
    assert_eq!(bin.color_type, ColorType::Other("jaune".into()));
    assert!(monday.events.iter().all(|e| !e.id.starts_with("garde-")));

    // Tuesday: the child appointment is hidden while away.
    let tuesday = &days[4];
    assert!(tuesday.events.iter().all(|e| e.id != "n1"));
}

#[test]
fn test_custody_override_beats_parity() {
    let persons = persons();
    let ctx = ProjectionContext::default();
    // 2026-02-16 is in ISO week 8 (even) but inside the February override.
    assert_eq!(custody_location(date(2026, 2, 16), &persons, &ctx.rules), "Chez Papa");
    // Week 6 has no override.
    assert_eq!(custody_location(date(2026, 2, 2), &persons, &ctx.rules), "Chez Maman");
}

#[test]
fn test_cyclic_rotation_over_a_year() {
    let persons = persons();
    let ctx = ProjectionContext::default();
    let labels = ["Nuit", "Soir", "Matin"];

    // Every Wednesday of 2026 follows ((week - 1 - 1) mod 3) + 1.
    let mut day = date(2026, 1, 7);
    while day.year() == 2026 {
        let week = homeboard_core::planning::iso_week(day).week as i64;
        let expected = labels[(week - 2).rem_euclid(3) as usize];
        let luis = project_day(day, &persons, "", &ctx)
            .into_iter()
            .find(|e| e.title == "Luis")
            .unwrap();
        assert_eq!(luis.shift.as_deref(), Some(expected), "week {week}");
        day = day + chrono::Duration::days(7);
    }
}
