//! Schedule projection: turns person rules into the planning events of a day.
//!
//! Every function here is pure. Missing or malformed configuration produces
//! fewer events, never an error.

use chrono::NaiveDate;
use tracing::debug;

use super::calendar::{day_name, is_weekend, iso_week, IsoWeek, TimeSlot};
use super::custody::custody_group;
use super::event::{ColorType, ProjectedEvent};
use super::model::{
    alternating_label, AllDaySchedule, AlternatingLabel, FixedSchedule, Person, PersonKind,
    RotationType, ShiftSchedule,
};
use super::rules::{ProjectionContext, UNKNOWN_LABEL};

/// Day-level facts shared by every rule projected on that day.
struct DayFacts<'a> {
    date: NaiveDate,
    week: IsoWeek,
    day: &'static str,
    at_home: bool,
    ctx: &'a ProjectionContext,
}

/// Planning events of `date`, unordered.
pub fn project_day(
    date: NaiveDate,
    persons: &[Person],
    custody_location: &str,
    ctx: &ProjectionContext,
) -> Vec<ProjectedEvent> {
    let facts = DayFacts {
        date,
        week: iso_week(date),
        day: day_name(date),
        at_home: ctx.rules.is_home(custody_location),
        ctx,
    };
    let group = custody_group(persons, &ctx.rules).map(|(person, _)| person.name.as_str());
    let group_names: Vec<&str> = persons
        .iter()
        .filter(|p| p.is_custody_group())
        .map(|p| p.name.as_str())
        .collect();

    let mut events = Vec::new();
    for person in persons {
        if !facts.at_home && is_custody_dependent(person, &group_names, ctx) {
            debug!(person = %person.name, %date, "children away, skipping custody-dependent source");
            continue;
        }

        match &person.kind {
            PersonKind::Custody(_) => {
                if facts.at_home && group == Some(person.name.as_str()) {
                    events.push(
                        ProjectedEvent::all_day(format!("garde-{date}"), &person.name, date)
                            .with_location(ctx.rules.home_location.clone())
                            .with_color(ColorType::Custody)
                            .without_notification(),
                    );
                }
            }
            PersonKind::Fixed(schedule) => project_fixed(person, schedule, &facts, &mut events),
            PersonKind::AllDay(schedule) => project_all_day(person, schedule, &facts, &mut events),
            PersonKind::Shift(schedule) => project_shift(person, schedule, &facts, &mut events),
        }
    }

    events
}

fn is_custody_dependent(person: &Person, group_names: &[&str], ctx: &ProjectionContext) -> bool {
    if person.custody_gated || ctx.rules.has_gated_term(&person.name) {
        return true;
    }
    person.linked_to.as_deref().is_some_and(|linked| {
        group_names.contains(&linked) || ctx.rules.custody_group.as_deref() == Some(linked)
    })
}

fn base_color(person: &Person) -> ColorType {
    person
        .color_type
        .as_deref()
        .map(ColorType::from)
        .unwrap_or(ColorType::Planning)
}

fn alternates(person: &Person, labels: &[AlternatingLabel]) -> bool {
    person.rotation_type == Some(RotationType::Alternate) && !labels.is_empty()
}

fn project_fixed(
    person: &Person,
    schedule: &FixedSchedule,
    facts: &DayFacts<'_>,
    events: &mut Vec<ProjectedEvent>,
) {
    let Some(hours) = schedule.schedule.get(facts.day) else {
        return;
    };

    let exchange = facts.ctx.rules.is_exchange(&person.name);
    if exchange && !facts.at_home {
        return;
    }

    let color = if exchange {
        ColorType::Custody
    } else if alternates(person, &schedule.alternating) {
        let label = alternating_label(&schedule.alternating, facts.week.parity()).unwrap_or(UNKNOWN_LABEL);
        ColorType::from(label.to_lowercase())
    } else {
        base_color(person)
    };

    for raw in hours {
        let Some(slot) = TimeSlot::parse(raw) else {
            debug!(person = %person.name, interval = %raw, "ignoring malformed interval");
            continue;
        };
        events.push(
            ProjectedEvent::timed(
                format!("planning-{}-{}-{}", person.name, facts.date, raw),
                &person.name,
                facts.date,
                slot,
                facts.ctx.tz,
            )
            .with_location(person.location.clone().unwrap_or_default())
            .with_color(color.clone()),
        );
    }
}

fn project_all_day(
    person: &Person,
    schedule: &AllDaySchedule,
    facts: &DayFacts<'_>,
    events: &mut Vec<ProjectedEvent>,
) {
    if !schedule.days.iter().any(|d| d.eq_ignore_ascii_case(facts.day)) {
        return;
    }

    let mut color = base_color(person);
    if alternates(person, &schedule.alternating) {
        if let Some(label) = alternating_label(&schedule.alternating, facts.week.parity()) {
            color = ColorType::from(label.to_lowercase());
        }
    }

    events.push(
        ProjectedEvent::all_day(
            format!("allday-{}-{}", person.name, facts.date),
            &person.name,
            facts.date,
        )
        .with_location(person.location.clone().unwrap_or_default())
        .with_color(color)
        .with_description(person.description.clone()),
    );
}

fn project_shift(
    person: &Person,
    schedule: &ShiftSchedule,
    facts: &DayFacts<'_>,
    events: &mut Vec<ProjectedEvent>,
) {
    let location = person.location.clone().unwrap_or_default();

    if let Some(week_override) = schedule.week_overrides.get(&facts.week.override_key()) {
        let hours = week_override
            .exceptions
            .get(facts.day)
            .or(week_override.hours.as_ref())
            .map(Vec::as_slice)
            .unwrap_or_default();

        if facts.ctx.rules.is_leave(&week_override.shift) || hours.is_empty() {
            // Leave is counted on working days only.
            if !is_weekend(facts.date) {
                events.push(
                    ProjectedEvent::all_day(
                        format!("planning-{}-{}-leave", person.name, facts.date),
                        &person.name,
                        facts.date,
                    )
                    .with_shift(week_override.shift.clone()),
                );
            }
            return;
        }

        push_shift_hours(person, &week_override.shift, hours, &location, facts, events);
        return;
    }

    let cycle = schedule.effective_cycle_length();
    if cycle == 0 {
        return;
    }
    let offset = schedule.offset.unwrap_or(0);
    let week_in_cycle = (i64::from(facts.week.week) - 1 - offset).rem_euclid(i64::from(cycle)) + 1;

    let Some(rotation) = schedule
        .rotation
        .iter()
        .find(|r| i64::from(r.week) == week_in_cycle)
    else {
        debug!(person = %person.name, week_in_cycle, "no rotation entry for this week");
        return;
    };

    let hours = rotation.exceptions.get(facts.day).unwrap_or(&rotation.hours);
    push_shift_hours(person, &rotation.shift, hours, &location, facts, events);
}

fn push_shift_hours(
    person: &Person,
    shift: &str,
    hours: &[String],
    location: &str,
    facts: &DayFacts<'_>,
    events: &mut Vec<ProjectedEvent>,
) {
    for raw in hours {
        let Some(slot) = TimeSlot::parse(raw) else {
            debug!(person = %person.name, interval = %raw, "ignoring malformed interval");
            continue;
        };
        let mut event = ProjectedEvent::timed(
            format!("planning-{}-{}-{}", person.name, facts.date, raw),
            &person.name,
            facts.date,
            slot,
            facts.ctx.tz,
        )
        .with_location(location);
        if !shift.is_empty() {
            event = event.with_shift(shift);
        }
        events.push(event);
    }
}
