//! Custody resolution: where the children are on a given date.

use chrono::{Datelike, NaiveDate};

use super::calendar::iso_week;
use super::model::{CustodyOverride, CustodySchedule, Person, PersonKind};
use super::rules::ClassificationRules;

impl CustodyOverride {
    /// Whether `date` falls in this range, read within `date`'s year.
    ///
    /// A range ending before it starts (e.g. 20 Dec to 5 Jan) wraps over the
    /// year end. Ranges naming an impossible date never match.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let year = date.year();
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, self.month_start, self.day_start),
            NaiveDate::from_ymd_opt(year, self.month_end, self.day_end),
        ) else {
            return false;
        };

        if start <= end {
            start <= date && date <= end
        } else {
            date >= start || date <= end
        }
    }
}

/// Location of the children on `date`.
///
/// Overrides are checked in order and the first match wins; otherwise the
/// parity of the ISO week picks `weeks.odd` or `weeks.even`. Without `weeks`
/// the location is empty, which gates out every custody-dependent event.
pub fn resolve_custody(date: NaiveDate, schedule: &CustodySchedule) -> String {
    if let Some(hit) = schedule.overrides.iter().find(|o| o.contains(date)) {
        return hit.location.clone();
    }

    match &schedule.weeks {
        Some(weeks) if iso_week(date).is_odd() => weeks.odd.clone(),
        Some(weeks) => weeks.even.clone(),
        None => String::new(),
    }
}

/// The custody group record driving resolution: the configured one, or the
/// first `garde_alternee` record.
pub fn custody_group<'a>(
    persons: &'a [Person],
    rules: &ClassificationRules,
) -> Option<(&'a Person, &'a CustodySchedule)> {
    persons.iter().find_map(|person| match &person.kind {
        PersonKind::Custody(schedule)
            if rules
                .custody_group
                .as_deref()
                .map_or(true, |group| group == person.name) =>
        {
            Some((person, schedule))
        }
        _ => None,
    })
}

/// Custody location for `date`, empty when no custody group is configured.
pub fn custody_location(date: NaiveDate, persons: &[Person], rules: &ClassificationRules) -> String {
    custody_group(persons, rules)
        .map(|(_, schedule)| resolve_custody(date, schedule))
        .unwrap_or_default()
}
