//! Person and rotation rules, as read from the household configuration.
//!
//! The wire format is the JSON document the configuration store serves:
//! one record per schedule source, tagged by `type`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Day name (`monday`..`sunday`) to `HH:MM-HH:MM` intervals.
pub type DayHours = BTreeMap<String, Vec<String>>;

/// Day keys are matched lowercase, whatever case the store sends.
mod day_hours {
    use serde::{Deserialize, Deserializer};

    use super::DayHours;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DayHours, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = DayHours::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(day, hours)| (day.trim().to_ascii_lowercase(), hours))
            .collect())
    }
}

/// A named schedule source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Name of the custody group this source depends on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_type: Option<RotationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only shown on days the children are at home.
    #[serde(default)]
    pub custody_gated: bool,
    #[serde(flatten)]
    pub kind: PersonKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PersonKind {
    #[serde(rename = "fixed")]
    Fixed(FixedSchedule),
    #[serde(rename = "allday")]
    AllDay(AllDaySchedule),
    #[serde(rename = "shift")]
    Shift(ShiftSchedule),
    #[serde(rename = "garde_alternee")]
    Custody(CustodySchedule),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationType {
    /// Label switches with the parity of the ISO week.
    Alternate,
    #[serde(other)]
    Other,
}

/// Label used on weeks where `week % 2 == week_parity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternatingLabel {
    #[serde(alias = "weekMod2")]
    pub week_parity: u32,
    #[serde(rename = "type")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedSchedule {
    #[serde(default, deserialize_with = "day_hours::deserialize")]
    pub schedule: DayHours,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternating: Vec<AlternatingLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllDaySchedule {
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternating: Vec<AlternatingLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSchedule {
    #[serde(default)]
    pub rotation: Vec<RotationWeek>,
    /// Defaults to the number of rotation entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Keyed by `"{isoYear}-{isoWeek}"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub week_overrides: BTreeMap<String, WeekOverride>,
}

impl ShiftSchedule {
    pub fn effective_cycle_length(&self) -> u32 {
        self.cycle_length.unwrap_or(self.rotation.len() as u32)
    }
}

/// One week of a shift rotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationWeek {
    pub week: u32,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub hours: Vec<String>,
    /// Per-day hours replacing `hours`; an empty list means a day off.
    #[serde(
        default,
        deserialize_with = "day_hours::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub exceptions: DayHours,
}

/// Replaces the rotation for one specific week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverride {
    #[serde(default)]
    pub shift: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "day_hours::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub exceptions: DayHours,
}

/// Alternating custody calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustodySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<CustodyWeeks>,
    #[serde(default)]
    pub overrides: Vec<CustodyOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyWeeks {
    pub odd: String,
    pub even: String,
}

/// A dated exception to the odd/even custody rhythm, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyOverride {
    pub month_start: u32,
    pub day_start: u32,
    pub month_end: u32,
    pub day_end: u32,
    pub location: String,
}

impl Person {
    pub fn is_custody_group(&self) -> bool {
        matches!(self.kind, PersonKind::Custody(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            PersonKind::Fixed(_) => "fixed",
            PersonKind::AllDay(_) => "allday",
            PersonKind::Shift(_) => "shift",
            PersonKind::Custody(_) => "garde_alternee",
        }
    }

    /// Parse a list of person records, skipping the ones that do not match
    /// any known shape.
    pub fn parse_list(records: &[serde_json::Value]) -> Vec<Person> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match Person::deserialize(record) {
                Ok(person) => Some(person),
                Err(e) => {
                    let name = record.get("name").and_then(|n| n.as_str()).unwrap_or("?");
                    warn!(index, name, error = %e, "skipping malformed person record");
                    None
                }
            })
            .collect()
    }
}

/// Label for the current week, if an entry matches its parity.
pub fn alternating_label(labels: &[AlternatingLabel], parity: u32) -> Option<&str> {
    labels
        .iter()
        .find(|entry| entry.week_parity == parity)
        .map(|entry| entry.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_all_person_types() {
        let records = vec![
            json!({
                "name": "Rugby",
                "type": "fixed",
                "location": "Stade",
                "colorType": "rugby",
                "schedule": { "wednesday": ["14:00-16:00"] }
            }),
            json!({
                "name": "Poubelle",
                "type": "allday",
                "days": ["monday"],
                "rotationType": "alternate",
                "alternating": [
                    { "weekMod2": 0, "type": "Jaune" },
                    { "weekParity": 1, "type": "Noire" }
                ]
            }),
            json!({
                "name": "Luis",
                "type": "shift",
                "rotation": [{ "week": 1, "shift": "Nuit", "hours": ["21:00-05:00"] }],
                "offset": 1
            }),
            json!({
                "name": "Lyam & Noah",
                "type": "garde_alternee",
                "weeks": { "odd": "Chez Papa", "even": "Chez Maman" },
                "overrides": [
                    { "month_start": 7, "day_start": 1, "month_end": 7, "day_end": 31, "location": "Chez Maman" }
                ]
            }),
        ];

        let persons = Person::parse_list(&records);
        assert_eq!(persons.len(), 4);
        assert_eq!(persons[0].color_type.as_deref(), Some("rugby"));

        match &persons[1].kind {
            PersonKind::AllDay(s) => {
                assert_eq!(persons[1].rotation_type, Some(RotationType::Alternate));
                assert_eq!(alternating_label(&s.alternating, 0), Some("Jaune"));
                assert_eq!(alternating_label(&s.alternating, 1), Some("Noire"));
            }
            other => panic!("expected allday, got {other:?}"),
        }

        match &persons[2].kind {
            PersonKind::Shift(s) => {
                assert_eq!(s.effective_cycle_length(), 1);
                assert_eq!(s.offset, Some(1));
            }
            other => panic!("expected shift, got {other:?}"),
        }

        assert!(persons[3].is_custody_group());
        assert_eq!(persons[3].kind_name(), "garde_alternee");
    }

    #[test]
    fn malformed_records_are_skipped() {
        let records = vec![
            json!({ "name": "Unknown", "type": "teleport" }),
            json!({ "type": "fixed" }),
            json!({ "name": "Ok", "type": "allday", "days": ["sunday"] }),
        ];
        let persons = Person::parse_list(&records);
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].name, "Ok");
    }

    #[test]
    fn unknown_rotation_type_is_tolerated() {
        let person: Person = serde_json::from_value(json!({
            "name": "Sport",
            "type": "fixed",
            "rotationType": "weekly",
            "schedule": {}
        }))
        .unwrap();
        assert_eq!(person.rotation_type, Some(RotationType::Other));
    }

    #[test]
    fn week_override_round_trip_keeps_exceptions() {
        let person: Person = serde_json::from_value(json!({
            "name": "Caroline",
            "type": "shift",
            "cycleLength": 9,
            "offset": 6,
            "rotation": [],
            "weekOverrides": {
                "2026-5": { "shift": "Nuit", "hours": ["21:00-05:00"], "exceptions": { "friday": ["19:00-02:00"] } }
            }
        }))
        .unwrap();

        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["type"], "shift");
        assert_eq!(json["weekOverrides"]["2026-5"]["exceptions"]["friday"][0], "19:00-02:00");
        assert_eq!(serde_json::from_value::<Person>(json).unwrap(), person);
    }
}
