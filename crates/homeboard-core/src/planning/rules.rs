//! Classification rules: which sources depend on custody, which calendar
//! entries concern the children, what counts as a birthday or a leave week.
//!
//! Terms match case-insensitively as substrings; exchange names and leave
//! labels must match exactly (ignoring case).

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Category used when an alternating rule has no entry for the week.
pub const UNKNOWN_LABEL: &str = "Inconnue";
/// Title of calendar events without a summary.
pub const UNTITLED_EVENT: &str = "Événement sans titre";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRules {
    /// Custody location meaning "the children are with us".
    pub home_location: String,
    /// Name of the `garde_alternee` record to resolve; the first one when unset.
    pub custody_group: Option<String>,
    /// Person names containing one of these are custody-dependent.
    pub gated_terms: Vec<String>,
    /// Persons announcing a children exchange.
    pub exchange_names: Vec<String>,
    /// Calendar summaries containing one of these concern the children.
    pub child_event_terms: Vec<String>,
    pub birthday_terms: Vec<String>,
    /// Shift labels of a week override meaning "not working".
    pub leave_shift_labels: Vec<String>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            home_location: "Chez Papa".to_string(),
            custody_group: None,
            gated_terms: vec!["Rugby".to_string()],
            exchange_names: vec!["Echange enfants".to_string()],
            child_event_terms: vec!["Lyam".to_string(), "Noah".to_string(), "Enfant".to_string()],
            birthday_terms: vec!["anniversaire".to_string()],
            leave_shift_labels: vec!["CP".to_string()],
        }
    }
}

impl ClassificationRules {
    /// An unresolved (empty) location never counts as home.
    pub fn is_home(&self, custody_location: &str) -> bool {
        !custody_location.is_empty() && custody_location == self.home_location
    }

    pub fn has_gated_term(&self, name: &str) -> bool {
        contains_any(name, &self.gated_terms)
    }

    pub fn is_exchange(&self, name: &str) -> bool {
        equals_any(name, &self.exchange_names)
    }

    pub fn is_child_event(&self, summary: &str) -> bool {
        contains_any(summary, &self.child_event_terms)
    }

    pub fn is_birthday(&self, summary: &str) -> bool {
        contains_any(summary, &self.birthday_terms)
    }

    pub fn is_leave(&self, shift: &str) -> bool {
        equals_any(shift, &self.leave_shift_labels)
    }
}

/// Everything a projection pass needs besides its data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionContext {
    /// Timezone of the display; projected timestamps carry its offset.
    pub tz: Tz,
    pub rules: ClassificationRules,
}

impl ProjectionContext {
    pub fn new(tz: Tz, rules: ClassificationRules) -> Self {
        Self { tz, rules }
    }
}

impl Default for ProjectionContext {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Europe::Paris,
            rules: ClassificationRules::default(),
        }
    }
}

fn contains_any(haystack: &str, terms: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    terms
        .iter()
        .filter(|t| !t.is_empty())
        .any(|t| haystack.contains(&t.to_lowercase()))
}

fn equals_any(value: &str, candidates: &[String]) -> bool {
    let value = value.trim().to_lowercase();
    candidates.iter().any(|c| c.trim().to_lowercase() == value)
}
