use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::{Notification, ThresholdKind};

/// Every state change of the dashboard produces an Event.
/// Frontends poll for events; sinks render the notification ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Person rules and calendar events were replaced.
    DataRefreshed {
        /// The inputs differ from the previous refresh.
        changed: bool,
        persons: usize,
        calendar_events: usize,
        /// Hex SHA-256 of the serialized inputs.
        fingerprint: String,
        at: DateTime<Utc>,
    },
    /// A notification passed its threshold and waits for display.
    NotificationQueued {
        event_id: String,
        kind: ThresholdKind,
        at: DateTime<Utc>,
    },
    NotificationShown {
        notification: Notification,
        at: DateTime<Utc>,
    },
    NotificationHidden {
        notification: Notification,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::DataRefreshed { at, .. }
            | Event::NotificationQueued { at, .. }
            | Event::NotificationShown { at, .. }
            | Event::NotificationHidden { at, .. } => *at,
        }
    }
}
