//! Dashboard orchestration.
//!
//! A [`Dashboard`] owns everything a refresh/scan/tick cycle needs: the
//! projection context, the latest inputs, the notification de-duplication
//! state and the delivery queue. Every operation takes `now` explicitly so
//! the caller decides the clock.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::Event;
use crate::notify::{
    scan_notifications, Notification, NotificationPolicy, NotificationQueue, NotificationState,
    ThresholdKind,
};
use crate::planning::{
    custody_location, project_days, CalendarEvent, DayEvents, Person, ProjectedEvent,
    ProjectionContext,
};

/// Tunables of a dashboard, usually built from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub context: ProjectionContext,
    /// Number of days projected, today included.
    pub window_days: u32,
    pub policy: NotificationPolicy,
    pub notifications_enabled: bool,
    /// How long a notification stays on screen.
    pub display: Duration,
    /// Pause between two notifications.
    pub cooldown: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            context: ProjectionContext::default(),
            window_days: 8,
            policy: NotificationPolicy::default(),
            notifications_enabled: true,
            display: Duration::seconds(15),
            cooldown: Duration::seconds(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    settings: DashboardSettings,
    persons: Vec<Person>,
    calendar: Vec<CalendarEvent>,
    fingerprint: Option<String>,
    state: NotificationState,
    queue: NotificationQueue,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardSettings::default())
    }
}

impl Dashboard {
    pub fn new(settings: DashboardSettings) -> Self {
        let queue = NotificationQueue::new(settings.display, settings.cooldown);
        Self {
            settings,
            persons: Vec::new(),
            calendar: Vec::new(),
            fingerprint: None,
            state: NotificationState::new(),
            queue,
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn calendar(&self) -> &[CalendarEvent] {
        &self.calendar
    }

    pub fn notification_state(&self) -> &NotificationState {
        &self.state
    }

    pub fn queue(&self) -> &NotificationQueue {
        &self.queue
    }

    /// Replaces the inputs and prunes notification state to the ids of the
    /// window projected at `now`.
    pub fn refresh(
        &mut self,
        persons: Vec<Person>,
        calendar: Vec<CalendarEvent>,
        now: DateTime<Utc>,
    ) -> Event {
        let fingerprint = fingerprint(&persons, &calendar);
        let changed = self.fingerprint.as_deref() != Some(fingerprint.as_str());

        self.persons = persons;
        self.calendar = calendar;
        self.fingerprint = Some(fingerprint.clone());

        let days = self.days(now);
        self.state
            .retain_known(days.iter().flat_map(|day| day.event_ids()));

        if changed {
            info!(
                persons = self.persons.len(),
                calendar_events = self.calendar.len(),
                "dashboard data changed"
            );
        } else {
            debug!("dashboard data unchanged");
        }

        Event::DataRefreshed {
            changed,
            persons: self.persons.len(),
            calendar_events: self.calendar.len(),
            fingerprint,
            at: now,
        }
    }

    /// Today in the display timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.settings.context.tz).date_naive()
    }

    /// The projected window starting today.
    pub fn days(&self, now: DateTime<Utc>) -> Vec<DayEvents> {
        self.days_from(self.today(now), now)
    }

    /// The projected window starting at `start`; expiry still uses `now`.
    pub fn days_from(&self, start: NaiveDate, now: DateTime<Utc>) -> Vec<DayEvents> {
        project_days(
            start,
            self.settings.window_days,
            &self.persons,
            &self.calendar,
            now,
            &self.settings.context,
        )
    }

    pub fn custody_on(&self, date: NaiveDate) -> String {
        custody_location(date, &self.persons, &self.settings.context.rules)
    }

    /// Runs the scheduler over the current window and queues what is due.
    pub fn scan(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if !self.settings.notifications_enabled {
            return Vec::new();
        }

        let days = self.days(now);
        let today = self.today(now);
        let due = scan_notifications(
            &days,
            &mut self.state,
            now,
            today,
            &self.settings.policy,
            self.settings.context.tz,
        );

        let events = due
            .iter()
            .map(|n| Event::NotificationQueued {
                event_id: n.event.id.clone(),
                kind: n.kind,
                at: now,
            })
            .collect();
        if !due.is_empty() {
            debug!(count = due.len(), "notifications queued");
        }
        self.queue.extend(due);
        events
    }

    /// Drives the delivery queue.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.queue.tick(now)
    }

    /// Queues a synthetic notification, bypassing thresholds and
    /// de-duplication.
    pub fn test_notification(&mut self, title: &str, now: DateTime<Utc>) -> Event {
        let id = format!("test-{}", Uuid::new_v4());
        let date = self.today(now);
        let mut event = ProjectedEvent::all_day(id.clone(), title, date);
        event.is_planning = false;
        event.description = Some("Notification de test".to_string());

        self.queue.push(Notification::new(event, ThresholdKind::Test));
        Event::NotificationQueued {
            event_id: id,
            kind: ThresholdKind::Test,
            at: now,
        }
    }
}

/// Hex SHA-256 of the serialized inputs.
fn fingerprint(persons: &[Person], calendar: &[CalendarEvent]) -> String {
    let mut hasher = Sha256::new();
    // Serializing these types cannot fail: every map is keyed by strings.
    hasher.update(serde_json::to_vec(persons).unwrap_or_default());
    hasher.update([0u8]);
    hasher.update(serde_json::to_vec(calendar).unwrap_or_default());
    hex::encode(hasher.finalize())
}
