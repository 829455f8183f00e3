//! Single-display delivery queue.
//!
//! Like the timer engine it is a wall-clock state machine without threads:
//! the caller drives it with `tick(now)` and forwards the returned events to
//! a [`NotificationSink`].
//!
//! ```text
//! Idle -> Showing -> Cooldown -> (Showing | Idle)
//! ```

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

use super::scheduler::Notification;
use crate::events::Event;

/// Presentation seam for notifications.
///
/// Implementations deal with their own failures; the queue keeps going
/// regardless of what a sink does.
pub trait NotificationSink {
    fn show(&mut self, notification: &Notification);
    fn hide(&mut self, notification: &Notification);
}

/// Forwards queue events to `sink`.
pub fn dispatch(events: &[Event], sink: &mut dyn NotificationSink) {
    for event in events {
        match event {
            Event::NotificationShown { notification, .. } => sink.show(notification),
            Event::NotificationHidden { notification, .. } => sink.hide(notification),
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
    current: Option<(Notification, DateTime<Utc>)>,
    /// Nothing is shown before this instant.
    resume_at: Option<DateTime<Utc>>,
    display: Duration,
    cooldown: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(Duration::seconds(15), Duration::seconds(2))
    }
}

impl NotificationQueue {
    pub fn new(display: Duration, cooldown: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            resume_at: None,
            display,
            cooldown,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.pending.push_back(notification);
    }

    pub fn extend(&mut self, notifications: impl IntoIterator<Item = Notification>) {
        self.pending.extend(notifications);
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(n, _)| n)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Nothing shown and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Advances the queue to `now`.
    ///
    /// Returns at most one hide followed by at most one show.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(shown_at) = self.current.as_ref().map(|(_, at)| *at) {
            let hide_at = shown_at + self.display;
            if now < hide_at {
                return events;
            }
            if let Some((notification, _)) = self.current.take() {
                self.resume_at = Some(hide_at + self.cooldown);
                events.push(Event::NotificationHidden { notification, at: now });
            }
        }

        if self.resume_at.is_some_and(|resume| now < resume) {
            return events;
        }
        self.resume_at = None;

        if let Some(notification) = self.pending.pop_front() {
            self.current = Some((notification.clone(), now));
            events.push(Event::NotificationShown { notification, at: now });
        }

        events
    }
}
