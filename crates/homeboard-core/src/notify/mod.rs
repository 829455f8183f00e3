//! Notifications: threshold scanning, de-duplication and delivery.

pub mod queue;
pub mod scheduler;

pub use queue::{dispatch, NotificationQueue, NotificationSink};
pub use scheduler::{
    scan_notifications, Notification, NotificationPolicy, NotificationState, ThresholdKind,
};
