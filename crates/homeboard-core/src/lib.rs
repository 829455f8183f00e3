//! # Homeboard Core Library
//!
//! This library provides the core logic of the Homeboard family dashboard.
//! It follows a CLI-first philosophy: every operation is available through
//! the standalone CLI binary, and any display frontend is a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Planning**: Turns recurring person rules (fixed hours, all-day
//!   reminders, shift rotations, alternating custody) into dated events and
//!   merges them with external calendar events
//! - **Holidays**: French public holidays and a few computed seasonal dates
//! - **Notifications**: Threshold scanning with de-duplication, plus a
//!   single-display queue driven by `tick()`
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Dashboard`]: Owns inputs, notification state and the delivery queue
//! - [`project_days`]: Pure projection of the day window
//! - [`NotificationQueue`]: Wall-clock state machine for on-screen delivery
//! - [`Config`]: Application configuration management

pub mod dashboard;
pub mod error;
pub mod events;
pub mod holidays;
pub mod notify;
pub mod planning;
pub mod sources;
pub mod storage;

pub use dashboard::{Dashboard, DashboardSettings};
pub use error::{ConfigError, CoreError, SourceError};
pub use events::Event;
pub use holidays::{
    easter_date, french_holidays, holiday_on, holidays_on, Holiday, HolidayCategory, HolidayKind,
};
pub use notify::{
    Notification, NotificationPolicy, NotificationQueue, NotificationSink, NotificationState,
    ThresholdKind,
};
pub use planning::{
    project_days, CalendarEvent, ClassificationRules, ColorType, DayEvents, EventBound, Person,
    ProjectedEvent, ProjectionContext,
};
pub use storage::Config;
