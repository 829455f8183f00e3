pub mod config;
pub mod custody;
pub mod days;
pub mod holidays;
pub mod notify;

use chrono::{DateTime, NaiveDate, Utc};
use homeboard_core::{CalendarEvent, Config, Dashboard, Person};
use tracing::warn;

/// Configuration plus a dashboard loaded with the current source files.
pub struct Session {
    pub config: Config,
    pub dashboard: Dashboard,
}

impl Session {
    pub fn open(now: DateTime<Utc>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let mut dashboard = Dashboard::new(config.dashboard_settings()?);
        let (persons, calendar) = read_sources(&config);
        dashboard.refresh(persons, calendar, now);
        Ok(Self { config, dashboard })
    }
}

/// Reads both sources; an unreadable source counts as empty.
pub fn read_sources(config: &Config) -> (Vec<Person>, Vec<CalendarEvent>) {
    (read_persons(config).unwrap_or_default(), read_calendar(config).unwrap_or_default())
}

pub fn read_persons(config: &Config) -> Option<Vec<Person>> {
    config
        .load_persons()
        .map_err(|e| warn!(error = %e, "person rules unavailable"))
        .ok()
}

pub fn read_calendar(config: &Config) -> Option<Vec<CalendarEvent>> {
    config
        .load_calendar()
        .map_err(|e| warn!(error = %e, "calendar events unavailable"))
        .ok()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{raw}': {e}").into())
}
