//! Loading of the two external inputs: person rules and calendar events.
//!
//! Both are JSON documents produced by other services. Records that do not
//! parse are skipped with a warning; only an unreadable or wrongly shaped
//! document is an error.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::planning::{CalendarEvent, Person};

/// Reads person rules: either an array of records or the configuration
/// store's `{ "horaires": [...] }` response.
pub fn load_persons(path: &Path) -> Result<Vec<Person>, SourceError> {
    let doc = read_json(path)?;
    let records = records(path, doc, "horaires")?;
    let persons = Person::parse_list(&records);
    debug!(path = %path.display(), count = persons.len(), "loaded person rules");
    Ok(persons)
}

/// Reads calendar events: either an array or `{ "events": [...] }`.
pub fn load_calendar(path: &Path) -> Result<Vec<CalendarEvent>, SourceError> {
    let doc = read_json(path)?;
    let records = records(path, doc, "events")?;
    let events: Vec<CalendarEvent> = parse_each(&records, "calendar event");
    debug!(path = %path.display(), count = events.len(), "loaded calendar events");
    Ok(events)
}

fn read_json(path: &Path) -> Result<Value, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.to_path_buf())
        } else {
            SourceError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|e| SourceError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn records(path: &Path, doc: Value, field: &str) -> Result<Vec<Value>, SourceError> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(SourceError::Malformed {
                path: path.to_path_buf(),
                message: format!("expected an array or an object with a `{field}` array"),
            }),
        },
        _ => Err(SourceError::Malformed {
            path: path.to_path_buf(),
            message: "expected an array or an object".into(),
        }),
    }
}

fn parse_each<T: DeserializeOwned>(records: &[Value], what: &str) -> Vec<T> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match T::deserialize(record) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed {what}");
                None
            }
        })
        .collect()
}
