use chrono::Utc;
use clap::Args;
use homeboard_core::planning::day_name;
use homeboard_core::{DayEvents, ProjectedEvent};

use super::{parse_date, Session};

#[derive(Args)]
pub struct DaysArgs {
    /// First day of the window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: DaysArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let session = Session::open(now)?;
    let days = match args.date.as_deref() {
        Some(raw) => session.dashboard.days_from(parse_date(raw)?, now),
        None => session.dashboard.days(now),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }

    for day in &days {
        print_day(day);
    }
    Ok(())
}

fn print_day(day: &DayEvents) {
    let mut header = format!("{} {}", day_name(day.date), day.date.format("%Y-%m-%d"));
    if !day.custody_location.is_empty() {
        header.push_str(&format!(" | {}", day.custody_location));
    }
    if let Some(holiday) = &day.holiday {
        header.push_str(&format!(" | {}", holiday.name));
    }
    println!("{header}");

    if day.events.is_empty() {
        println!("  (nothing)");
    }
    for event in &day.events {
        println!("  {}", event_line(event));
    }
}

fn event_line(event: &ProjectedEvent) -> String {
    let when = if event.is_all_day {
        "all day".to_string()
    } else {
        event.time_range()
    };
    let mut line = format!("{when:<11} {}", event.title);
    if let Some(shift) = &event.shift {
        line.push_str(&format!(" [{shift}]"));
    }
    if !event.location.is_empty() {
        line.push_str(&format!(" @ {}", event.location));
    }
    line.push_str(&format!(" ({})", event.color_type));
    line
}
