use clap::Args;
use homeboard_core::french_holidays;

#[derive(Args)]
pub struct HolidaysArgs {
    /// Year to list
    year: i32,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: HolidaysArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut holidays = french_holidays(args.year);
    holidays.sort_by_key(|h| h.date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&holidays)?);
        return Ok(());
    }

    for holiday in &holidays {
        let kind = serde_json::to_value(holiday.kind)?;
        println!(
            "{}  {:<20} {}",
            holiday.date.format("%Y-%m-%d"),
            holiday.name,
            kind.as_str().unwrap_or_default()
        );
    }
    Ok(())
}
