use chrono::Utc;
use clap::Args;

use super::{parse_date, Session};

#[derive(Args)]
pub struct CustodyArgs {
    /// Date to resolve (YYYY-MM-DD)
    date: String,
}

pub fn run(args: CustodyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = parse_date(&args.date)?;
    let session = Session::open(Utc::now())?;
    let location = session.dashboard.custody_on(date);

    if location.is_empty() {
        println!("unknown");
    } else {
        println!("{location}");
    }
    Ok(())
}
