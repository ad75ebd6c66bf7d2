//! Print one day's food log and totals
//!
//! Usage: day_summary [YYYY-MM-DD]   (defaults to today)

use chrono::{Local, NaiveDate};

use foodlog::config::Config;
use foodlog::models::LogEntry;
use foodlog::nutrition::{compute_entries, daily_total};
use foodlog::session::DateCursor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let date = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };

    let config = Config::load();
    println!("Database: {}", config.database_path.display());

    let database = foodlog::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        foodlog::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let details = database.with_conn(|conn| LogEntry::list_for_date(conn, date))?;
    let entries = compute_entries(&details);
    let total = daily_total(date, &entries);

    println!("{}", DateCursor::starting_today().heading_for(date));
    if entries.is_empty() {
        println!("  No food logged for this date");
    }
    for entry in &entries {
        println!("  [{}] {}", entry.entry.id, entry.headline());
        println!("        {}", entry.nutrition.summary_line());
    }
    println!();
    println!("Total: {}", total.nutrition.summary_line());

    Ok(())
}
