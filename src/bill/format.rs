//! Parsing stored bill dates and formatting them for display.

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

/// How bill dates are stored, e.g. "2022-01-01".
const STORAGE_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a stored bill date.
///
/// # Errors
///
/// Returns an error if `raw_date` is not of the form "YYYY-MM-DD".
pub fn parse_bill_date(raw_date: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw_date, STORAGE_DATE_FORMAT)
}

fn short_month(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Fév",
        Month::March => "Mar",
        Month::April => "Avr",
        Month::May => "Mai",
        Month::June => "Jui",
        Month::July => "Jui",
        Month::August => "Aoû",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Déc",
    }
}

/// Format a stored bill date in its short French form, e.g. "2022-01-01" becomes "1 Jan. 22".
///
/// # Errors
///
/// Returns an error if `raw_date` is not a valid stored date.
pub fn format_date(raw_date: &str) -> Result<String, time::error::Parse> {
    let date = parse_bill_date(raw_date)?;

    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        short_month(date.month()),
        date.year().rem_euclid(100)
    ))
}
