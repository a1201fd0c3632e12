//! Which day's menu the user is asking about.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};

/// From this hour on, "today" means tomorrow's menu
const EVENING_ROLLOVER_HOUR: u32 = 20;

/// Day whose menu is shown when no date is given.
///
/// Uses the local wall-clock date, moving to the next day in the evening
/// once today's dinner is over.
pub fn date_of_interest(now: NaiveDateTime) -> NaiveDate {
    if now.hour() >= EVENING_ROLLOVER_HOUR {
        now.date() + Duration::days(1)
    } else {
        now.date()
    }
}

/// Current local date and time of the invoking process
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses a `--date` argument relative to `now`.
///
/// - `""` → [`date_of_interest`]
/// - `+N` → today plus N days
/// - `YYYY-MM-DD` or `YYYY/MM/DD` → that date
///
/// Returns `None` if the input matches none of these.
pub fn parse_date_arg(s: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Some(date_of_interest(now));
    }
    if let Some(offset) = s.strip_prefix('+') {
        let days: u32 = offset.parse().ok()?;
        return now.date().checked_add_signed(Duration::try_days(i64::from(days))?);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}
