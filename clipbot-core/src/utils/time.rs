use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Truncate an instant to midnight UTC of the same day.
pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    date_to_utc(dt.date_naive())
}

/// Midnight UTC of a calendar date.
pub fn date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `YYYY-MM-DD` rendering used in chat replies.
pub fn format_day(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}
