use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::DateTime as BsonDateTime;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// `YYYY-MM-DD`, the format orders and promotions store their dates in
pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_ymd(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Three-letter month label for a 1-based month number
pub fn month_label(month: u32) -> &'static str {
    match month {
        1..=12 => MONTHS[(month - 1) as usize],
        _ => "???",
    }
}

pub fn bson_to_rfc3339(value: &BsonDateTime) -> String {
    value
        .try_to_rfc3339_string()
        .unwrap_or_else(|_| value.timestamp_millis().to_string())
}

pub fn bson_to_date(value: &BsonDateTime) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).map(|dt| dt.date_naive())
}
