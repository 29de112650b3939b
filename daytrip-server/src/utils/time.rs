//! Calendar date helpers
//!
//! Bookings are compared by calendar date only. Any ISO-8601 date or
//! datetime is accepted at the API boundary and reduced to `YYYY-MM-DD`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use super::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reduce a date or datetime string to its calendar date
pub fn normalize_date(input: &str) -> AppResult<String> {
    parse_calendar_date(input)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .ok_or_else(|| {
            AppError::with_message(
                shared::error::ErrorCode::InvalidBookingDate,
                format!("Invalid date: {input}"),
            )
        })
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

/// `[start, end)` of the current local day in Unix millis
pub fn today_range_millis() -> (i64, i64) {
    let today = Local::now().date_naive();
    let start = day_start_millis(today);
    let end = today
        .succ_opt()
        .map(day_start_millis)
        .unwrap_or(i64::MAX);
    (start, end)
}

fn day_start_millis(date: NaiveDate) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Local timestamp suffix for stored file names, e.g. `20240601103000`
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_strips_time() {
        assert_eq!(normalize_date("2024-06-01").unwrap(), "2024-06-01");
        assert_eq!(normalize_date("2024-06-01T10:00").unwrap(), "2024-06-01");
        assert_eq!(normalize_date("2024-06-01T23:59:59.123").unwrap(), "2024-06-01");
        assert_eq!(normalize_date("2024-06-01T10:00:00+08:00").unwrap(), "2024-06-01");
        assert_eq!(normalize_date(" 2024-06-01 08:30:00 ").unwrap(), "2024-06-01");
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        let err = normalize_date("June 1st").unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::InvalidBookingDate);
        assert!(normalize_date("2024-02-30").is_err());
    }

    #[test]
    fn test_today_range_is_one_day() {
        let (start, end) = today_range_millis();
        assert!(start < end);
        assert!(end - start >= 23 * 3_600_000);
        let now = shared::util::now_millis();
        assert!(start <= now && now < end);
    }
}
