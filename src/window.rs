use crate::error::{ReportError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days, expressed in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Builds the window from start 00:00:00Z to end 23:59:59Z.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvertedWindow { start, end });
        }

        // One second before the following midnight.
        let end = end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::seconds(1);
        Ok(Self {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end,
        })
    }

    /// Parses two `YYYY-MM-DD` dates into a window.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `since` query value, e.g. "2023-01-01T00:00:00Z".
    pub fn since_param(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// `until` query value, e.g. "2023-01-31T23:59:59Z".
    pub fn until_param(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|source| ReportError::InvalidDate {
        input: trimmed.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_covers_full_days() {
        let window = TimeWindow::parse("2023-01-01", "2023-01-31").unwrap();
        assert_eq!(window.since_param(), "2023-01-01T00:00:00Z");
        assert_eq!(window.until_param(), "2023-01-31T23:59:59Z");
    }

    #[test]
    fn test_end_bound_at_month_and_leap_day_edges() {
        let window = TimeWindow::parse("2024-02-01", "2024-02-29").unwrap();
        assert_eq!(window.until_param(), "2024-02-29T23:59:59Z");
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());

        let window = TimeWindow::parse("2023-12-31", "2023-12-31").unwrap();
        assert_eq!(window.since_param(), "2023-12-31T00:00:00Z");
        assert_eq!(window.until_param(), "2023-12-31T23:59:59Z");
    }

    #[test]
    fn test_single_day_window() {
        let window = TimeWindow::parse("2023-09-15", "2023-09-15").unwrap();
        assert!(window.contains(Utc.with_ymd_and_hms(2023, 9, 15, 0, 0, 0).unwrap()));
        assert!(window.contains(Utc.with_ymd_and_hms(2023, 9, 15, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2023, 9, 16, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2023, 9, 14, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let result = TimeWindow::parse("2023-02-01", "2023-01-01");
        assert!(matches!(result, Err(ReportError::InvertedWindow { .. })));
    }

    #[test]
    fn test_invalid_date_format() {
        for input in ["2023/01/01", "01-01-2023", "2023-13-01", "yesterday", ""] {
            assert!(
                matches!(parse_date(input), Err(ReportError::InvalidDate { .. })),
                "accepted {input:?}"
            );
        }
    }
}
