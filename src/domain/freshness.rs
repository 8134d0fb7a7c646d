//! Time-since-update classification.
//!
//! Both timestamps are truncated to their calendar date before differencing,
//! so time of day never shifts the day count. The caller supplies "now"; this
//! module never reads a clock.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Number of whole days after which data counts as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessThreshold(pub u32);

impl StalenessThreshold {
    /// Used for strategy recommendations.
    pub const RECOMMENDATION: StalenessThreshold = StalenessThreshold(7);
    /// Used for holding prices.
    pub const HOLDING_PRICE: StalenessThreshold = StalenessThreshold(2);

    pub fn days(&self) -> u32 {
        self.0
    }

    pub fn is_exceeded_by(&self, diff_days: i64) -> bool {
        diff_days > i64::from(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Freshness {
    pub label: String,
    pub is_stale: bool,
}

pub fn classify(
    last_updated: Option<NaiveDateTime>,
    now: NaiveDateTime,
    threshold: StalenessThreshold,
) -> Freshness {
    classify_date(last_updated.map(|t| t.date()), now.date(), threshold)
}

pub fn classify_date(
    last_updated: Option<NaiveDate>,
    today: NaiveDate,
    threshold: StalenessThreshold,
) -> Freshness {
    let Some(last) = last_updated else {
        return Freshness::default();
    };
    let diff_days = today.signed_duration_since(last).num_days();
    let label = match diff_days {
        d if d < 0 => "Future date".to_string(),
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{} days ago", d),
    };
    Freshness {
        label,
        is_stale: threshold.is_exceeded_by(diff_days),
    }
}

/// Parses `YYYY-MM-DD`, `YYYY-MM-DD[T ]HH:MM:SS[.f]` or RFC 3339.
/// RFC 3339 timestamps are converted to local wall-clock time, the same
/// calendar plain dates are read in. Blank or malformed input is `None`.
pub fn parse_date_like(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    const WEEK: StalenessThreshold = StalenessThreshold::RECOMMENDATION;

    #[test]
    fn absent_is_unknown_not_stale() {
        let f = classify(None, at(2024, 3, 10, 12, 0), WEEK);
        assert_eq!(f.label, "");
        assert!(!f.is_stale);
    }

    #[test]
    fn same_day_any_time_is_today() {
        let now = at(2024, 3, 10, 0, 5);
        assert_eq!(classify(Some(at(2024, 3, 10, 23, 59)), now, WEEK).label, "Today");
        assert_eq!(classify(Some(at(2024, 3, 10, 0, 0)), now, WEEK).label, "Today");
    }

    #[test]
    fn late_yesterday_is_one_day() {
        // less than an hour apart but across midnight
        let f = classify(Some(at(2024, 3, 9, 23, 30)), at(2024, 3, 10, 0, 10), WEEK);
        assert_eq!(f.label, "1 day ago");
        assert!(!f.is_stale);
    }

    #[test]
    fn several_days() {
        let f = classify(Some(at(2024, 3, 5, 9, 0)), at(2024, 3, 10, 8, 0), WEEK);
        assert_eq!(f.label, "5 days ago");
    }

    #[test]
    fn eight_days_is_stale_under_week_threshold() {
        let f = classify(Some(at(2024, 3, 2, 9, 0)), at(2024, 3, 10, 9, 0), WEEK);
        assert_eq!(f.label, "8 days ago");
        assert!(f.is_stale);
    }

    #[test]
    fn seven_days_is_not_stale() {
        let f = classify(Some(at(2024, 3, 3, 9, 0)), at(2024, 3, 10, 9, 0), WEEK);
        assert!(!f.is_stale);
    }

    #[test]
    fn two_days_not_stale_under_week_threshold() {
        let f = classify(Some(at(2024, 3, 8, 9, 0)), at(2024, 3, 10, 9, 0), WEEK);
        assert!(!f.is_stale);
    }

    #[test]
    fn holding_price_threshold_is_stricter() {
        let now = at(2024, 3, 10, 9, 0);
        let th = StalenessThreshold::HOLDING_PRICE;
        assert!(!classify(Some(at(2024, 3, 8, 9, 0)), now, th).is_stale);
        assert!(classify(Some(at(2024, 3, 7, 9, 0)), now, th).is_stale);
    }

    #[test]
    fn future_date() {
        let f = classify(Some(at(2024, 3, 12, 9, 0)), at(2024, 3, 10, 9, 0), WEEK);
        assert_eq!(f.label, "Future date");
        assert!(!f.is_stale);
    }

    #[test]
    fn parse_plain_date() {
        assert_eq!(parse_date_like("2024-03-10"), Some(at(2024, 3, 10, 0, 0)));
    }

    #[test]
    fn parse_naive_timestamp() {
        assert_eq!(
            parse_date_like("2024-03-10T14:30:00"),
            Some(at(2024, 3, 10, 14, 30))
        );
        assert_eq!(
            parse_date_like("2024-03-10 14:30:00.250").map(|d| d.date()),
            NaiveDate::from_ymd_opt(2024, 3, 10)
        );
    }

    #[test]
    fn parse_rfc3339_converts_to_local_time() {
        let expected = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .unwrap()
                .with_timezone(&Local)
                .naive_local()
        };
        assert_eq!(
            parse_date_like("2024-03-10T01:30:00+05:30"),
            Some(expected("2024-03-09T20:00:00Z"))
        );
        assert_eq!(
            parse_date_like("2024-03-10T14:30:00Z"),
            Some(expected("2024-03-10T14:30:00+00:00"))
        );
    }

    #[test]
    fn plain_date_uses_its_own_calendar_day() {
        let today = Local::now().naive_local();
        let raw = today.date().format("%Y-%m-%d").to_string();
        let f = classify(parse_date_like(&raw), today, WEEK);
        assert_eq!(f.label, "Today");
        assert!(!f.is_stale);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_date_like(""), None);
        assert_eq!(parse_date_like("   "), None);
        assert_eq!(parse_date_like("yesterday"), None);
        assert_eq!(parse_date_like("2024-13-01"), None);
    }
}
