use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).ok()
}

/// Milliseconds since the epoch for an RFC 3339 timestamp, a zone-less
/// date-time or a bare date. Zone-less inputs are read as UTC.
pub fn parse_date_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Some(at) = parse_timestamp(value) {
        return Some(at.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Some(at.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc().timestamp_millis())
}

/// Renders a millisecond span as `"{d}d {h}h {m}m {s}s"`. Whole units are
/// floored; remainders keep the sign of the span.
pub fn format_elapsed(duration_ms: i64) -> String {
    let secs = duration_ms.div_euclid(1000);
    let mins = secs.div_euclid(60);
    let hours = mins.div_euclid(60);
    let days = hours.div_euclid(24);
    format!("{}d {}h {}m {}s", days, hours % 24, mins % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_mixed_span() {
        let ms = ((2 * 24 + 3) * 3600 + 4 * 60 + 5) * 1000 + 999;
        assert_eq!(format_elapsed(ms), "2d 3h 4m 5s");
    }

    #[test]
    fn date_millis_accepts_common_shapes() {
        assert_eq!(parse_date_millis("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_date_millis("1970-01-01T00:00:01.500Z"), Some(1_500));
        assert_eq!(parse_date_millis("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(parse_date_millis("1970-01-01T00:01:00"), Some(60_000));
        assert_eq!(parse_date_millis("yesterday"), None);
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_elapsed(0), "0d 0h 0m 0s");
    }

    #[test]
    fn parses_rfc3339_with_millis() {
        let created = parse_timestamp("2024-01-01T10:00:00.000Z").unwrap();
        let submitted = parse_timestamp("2024-01-02T11:30:15.500Z").unwrap();
        let elapsed = (submitted - created).num_milliseconds();
        assert_eq!(format_elapsed(elapsed), "1d 1h 30m 15s");
        assert!(parse_timestamp("not a date").is_none());
    }
}
