use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Start/due window and recurrence anchor for a task created from fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWindow {
    pub start_date: String,
    pub due_date: String,
    pub dtstart: [u32; 5],
}

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let last_day = NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?;
    let back = last_day.weekday().num_days_from_sunday() as i64;
    Some(last_day - Duration::days(back))
}

fn switch_instant(date: NaiveDate) -> Option<DateTime<Utc>> {
    let at: NaiveDateTime = date.and_hms_opt(1, 0, 0)?;
    Some(Utc.from_utc_datetime(&at))
}

/// UTC offset of Europe/Amsterdam in hours: summer time runs from 01:00 UTC
/// on the last Sunday of March to 01:00 UTC on the last Sunday of October.
pub fn amsterdam_offset_hours(now: DateTime<Utc>) -> i64 {
    let year = now.year();
    let summer = last_sunday(year, 3)
        .and_then(switch_instant)
        .zip(last_sunday(year, 10).and_then(switch_instant));
    match summer {
        Some((start, end)) if now >= start && now < end => 2,
        _ => 1,
    }
}

fn iso_millis(date: NaiveDate, h: u32, m: u32, s: u32, ms: u32) -> String {
    match date.and_hms_milli_opt(h, m, s, ms) {
        Some(at) => at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        None => date.format("%Y-%m-%dT00:00:00.000Z").to_string(),
    }
}

/// The window runs from 23:00Z the day before the current Amsterdam date to
/// 22:59:59.999Z the day after it.
pub fn task_window(now: DateTime<Utc>) -> TaskWindow {
    let local_date = (now + Duration::hours(amsterdam_offset_hours(now))).date_naive();
    let start = local_date - Duration::days(1);
    let due = local_date + Duration::days(1);
    let today = now.date_naive();
    TaskWindow {
        start_date: iso_millis(start, 23, 0, 0, 0),
        due_date: iso_millis(due, 22, 59, 59, 999),
        dtstart: [today.year() as u32, today.month(), today.day(), 0, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn offset_follows_eu_summer_time() {
        assert_eq!(amsterdam_offset_hours(utc(2024, 1, 15, 12, 0)), 1);
        assert_eq!(amsterdam_offset_hours(utc(2024, 7, 15, 12, 0)), 2);
        // 2024-03-31 and 2024-10-27 are the switch Sundays.
        assert_eq!(amsterdam_offset_hours(utc(2024, 3, 31, 0, 59)), 1);
        assert_eq!(amsterdam_offset_hours(utc(2024, 3, 31, 1, 0)), 2);
        assert_eq!(amsterdam_offset_hours(utc(2024, 10, 27, 0, 59)), 2);
        assert_eq!(amsterdam_offset_hours(utc(2024, 10, 27, 1, 0)), 1);
    }

    #[test]
    fn window_spans_yesterday_to_tomorrow() {
        let window = task_window(utc(2024, 5, 10, 9, 30));
        assert_eq!(window.start_date, "2024-05-09T23:00:00.000Z");
        assert_eq!(window.due_date, "2024-05-11T22:59:59.999Z");
        assert_eq!(window.dtstart, [2024, 5, 10, 0, 0]);
    }

    #[test]
    fn window_uses_amsterdam_date_near_midnight() {
        // 23:30Z on Jan 31 is already Feb 1 in Amsterdam.
        let window = task_window(utc(2024, 1, 31, 23, 30));
        assert_eq!(window.start_date, "2024-01-31T23:00:00.000Z");
        assert_eq!(window.due_date, "2024-02-02T22:59:59.999Z");
        assert_eq!(window.dtstart, [2024, 1, 31, 0, 0]);
    }
}
