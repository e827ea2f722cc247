use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Source of "now" for anything that stamps records.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the park's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        FixedClock(date.and_time(time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// `YYYY-MM` key of the month a date belongs to.
pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Start and end labels for a timeslot opened at `now`. The end wraps past midnight.
pub fn slot_window(now: NaiveDateTime, minutes: u32) -> (String, String) {
    let start = now.time();
    let (end, _) = start.overflowing_add_signed(Duration::minutes(minutes as i64));
    (format_hhmm(start), format_hhmm(end))
}

/// Parses a date argument: `today`, `yesterday` or `YYYY-MM-DD`.
pub fn parse_date(input: &str, clock: &impl Clock) -> Result<NaiveDate> {
    let today = clock.today();
    match input.trim().to_lowercase().as_str() {
        "today" | "tod" => Ok(today),
        "yesterday" | "yes" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| Error::invalid(format!("Could not parse date: {}", input))),
    }
}

/// Parses a month argument: `this`, `last` or `YYYY-MM`. Returns the `YYYY-MM` key.
pub fn parse_month(input: &str, clock: &impl Clock) -> Result<String> {
    let today = clock.today();
    match input.trim().to_lowercase().as_str() {
        "this" | "current" => Ok(month_of(today)),
        "last" | "prev" => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .ok_or_else(|| Error::invalid("Invalid current date"))?;
            Ok(month_of(first - Duration::days(1)))
        }
        other => {
            let first = NaiveDate::parse_from_str(&format!("{}-01", other), "%Y-%m-%d")
                .map_err(|_| Error::invalid(format!("Could not parse month: {}", input)))?;
            Ok(month_of(first))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FixedClock {
        FixedClock::at(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 23, 50)
    }

    #[test]
    fn test_slot_window_wraps_midnight() {
        let (start, end) = slot_window(clock().now(), 15);
        assert_eq!(start, "23:50");
        assert_eq!(end, "00:05");
    }

    #[test]
    fn test_parse_month() {
        let c = clock();
        assert_eq!(parse_month("this", &c).unwrap(), "2024-03");
        assert_eq!(parse_month("last", &c).unwrap(), "2024-02");
        assert_eq!(parse_month("2023-12", &c).unwrap(), "2023-12");
        assert!(parse_month("2023-13", &c).is_err());
        assert!(parse_month("May", &c).is_err());
    }

    #[test]
    fn test_parse_date() {
        let c = clock();
        assert_eq!(parse_date("today", &c).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(parse_date("yesterday", &c).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(parse_date("2024-05-01", &c).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(parse_date("01/05/2024", &c).is_err());
    }
}
