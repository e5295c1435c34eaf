use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::location::Location;

/// One hourly sample of a forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRecord {
    /// Local time of day.
    pub time: NaiveTime,
    /// Cloud cover, percent.
    pub cloud_cover: f64,
}

/// One calendar day of raw forecast input.
///
/// Times of day are local to the owning [`Forecast`]'s UTC offset. Moonrise and
/// moonset are optional because the moon skips a rise or a set roughly once
/// per lunar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Position in the lunation, 0 = new, 0.5 = full.
    pub moon_phase: f64,
    pub moonrise: Option<NaiveTime>,
    pub moonset: Option<NaiveTime>,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub hours: Vec<HourRecord>,
}

/// Forecast data for one location, as delivered by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub location: Location,
    /// IANA zone name reported by the provider, e.g. "Europe/London".
    pub timezone: String,
    pub utc_offset: FixedOffset,
    pub days: Vec<DayRecord>,
}

/// Resolve `date` + `time` in a fixed-offset zone to UTC.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    (date.and_time(time) - shift).and_utc()
}

/// The span of one astronomical night, dusk of day N to dawn of day N+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl NightWindow {
    /// Returns `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_minutes(&self) -> f64 {
        minutes_between(self.start, self.end)
    }

    /// Clamp an instant into `[start, end]`.
    pub fn clamp(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        instant.clamp(self.start, self.end)
    }
}

/// Signed minutes from `from` to `to`, with sub-minute precision.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn local_to_utc_applies_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let time = NaiveTime::from_hms_opt(1, 30, 0).unwrap();

        let east = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(local_to_utc(date, time, east), utc("2024-03-09T20:00:00Z"));

        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(local_to_utc(date, time, west), utc("2024-03-10T09:30:00Z"));
    }

    #[test]
    fn night_window_requires_start_before_end() {
        let a = utc("2024-01-01T23:00:00Z");
        let b = utc("2024-01-02T05:00:00Z");

        let window = NightWindow::new(a, b).unwrap();
        assert_eq!(window.duration_minutes(), 360.0);
        assert!(NightWindow::new(b, a).is_none());
        assert!(NightWindow::new(a, a).is_none());
    }

    #[test]
    fn clamp_keeps_instants_inside_window() {
        let window =
            NightWindow::new(utc("2024-01-01T23:00:00Z"), utc("2024-01-02T05:00:00Z")).unwrap();

        assert_eq!(window.clamp(utc("2024-01-01T20:00:00Z")), window.start());
        assert_eq!(window.clamp(utc("2024-01-02T09:00:00Z")), window.end());
        let inside = utc("2024-01-02T01:15:00Z");
        assert_eq!(window.clamp(inside), inside);
    }

    #[test]
    fn minutes_between_keeps_fractions() {
        let a = utc("2024-01-01T00:00:00Z");
        let b = utc("2024-01-01T00:59:36Z");
        assert!((minutes_between(a, b) - 59.6).abs() < 1e-9);
        assert!((minutes_between(b, a) + 59.6).abs() < 1e-9);
    }
}
