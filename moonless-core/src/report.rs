//! Seven-night moonless forecast reports.

use std::fmt;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::{
    clouds::{average_night_cloud_cover, format_cloud_cover},
    error::ForecastError,
    model::{DayRecord, Forecast},
    moonless::{format_moonless, moonless_minutes},
    phase::MoonPhase,
    twilight::{Night, SolarTwilight, TwilightSource},
};

/// Nights covered by one report.
pub const REPORT_NIGHTS: usize = 7;

/// Days of input a report needs: one per night plus the morning after the last.
pub const REQUIRED_DAYS: usize = REPORT_NIGHTS + 1;

/// Everything shown for one night.
#[derive(Debug, Clone, PartialEq)]
pub struct NightSummary {
    pub date: NaiveDate,
    pub night: Night,
    pub phase: MoonPhase,
    pub phase_fraction: f64,
    pub moonrise: Option<NaiveTime>,
    pub moonset: Option<NaiveTime>,
    pub cloud_cover: Option<f64>,
    /// `None` when the sky never gets astronomically dark.
    pub moonless_minutes: Option<f64>,
    pub utc_offset: FixedOffset,
}

impl NightSummary {
    pub fn render(&self) -> String {
        let night = match self.night {
            Night::Dark(window) => format!(
                "{} - {}",
                self.local_hm(window.start()),
                self.local_hm(window.end())
            ),
            Night::AlwaysDark(_) => "dark all day (polar night)".to_string(),
            Night::NoDarkness => "no astronomical night".to_string(),
        };
        let moonless = self
            .moonless_minutes
            .map_or_else(|| "N/A".to_string(), format_moonless);

        format!(
            "{}\n\
             Night: {}\n\
             Moon: {} ({:.0}%)\n\
             Moonrise: {} | Moonset: {}\n\
             Night cloud cover: {}\n\
             Moonless: {}",
            self.date.format("%a %Y-%m-%d"),
            night,
            self.phase,
            lunation_percent(self.phase_fraction),
            format_time(self.moonrise),
            format_time(self.moonset),
            format_cloud_cover(self.cloud_cover),
            moonless,
        )
    }

    fn local_hm(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.utc_offset).format("%H:%M").to_string()
    }
}

/// Percent through the lunation, wrapped the same way as [`MoonPhase::from_fraction`].
fn lunation_percent(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.rem_euclid(1.0) * 100.0
}

fn format_time(time: Option<NaiveTime>) -> String {
    time.map_or_else(|| "N/A".to_string(), |t| t.format("%H:%M").to_string())
}

/// A rendered multi-night forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub header: String,
    /// IANA zone the provider reported for the location.
    pub timezone: String,
    pub nights: Vec<NightSummary>,
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        for night in &self.nights {
            write!(f, "\n\n{}", night.render())?;
        }
        Ok(())
    }
}

/// Builds reports from forecast data; performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder<T: TwilightSource = SolarTwilight> {
    twilight: T,
}

impl<T: TwilightSource> ReportBuilder<T> {
    pub fn new(twilight: T) -> Self {
        Self { twilight }
    }

    /// Summarise the seven nights starting on the forecast's first day.
    ///
    /// Requires exactly [`REQUIRED_DAYS`] consecutive days; the last one is only
    /// read for the final night's moon events.
    pub fn build(&self, forecast: &Forecast) -> Result<ForecastReport, ForecastError> {
        validate_days(&forecast.days)?;

        let nights = forecast
            .days
            .windows(2)
            .map(|pair| self.summarize(forecast, &pair[0], &pair[1]))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastReport {
            header: format!(
                "Moonless nights for {} ({})",
                forecast.location, forecast.timezone
            ),
            timezone: forecast.timezone.clone(),
            nights,
        })
    }

    fn summarize(
        &self,
        forecast: &Forecast,
        current: &DayRecord,
        next: &DayRecord,
    ) -> Result<NightSummary, ForecastError> {
        let night = self.twilight.resolve_night(current.date, forecast.location)?;
        let moonless = night
            .window()
            .map(|window| moonless_minutes(current, next, window, forecast.utc_offset));

        debug!(date = %current.date, ?night, ?moonless, "summarized night");

        Ok(NightSummary {
            date: current.date,
            night,
            phase: MoonPhase::from_fraction(current.moon_phase),
            phase_fraction: current.moon_phase,
            moonrise: current.moonrise,
            moonset: current.moonset,
            cloud_cover: average_night_cloud_cover(current),
            moonless_minutes: moonless,
            utc_offset: forecast.utc_offset,
        })
    }
}

fn validate_days(days: &[DayRecord]) -> Result<(), ForecastError> {
    if days.len() != REQUIRED_DAYS {
        return Err(ForecastError::WrongDayCount {
            expected: REQUIRED_DAYS,
            found: days.len(),
        });
    }

    for pair in days.windows(2) {
        let (previous, next) = (pair[0].date, pair[1].date);
        if previous.checked_add_days(Days::new(1)) != Some(next) {
            return Err(ForecastError::NonConsecutiveDays { previous, next });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{location::Location, model::NightWindow};

    /// Dusk 18:00 UTC, dawn 06:00 UTC the next day, every day.
    #[derive(Debug)]
    struct FixedTwilight;

    impl TwilightSource for FixedTwilight {
        fn resolve_night(
            &self,
            date: NaiveDate,
            _location: Location,
        ) -> Result<Night, ForecastError> {
            let start = date.and_hms_opt(18, 0, 0).unwrap().and_utc();
            let end = start + chrono::TimeDelta::hours(12);
            Ok(Night::Dark(NightWindow::new(start, end).unwrap()))
        }
    }

    /// Never gets dark.
    #[derive(Debug)]
    struct MidnightSun;

    impl TwilightSource for MidnightSun {
        fn resolve_night(&self, _: NaiveDate, _: Location) -> Result<Night, ForecastError> {
            Ok(Night::NoDarkness)
        }
    }

    fn time(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    fn forecast(days: usize) -> Forecast {
        let first: NaiveDate = "2024-03-01".parse().unwrap();
        let days = (0..days as u64)
            .map(|i| DayRecord {
                date: first + Days::new(i),
                moon_phase: 0.1 * i as f64,
                moonrise: (i != 2).then(|| time("20:00:00")),
                moonset: Some(time("04:00:00")),
                sunrise: time("06:30:00"),
                sunset: time("18:30:00"),
                hours: vec![crate::model::HourRecord {
                    time: time("23:00:00"),
                    cloud_cover: 40.0,
                }],
            })
            .collect();

        Forecast {
            location: Location::new(10.0, 20.0).unwrap(),
            timezone: "UTC".to_string(),
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            days,
        }
    }

    #[test]
    fn builds_seven_nights_in_order() {
        let report = ReportBuilder::new(FixedTwilight).build(&forecast(8)).unwrap();

        assert_eq!(report.nights.len(), REPORT_NIGHTS);
        let dates: Vec<_> = report.nights.iter().map(|n| n.date.to_string()).collect();
        assert_eq!(dates.first().map(String::as_str), Some("2024-03-01"));
        assert_eq!(dates.last().map(String::as_str), Some("2024-03-07"));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn computes_moonless_time_per_night() {
        let report = ReportBuilder::new(FixedTwilight).build(&forecast(8)).unwrap();

        // Dark from dusk until the 20:00 rise and after the 04:00 set.
        assert_eq!(report.nights[0].moonless_minutes, Some(240.0));
        // No rise today: up at dusk, dark from the 04:00 set until dawn.
        assert_eq!(report.nights[2].moonless_minutes, Some(120.0));
        assert_eq!(report.nights[0].cloud_cover, Some(40.0));
    }

    #[test]
    fn renders_night_block() {
        let report = ReportBuilder::new(FixedTwilight).build(&forecast(8)).unwrap();

        assert_eq!(
            report.nights[1].render(),
            "Sat 2024-03-02\n\
             Night: 18:00 - 06:00\n\
             Moon: Waxing Crescent (10%)\n\
             Moonrise: 20:00 | Moonset: 04:00\n\
             Night cloud cover: 40%\n\
             Moonless: 4h 0m"
        );
    }

    #[test]
    fn full_lunation_renders_as_new_moon() {
        let mut forecast = forecast(8);
        forecast.days[1].moon_phase = 1.0;
        forecast.days[2].moon_phase = 1.25;
        let report = ReportBuilder::new(FixedTwilight).build(&forecast).unwrap();

        assert!(report.nights[1].render().contains("Moon: New Moon (0%)"));
        assert!(report.nights[2].render().contains("Moon: First Quarter (25%)"));
    }

    #[test]
    fn report_text_has_header_and_every_night() {
        let report = ReportBuilder::new(FixedTwilight).build(&forecast(8)).unwrap();
        let text = report.to_string();

        assert!(text.starts_with("Moonless nights for 10.0, 20.0 (UTC)\n\n"));
        assert_eq!(text.matches("Moonless: ").count(), REPORT_NIGHTS);
        assert_eq!(text.split("\n\n").count(), REPORT_NIGHTS + 1);
    }

    #[test]
    fn no_darkness_renders_fallbacks() {
        let report = ReportBuilder::new(MidnightSun).build(&forecast(8)).unwrap();
        let night = &report.nights[0];

        assert_eq!(night.moonless_minutes, None);
        let text = night.render();
        assert!(text.contains("Night: no astronomical night"));
        assert!(text.contains("Moonless: N/A"));
    }

    #[test]
    fn rejects_wrong_day_count() {
        let err = ReportBuilder::new(FixedTwilight).build(&forecast(7)).unwrap_err();
        assert_eq!(err, ForecastError::WrongDayCount { expected: 8, found: 7 });

        let err = ReportBuilder::new(FixedTwilight).build(&forecast(9)).unwrap_err();
        assert_eq!(err, ForecastError::WrongDayCount { expected: 8, found: 9 });
    }

    #[test]
    fn rejects_gaps_between_days() {
        let mut forecast = forecast(8);
        forecast.days[5].date = "2024-03-09".parse().unwrap();

        let err = ReportBuilder::new(FixedTwilight).build(&forecast).unwrap_err();
        assert!(matches!(err, ForecastError::NonConsecutiveDays { .. }));
    }

    #[test]
    fn times_are_shown_in_local_offset() {
        let mut forecast = forecast(8);
        forecast.utc_offset = FixedOffset::east_opt(3600).unwrap();

        let report = ReportBuilder::new(FixedTwilight).build(&forecast).unwrap();
        assert!(report.nights[0].render().contains("Night: 19:00 - 07:00"));
    }
}
