//! Astronomical night resolution.
//!
//! A night belongs to the calendar day on whose evening it starts: the night
//! of day N runs from astronomical dusk on N to astronomical dawn on N+1.

use std::fmt::Debug;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};
use tracing::{debug, warn};

use crate::{error::ForecastError, location::Location, model::NightWindow};

/// Sun elevation bounding astronomical twilight, degrees.
pub const ASTRONOMICAL_TWILIGHT_DEG: f64 = -18.0;

/// Outcome of resolving one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Night {
    /// Regular dusk-to-dawn darkness.
    Dark(NightWindow),
    /// The sun stays below -18° all day; the window runs solar noon to solar noon.
    AlwaysDark(NightWindow),
    /// The sun never reaches -18°, so the sky never gets fully dark.
    NoDarkness,
}

impl Night {
    pub fn window(&self) -> Option<&NightWindow> {
        match self {
            Night::Dark(window) | Night::AlwaysDark(window) => Some(window),
            Night::NoDarkness => None,
        }
    }
}

/// Source of dusk/dawn instants for a location.
pub trait TwilightSource: Send + Sync + Debug {
    /// Resolve the night that starts on the evening of `date`.
    fn resolve_night(&self, date: NaiveDate, location: Location) -> Result<Night, ForecastError>;
}

/// [`TwilightSource`] backed by the `sunrise` solar-position algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarTwilight;

impl TwilightSource for SolarTwilight {
    fn resolve_night(&self, date: NaiveDate, location: Location) -> Result<Night, ForecastError> {
        let coords = Coordinates::new(location.latitude(), location.longitude())
            .ok_or(ForecastError::InvalidLatitude(location.latitude()))?;
        let next = next_day(date);

        let dusk = event_near(
            SolarDay::new(coords, date).event_time(SolarEvent::Dusk(DawnType::Astronomical)),
            date,
        );
        // Solar events are anchored per calendar day: the dawn closing tonight
        // is the next day's morning dawn.
        let dawn = event_near(
            SolarDay::new(coords, next).event_time(SolarEvent::Dawn(DawnType::Astronomical)),
            next,
        );

        if let Some(window) = dusk
            .zip(dawn)
            .and_then(|(dusk, dawn)| NightWindow::new(dusk, dawn))
            .filter(|window| window.end() - window.start() <= TimeDelta::days(1))
        {
            debug!(%date, %location, start = %window.start(), end = %window.end(), "resolved night window");
            return Ok(Night::Dark(window));
        }

        let night = degenerate_night(date, location);
        warn!(%date, %location, ?night, "no astronomical twilight, using fallback");
        Ok(night)
    }
}

/// Keep `event` only if it lies within a day of `anchor`.
///
/// `sunrise` reports a twilight the sun never reaches as the Unix epoch.
fn event_near(event: DateTime<Utc>, anchor: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = anchor.and_time(NaiveTime::MIN).and_utc();
    let earliest = midnight - TimeDelta::days(1);
    let latest = midnight + TimeDelta::days(2);
    (earliest..=latest).contains(&event).then_some(event)
}

/// Classify a day without twilight events by the sun's noon elevation.
fn degenerate_night(date: NaiveDate, location: Location) -> Night {
    let noon_elevation = 90.0 - (location.latitude() - solar_declination(date)).abs();

    if noon_elevation >= ASTRONOMICAL_TWILIGHT_DEG {
        return Night::NoDarkness;
    }

    let start = solar_noon(date, location.longitude());
    let end = solar_noon(next_day(date), location.longitude());
    match NightWindow::new(start, end) {
        Some(window) => Night::AlwaysDark(window),
        None => Night::NoDarkness,
    }
}

/// Approximate solar declination in degrees.
fn solar_declination(date: NaiveDate) -> f64 {
    let day_of_year = f64::from(date.ordinal());
    -23.44 * (std::f64::consts::TAU / 365.0 * (day_of_year + 10.0)).cos()
}

/// Mean solar noon, ignoring the equation of time.
fn solar_noon(date: NaiveDate, longitude: f64) -> DateTime<Utc> {
    let shift = TimeDelta::seconds((longitude / 15.0 * 3600.0).round() as i64);
    date.and_time(NaiveTime::MIN).and_utc() + TimeDelta::hours(12) - shift
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}
