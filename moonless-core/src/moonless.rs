//! Moonless time within a night window.
//!
//! The moon is modelled with at most one rise and one set per night. Listed
//! times of day are taken on the current day's date first and moved to the
//! next day's date when they would fall before dusk.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::model::{DayRecord, NightWindow, local_to_utc, minutes_between};

/// Where the moon rises and sets relative to one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPath {
    /// Neither day lists a rise and the current day lists no set.
    NeverUp,
    /// Resolved instants, not yet clamped into the window.
    Events {
        rise: DateTime<Utc>,
        set: DateTime<Utc>,
    },
}

/// Resolve the moonrise that matters for the night starting on `current`.
pub fn resolve_moonrise(
    current: &DayRecord,
    next: &DayRecord,
    window: &NightWindow,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    if let Some(time) = current.moonrise {
        return Some(on_or_after_dusk(current.date, next.date, time, window, offset));
    }
    next.moonrise
        .map(|time| local_to_utc(next.date, time, offset).max(window.start()))
}

/// Resolve the moonset that matters for the night starting on `current`.
pub fn resolve_moonset(
    current: &DayRecord,
    next: &DayRecord,
    window: &NightWindow,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    current
        .moonset
        .map(|time| on_or_after_dusk(current.date, next.date, time, window, offset))
}

fn on_or_after_dusk(
    date: NaiveDate,
    next_date: NaiveDate,
    time: NaiveTime,
    window: &NightWindow,
    offset: FixedOffset,
) -> DateTime<Utc> {
    let instant = local_to_utc(date, time, offset);
    if instant < window.start() {
        local_to_utc(next_date, time, offset)
    } else {
        instant
    }
}

/// Combine the resolved events into the moon's path over the window.
///
/// A missing rise means the moon is already up at dusk; a missing set means
/// it stays up until dawn.
pub fn moon_path(
    current: &DayRecord,
    next: &DayRecord,
    window: &NightWindow,
    offset: FixedOffset,
) -> MoonPath {
    let rise = resolve_moonrise(current, next, window, offset);
    let set = resolve_moonset(current, next, window, offset);

    if rise.is_none() && set.is_none() {
        return MoonPath::NeverUp;
    }

    MoonPath::Events {
        rise: rise.unwrap_or(window.start()),
        set: set.unwrap_or(window.end()),
    }
}

/// Minutes of the window during which the moon is below the horizon.
///
/// Always within `0..=window.duration_minutes()`.
pub fn moonless_minutes(
    current: &DayRecord,
    next: &DayRecord,
    window: &NightWindow,
    offset: FixedOffset,
) -> f64 {
    let path = moon_path(current, next, window, offset);

    let minutes = match path {
        MoonPath::NeverUp => window.duration_minutes(),
        MoonPath::Events { rise, set } => {
            let (rise_in, set_in) = (window.clamp(rise), window.clamp(set));
            if rise <= set {
                // Up from rise to set: dark before the rise and after the set.
                minutes_between(window.start(), rise_in) + minutes_between(set_in, window.end())
            } else {
                // Up at dusk, sets, and rises again later: one dark gap in between.
                minutes_between(set_in, rise_in)
            }
        }
    };

    debug!(date = %current.date, ?path, minutes, "computed moonless time");
    minutes.max(0.0)
}

/// Render a moonless duration as whole hours and minutes.
///
/// Minutes are rounded before splitting, so 59.6 becomes "1h 0m".
pub fn format_moonless(minutes: f64) -> String {
    let total = minutes.round() as i64;
    if total <= 0 {
        return "No moonless period".to_string();
    }

    format!("{}h {}m", total / 60, total % 60)
}
