use crate::model::{DayRecord, HourRecord};

/// Whether an hourly sample falls outside the day's sunrise..=sunset span.
pub fn is_night_hour(day: &DayRecord, hour: &HourRecord) -> bool {
    hour.time < day.sunrise || hour.time > day.sunset
}

/// Mean cloud cover over the day's night hours, in percent.
///
/// Night hours are delimited by the plain sunrise/sunset times rather than by
/// astronomical twilight. Returns `None` when no sample falls in the night,
/// which happens around midsummer at high latitudes.
pub fn average_night_cloud_cover(day: &DayRecord) -> Option<f64> {
    let (sum, count) = day
        .hours
        .iter()
        .filter(|hour| is_night_hour(day, hour))
        .fold((0.0, 0usize), |(sum, count), hour| (sum + hour.cloud_cover, count + 1));

    (count > 0).then(|| (sum / count as f64).clamp(0.0, 100.0))
}

pub fn format_cloud_cover(cover: Option<f64>) -> String {
    match cover {
        Some(pct) => format!("{pct:.0}%"),
        None => "N/A".to_string(),
    }
}
