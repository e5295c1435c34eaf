use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::ForecastError,
    location::Location,
    model::{DayRecord, Forecast, HourRecord},
    report::REQUIRED_DAYS,
};

use super::ForecastProvider;

const TIMELINE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";
const INCLUDE: &str = "days,hours";
const ELEMENTS: &str = "datetime,moonrise,moonset,moonphase,cloudcover,sunrise,sunset";

/// Visual Crossing Timeline API client.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ForecastProvider for VisualCrossingProvider {
    async fn fetch_forecast(&self, location: Location) -> Result<Forecast> {
        let url = format!(
            "{TIMELINE_URL}/{},{}/next7days",
            location.latitude(),
            location.longitude()
        );
        debug!(%url, "requesting Visual Crossing timeline");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("include", INCLUDE),
                ("elements", ELEMENTS),
            ])
            .send()
            .await
            .context("Failed to send request to Visual Crossing (timeline)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Visual Crossing timeline response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Visual Crossing timeline request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        debug!(bytes = body.len(), "received Visual Crossing timeline");
        parse_timeline(&body, location)
    }
}

#[derive(Debug, Deserialize)]
struct VcHour {
    datetime: NaiveTime,
    cloudcover: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct VcDay {
    datetime: NaiveDate,
    moonphase: f64,
    moonrise: Option<NaiveTime>,
    moonset: Option<NaiveTime>,
    sunrise: Option<NaiveTime>,
    sunset: Option<NaiveTime>,
    #[serde(default)]
    hours: Vec<VcHour>,
}

#[derive(Debug, Deserialize)]
struct VcTimeline {
    timezone: String,
    tzoffset: f64,
    days: Vec<VcDay>,
}

/// Parse a timeline response into the forecast model.
pub fn parse_timeline(body: &str, location: Location) -> Result<Forecast> {
    let parsed: VcTimeline =
        serde_json::from_str(body).context("Failed to parse Visual Crossing timeline JSON")?;

    let utc_offset = FixedOffset::east_opt((parsed.tzoffset * 3600.0).round() as i32)
        .ok_or(ForecastError::InvalidUtcOffset(parsed.tzoffset))?;

    let days = parsed
        .days
        .into_iter()
        .take(REQUIRED_DAYS)
        .map(VcDay::into_record)
        .collect();

    Ok(Forecast {
        location,
        timezone: parsed.timezone,
        utc_offset,
        days,
    })
}

impl VcDay {
    fn into_record(self) -> DayRecord {
        // Without a sunrise or sunset the whole day counts as daylight, which
        // leaves no night hours for cloud averaging.
        let (sunrise, sunset) = match (self.sunrise, self.sunset) {
            (Some(sunrise), Some(sunset)) => (sunrise, sunset),
            _ => {
                warn!(date = %self.datetime, "missing sunrise or sunset, no night hours");
                (NaiveTime::MIN, last_second())
            }
        };

        let hours = self
            .hours
            .into_iter()
            .filter_map(|h| {
                h.cloudcover.map(|cloud_cover| HourRecord {
                    time: h.datetime,
                    cloud_cover,
                })
            })
            .collect();

        DayRecord {
            date: self.datetime,
            moon_phase: self.moonphase,
            moonrise: self.moonrise,
            moonset: self.moonset,
            sunrise,
            sunset,
            hours,
        }
    }
}

fn last_second() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
