use anyhow::{Context, Result};
use tracing::info;

use crate::{
    location::Location,
    provider::ForecastProvider,
    report::{ForecastReport, ReportBuilder},
    twilight::{SolarTwilight, TwilightSource},
};

/// Fetches forecast data from an injected provider and turns it into a report.
#[derive(Debug)]
pub struct MoonForecaster<T: TwilightSource = SolarTwilight> {
    provider: Box<dyn ForecastProvider>,
    builder: ReportBuilder<T>,
}

impl MoonForecaster {
    pub fn new(provider: Box<dyn ForecastProvider>) -> Self {
        Self::with_twilight(provider, SolarTwilight)
    }
}

impl<T: TwilightSource> MoonForecaster<T> {
    pub fn with_twilight(provider: Box<dyn ForecastProvider>, twilight: T) -> Self {
        Self {
            provider,
            builder: ReportBuilder::new(twilight),
        }
    }

    pub async fn report_for(&self, location: Location) -> Result<ForecastReport> {
        let forecast = self
            .provider
            .fetch_forecast(location)
            .await
            .with_context(|| format!("Failed to fetch forecast for {location}"))?;

        info!(%location, days = forecast.days.len(), timezone = %forecast.timezone, "fetched forecast");

        let report = self
            .builder
            .build(&forecast)
            .with_context(|| format!("Failed to build report for {location}"))?;

        Ok(report)
    }
}
