use crate::{Config, Forecast, Location, provider::visualcrossing::VisualCrossingProvider};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod visualcrossing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    VisualCrossing,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::VisualCrossing => "visualcrossing",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::VisualCrossing]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "visualcrossing" => Ok(ProviderId::VisualCrossing),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: visualcrossing."
            )),
        }
    }
}

/// Source of multi-day astronomical forecasts.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch today plus the following days for `location`.
    async fn fetch_forecast(&self, location: Location) -> anyhow::Result<Forecast>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    provider_for_key(id, config.resolved_api_key(id))
}

fn provider_for_key(
    id: ProviderId,
    api_key: Option<String>,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `moonless configure {id}` and enter your API key."
        )
    })?;

    let boxed: Box<dyn ForecastProvider> = match id {
        ProviderId::VisualCrossing => Box::new(VisualCrossingProvider::new(api_key)),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}
