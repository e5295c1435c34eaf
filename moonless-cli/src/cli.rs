use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use moonless_core::{
    Config, Location, MoonForecaster, ProviderId, provider::default_provider_from_config,
};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "moonless", version, about = "Moonless night forecasts for stargazing")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a forecast provider.
    Configure {
        /// Provider short name, e.g. "visualcrossing".
        #[arg(default_value = "visualcrossing")]
        provider: String,
    },

    /// Save your location and show its forecast.
    #[command(allow_negative_numbers = true)]
    SetLocation {
        /// Latitude in degrees, [-90, 90].
        latitude: f64,

        /// Longitude in degrees, [-180, 180].
        longitude: f64,
    },

    /// Show the moonless-night forecast for the next seven nights.
    #[command(allow_negative_numbers = true)]
    Forecast {
        /// Latitude; defaults to the saved location.
        #[arg(long, requires = "lon")]
        lat: Option<f64>,

        /// Longitude; defaults to the saved location.
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::SetLocation {
                latitude,
                longitude,
            } => set_location(latitude, longitude).await,
            Command::Forecast { lat, lon } => forecast(lat, lon).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if config.is_provider_configured(id) {
        println!("Replacing the existing API key for {id}.");
    }

    let api_key = Password::new(&format!("{id} API key:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn set_location(latitude: f64, longitude: f64) -> anyhow::Result<()> {
    let location = Location::new(latitude, longitude)?;
    let mut config = Config::load()?;

    if config.location != Some(location) {
        info!(%location, "updating saved location");
        config.set_location(location);
        config.save()?;
    }
    println!("Location set to {location}.");

    // The first forecast also tells us the location's timezone.
    let forecaster = MoonForecaster::new(default_provider_from_config(&config)?);
    let report = forecaster.report_for(location).await?;

    config.set_timezone(report.timezone.clone());
    config.save()?;

    println!("\n{report}");
    Ok(())
}

async fn forecast(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<()> {
    let config = Config::load()?;

    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Location::new(lat, lon)?,
        _ => config.require_location()?,
    };

    let forecaster = MoonForecaster::new(default_provider_from_config(&config)?);
    let report = forecaster.report_for(location).await?;

    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["moonless", "set-location", "-33.9", "-70.6"]).unwrap();
        match cli.command {
            Command::SetLocation {
                latitude,
                longitude,
            } => {
                assert_eq!(latitude, -33.9);
                assert_eq!(longitude, -70.6);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn forecast_flags_come_in_pairs() {
        assert!(Cli::try_parse_from(["moonless", "forecast", "--lat", "10.0"]).is_err());

        let cli =
            Cli::try_parse_from(["moonless", "forecast", "--lat", "-10.5", "--lon", "20"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Forecast {
                lat: Some(_),
                lon: Some(_)
            }
        ));
    }

    #[test]
    fn configure_defaults_to_visualcrossing() {
        let cli = Cli::try_parse_from(["moonless", "configure"]).unwrap();
        match cli.command {
            Command::Configure { provider } => assert_eq!(provider, "visualcrossing"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["moonless", "forecast", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
