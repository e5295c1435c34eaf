//! Core library for the `moonless` CLI.
//!
//! This crate defines:
//! - Astronomical night resolution and moonless-time computation
//! - Moon phase classification and night cloud-cover averaging
//! - Seven-night report building on top of forecast data
//! - Abstraction over forecast providers
//! - Configuration & credentials handling
//!
//! It is used by `moonless-cli`, but the report pipeline is pure and can be
//! driven by any caller holding a [`Forecast`].

pub mod clouds;
pub mod config;
pub mod error;
pub mod forecaster;
pub mod location;
pub mod model;
pub mod moonless;
pub mod phase;
pub mod provider;
pub mod report;
pub mod twilight;

pub use config::{Config, ProviderConfig};
pub use error::ForecastError;
pub use forecaster::MoonForecaster;
pub use location::Location;
pub use model::{DayRecord, Forecast, HourRecord, NightWindow};
pub use phase::MoonPhase;
pub use provider::{ForecastProvider, ProviderId};
pub use report::{ForecastReport, NightSummary, ReportBuilder};
pub use twilight::{Night, SolarTwilight, TwilightSource};
