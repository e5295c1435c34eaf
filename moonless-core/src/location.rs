use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Observer position, stored at one-decimal precision.
///
/// Rounding happens once, in [`Location::new`], so the same place always maps
/// to the same stored value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Validate the ranges and reduce both coordinates to one decimal.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ForecastError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude: round_one_decimal(latitude),
            longitude: round_one_decimal(longitude),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}, {:.1}", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = ForecastError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.latitude, raw.longitude)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        let loc = Location::new(51.4779, -0.1278).unwrap();
        assert_eq!(loc.latitude(), 51.5);
        assert_eq!(loc.longitude(), -0.1);
        assert_eq!(loc.to_string(), "51.5, -0.1");
    }

    #[test]
    fn nearby_points_collapse_to_same_location() {
        let a = Location::new(40.712, -74.006).unwrap();
        let b = Location::new(40.689, -73.951).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn accepts_range_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Location::new(90.5, 0.0).unwrap_err(),
            ForecastError::InvalidLatitude(90.5)
        );
        assert_eq!(
            Location::new(0.0, -181.0).unwrap_err(),
            ForecastError::InvalidLongitude(-181.0)
        );
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn deserializing_validates_and_rounds() {
        let loc: Location = toml::from_str("latitude = 12.34\nlongitude = 56.78").unwrap();
        assert_eq!(loc, Location::new(12.3, 56.8).unwrap());

        let bad = toml::from_str::<Location>("latitude = 123.0\nlongitude = 0.0");
        assert!(bad.is_err());
    }
}
