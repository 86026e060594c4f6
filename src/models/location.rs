use crate::error::{HourcastError, Result};
use serde::{Deserialize, Serialize};

/// A named point the forecast is fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self {
            name: name.into(),
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Build a location from user-entered coordinate strings.
    pub fn parse(name: &str, latitude: &str, longitude: &str) -> Result<Self> {
        let lat = latitude.trim().parse::<f64>().map_err(|_| {
            HourcastError::InvalidLocation(format!("latitude '{}' is not a number", latitude))
        })?;
        let lon = longitude.trim().parse::<f64>().map_err(|_| {
            HourcastError::InvalidLocation(format!("longitude '{}' is not a number", longitude))
        })?;
        Self::new(name.trim(), lat, lon)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(HourcastError::InvalidLocation(format!(
                "latitude {} must be within [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(HourcastError::InvalidLocation(format!(
                "longitude {} must be within [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Place identity used in slot ids. The display name is not part of it.
    pub fn key(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.2}, {:.2})",
            self.name, self.latitude, self.longitude
        )
    }
}
