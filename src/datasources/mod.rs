pub mod openmeteo;

pub use openmeteo::OpenMeteoClient;

use crate::error::Result;
use crate::models::{Location, RawForecast};

/// Anything that can deliver the raw hourly series for a location.
#[allow(async_fn_in_trait)]
pub trait ForecastSource {
    async fn fetch_hourly(&self, location: &Location) -> Result<RawForecast>;
}
