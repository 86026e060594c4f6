pub mod alert;
pub mod engine;
pub mod freeze;
pub mod heat;
pub mod swing;
pub mod thunderstorm;

pub use engine::InsightEngine;

use crate::models::HourRecord;

/// Trait for per-hour anomaly rules
pub trait AnomalyRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate one hour (with its predecessor, if any) and return an alert
    /// message if the rule fires
    fn evaluate(&self, record: &HourRecord, previous: Option<&HourRecord>) -> Option<String>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::logic::normalize;
    use crate::models::{HourRecord, Location, RawForecast};

    pub fn hour(time: &str, temp: f64, code: i32) -> HourRecord {
        let location = Location::new("Test", 0.0, 0.0).unwrap();
        let raw = RawForecast::from_series(&[time], &[temp], &[code]);
        normalize(&raw, &location, |_| Vec::new())
            .unwrap()
            .remove(0)
    }
}
