use super::AnomalyRule;
use crate::models::{HourRecord, Tier};

/// Unsuitable hour alert
///
/// Fires for every hour classified unsuitable, whatever the cause
/// (thunderstorm, heat or freeze). The message carries the condition label
/// and the icon so the cause stays visible.
pub struct UnsuitableHourRule;

impl AnomalyRule for UnsuitableHourRule {
    fn id(&self) -> &'static str {
        "unsuitable_hour"
    }

    fn name(&self) -> &'static str {
        "Unsuitable Hour"
    }

    fn evaluate(&self, record: &HourRecord, _previous: Option<&HourRecord>) -> Option<String> {
        if record.tier != Tier::Unsuitable {
            return None;
        }

        Some(format!(
            "{} alert • {} {}",
            record.time_label(),
            record.condition_label,
            record.icon.symbol()
        ))
    }
}
