use super::AnomalyRule;
use crate::logic::classify::HEAT_LIMIT_F;
use crate::models::{round_degrees, HourRecord};

/// Heat warning rule
///
/// Conditions:
/// - Temperature strictly above 95°F
pub struct HeatRule;

impl AnomalyRule for HeatRule {
    fn id(&self) -> &'static str {
        "heat"
    }

    fn name(&self) -> &'static str {
        "Extreme Heat"
    }

    fn evaluate(&self, record: &HourRecord, _previous: Option<&HourRecord>) -> Option<String> {
        if record.temperature_f <= HEAT_LIMIT_F {
            return None;
        }

        Some(format!(
            "{} heat • {}°",
            record.time_label(),
            round_degrees(record.temperature_f)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::test_support::hour;

    #[test]
    fn fires_above_limit() {
        let hot = hour("2024-07-04T15:00", 101.6, 0);
        assert_eq!(HeatRule.evaluate(&hot, None).as_deref(), Some("15:00 heat • 102°"));
        assert!(HeatRule
            .evaluate(&hour("2024-07-04T15:00", 95.0, 0), None)
            .is_none());
    }
}
