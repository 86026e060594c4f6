use super::AnomalyRule;
use crate::models::{round_degrees, HourRecord};

/// Hour-over-hour change that counts as a swing.
pub const SWING_THRESHOLD_F: f64 = 15.0;

/// Temperature swing rule
///
/// Compares each hour with the one immediately before it. The first hour of
/// a series has no predecessor and never fires.
///
/// Conditions:
/// - |Δ temperature| >= 15°F
pub struct TemperatureSwingRule;

impl AnomalyRule for TemperatureSwingRule {
    fn id(&self) -> &'static str {
        "temperature_swing"
    }

    fn name(&self) -> &'static str {
        "Temperature Swing"
    }

    fn evaluate(&self, record: &HourRecord, previous: Option<&HourRecord>) -> Option<String> {
        let previous = previous?;
        let delta = (record.temperature_f - previous.temperature_f).abs();

        if delta < SWING_THRESHOLD_F {
            return None;
        }

        Some(format!(
            "{} swing • ~{}° jump",
            record.time_label(),
            round_degrees(delta)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::test_support::hour;

    #[test]
    fn fires_on_drop_and_rise() {
        let nine = hour("2024-01-01T09:00", 64.0, 0);
        let ten = hour("2024-01-01T10:00", 42.0, 61);
        assert_eq!(
            TemperatureSwingRule.evaluate(&ten, Some(&nine)).as_deref(),
            Some("10:00 swing • ~22° jump")
        );
        assert_eq!(
            TemperatureSwingRule.evaluate(&nine, Some(&ten)).as_deref(),
            Some("09:00 swing • ~22° jump")
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let a = hour("2024-01-01T09:00", 50.0, 0);
        let b = hour("2024-01-01T10:00", 65.0, 0);
        assert!(TemperatureSwingRule.evaluate(&b, Some(&a)).is_some());

        let c = hour("2024-01-01T10:00", 64.9, 0);
        assert!(TemperatureSwingRule.evaluate(&c, Some(&a)).is_none());
    }

    #[test]
    fn first_hour_never_fires() {
        let a = hour("2024-01-01T09:00", 50.0, 0);
        assert!(TemperatureSwingRule.evaluate(&a, None).is_none());
    }
}
