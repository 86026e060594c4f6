use super::AnomalyRule;
use crate::logic::classify::FREEZE_LIMIT_F;
use crate::models::{round_degrees, HourRecord};

pub struct FreezeRule;

impl AnomalyRule for FreezeRule {
    fn id(&self) -> &'static str {
        "freeze"
    }

    fn name(&self) -> &'static str {
        "Freeze"
    }

    fn evaluate(&self, record: &HourRecord, _previous: Option<&HourRecord>) -> Option<String> {
        if record.temperature_f >= FREEZE_LIMIT_F {
            return None;
        }

        Some(format!(
            "{} freeze • {}°",
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
    fn fires_below_freezing() {
        let cold = hour("2024-01-15T06:00", 18.4, 71);
        assert_eq!(
            FreezeRule.evaluate(&cold, None).as_deref(),
            Some("06:00 freeze • 18°")
        );
        assert!(FreezeRule
            .evaluate(&hour("2024-01-15T06:00", 32.0, 0), None)
            .is_none());
    }
}
