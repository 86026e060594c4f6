use super::AnomalyRule;
use crate::logic::classify::THUNDERSTORM_CODE;
use crate::models::HourRecord;

/// Thunderstorm risk, in addition to the generic unsuitable-hour alert.
pub struct ThunderstormRule;

impl AnomalyRule for ThunderstormRule {
    fn id(&self) -> &'static str {
        "thunderstorm"
    }

    fn name(&self) -> &'static str {
        "Thunderstorm Risk"
    }

    fn evaluate(&self, record: &HourRecord, _previous: Option<&HourRecord>) -> Option<String> {
        (record.weather_code >= THUNDERSTORM_CODE)
            .then(|| format!("{} alert • Thunderstorm risk", record.time_label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::test_support::hour;

    #[test]
    fn fires_from_code_95() {
        let storm = hour("2024-06-01T17:00", 80.0, 99);
        assert_eq!(
            ThunderstormRule.evaluate(&storm, None).as_deref(),
            Some("17:00 alert • Thunderstorm risk")
        );
        assert!(ThunderstormRule
            .evaluate(&hour("2024-06-01T17:00", 80.0, 82), None)
            .is_none());
    }
}
