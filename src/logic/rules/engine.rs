use super::{
    alert::UnsuitableHourRule, freeze::FreezeRule, heat::HeatRule, swing::TemperatureSwingRule,
    thunderstorm::ThunderstormRule, AnomalyRule,
};
use crate::logic::scoring;
use crate::models::{HourRecord, InsightItem, Insights};
use std::collections::HashSet;

pub const MAX_ANOMALIES: usize = 6;

pub struct InsightEngine {
    rules: Vec<Box<dyn AnomalyRule>>,
}

impl InsightEngine {
    pub fn new() -> Self {
        // Order matters: it is the order of messages within one hour
        let rules: Vec<Box<dyn AnomalyRule>> = vec![
            Box::new(UnsuitableHourRule),
            Box::new(TemperatureSwingRule),
            Box::new(ThunderstormRule),
            Box::new(HeatRule),
            Box::new(FreezeRule),
        ];

        Self { rules }
    }

    pub fn with_rules(rules: Vec<Box<dyn AnomalyRule>>) -> Self {
        Self { rules }
    }

    /// Recommendations and anomalies for one snapshot of records.
    pub fn evaluate(&self, records: &[HourRecord]) -> Insights {
        Insights {
            recommendations: scoring::recommend(records),
            anomalies: self.anomalies(records),
        }
    }

    /// Unique anomaly messages in chronological order, first occurrence wins.
    pub fn anomalies(&self, records: &[HourRecord]) -> Vec<InsightItem> {
        let mut seen = HashSet::new();
        let mut anomalies = Vec::new();

        for message in self.candidates(records) {
            if anomalies.len() == MAX_ANOMALIES {
                break;
            }
            if seen.insert(message.clone()) {
                anomalies.push(InsightItem::anomaly(message));
            }
        }

        anomalies
    }

    /// Raw messages from a single rule, without deduplication.
    pub fn evaluate_rule(&self, rule_id: &str, records: &[HourRecord]) -> Vec<String> {
        self.rules
            .iter()
            .find(|r| r.id() == rule_id)
            .map(|rule| {
                records
                    .iter()
                    .enumerate()
                    .filter_map(|(i, record)| rule.evaluate(record, previous(records, i)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }

    fn candidates<'a>(&'a self, records: &'a [HourRecord]) -> impl Iterator<Item = String> + 'a {
        records.iter().enumerate().flat_map(move |(i, record)| {
            let prev = previous(records, i);
            self.rules
                .iter()
                .filter_map(move |rule| rule.evaluate(record, prev))
        })
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn previous(records: &[HourRecord], index: usize) -> Option<&HourRecord> {
    index.checked_sub(1).and_then(|i| records.get(i))
}
