use crate::models::{round_degrees, HourRecord, InsightItem, Tier};

pub const MAX_RECOMMENDATIONS: usize = 4;
pub const MIN_RECOMMENDATION_SCORE: f64 = 1.0;

pub fn tier_weight(tier: Tier) -> f64 {
    match tier {
        Tier::Good => 3.0,
        Tier::Bad => 1.0,
        Tier::Unsuitable => -3.0,
    }
}

/// Comfort bonus: 55-82°F is ideal, 45-55°F acceptable, beyond 35/90°F penalised.
pub fn temp_weight(temperature_f: f64) -> f64 {
    if (55.0..=82.0).contains(&temperature_f) {
        2.0
    } else if (45.0..55.0).contains(&temperature_f) {
        1.0
    } else if temperature_f > 90.0 || temperature_f < 35.0 {
        -2.0
    } else {
        0.0
    }
}

pub fn daylight_weight(hour_of_day: u32) -> f64 {
    if (8..=18).contains(&hour_of_day) {
        1.5
    } else {
        0.0
    }
}

pub fn score(record: &HourRecord) -> f64 {
    tier_weight(record.tier)
        + temp_weight(record.temperature_f)
        + daylight_weight(record.hour_of_day())
}

/// Best task windows, highest score first. Ties keep chronological order.
pub fn recommend(records: &[HourRecord]) -> Vec<InsightItem> {
    let mut scored: Vec<(f64, &HourRecord)> = records
        .iter()
        .map(|r| (score(r), r))
        .filter(|(s, _)| *s > MIN_RECOMMENDATION_SCORE)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(s, r)| {
            InsightItem::recommendation(
                format!(
                    "Task window {} • {} • {}°",
                    r.time_label(),
                    r.condition_label,
                    round_degrees(r.temperature_f)
                ),
                s,
            )
        })
        .collect()
}
