use super::classify::classify;
use crate::error::{HourcastError, Result};
use crate::models::{HourRecord, Location, RawForecast, SlotId};
use chrono::{DateTime, NaiveDateTime};

/// Turn a raw hourly series into classified records, in source order.
///
/// `lookup` supplies the persisted tasks of a slot (empty when none). Any
/// missing array, length mismatch, null element, non-finite temperature or
/// unparseable timestamp rejects the whole series.
pub fn normalize<F>(raw: &RawForecast, location: &Location, mut lookup: F) -> Result<Vec<HourRecord>>
where
    F: FnMut(&SlotId) -> Vec<String>,
{
    let times = raw
        .times
        .as_ref()
        .ok_or_else(|| malformed("missing timestamps"))?;
    let temps = raw
        .temperatures_f
        .as_ref()
        .ok_or_else(|| malformed("missing temperatures"))?;
    let codes = raw
        .weather_codes
        .as_ref()
        .ok_or_else(|| malformed("missing weather codes"))?;

    if times.len() != temps.len() || times.len() != codes.len() {
        return Err(malformed(format!(
            "series lengths differ (times={}, temperatures={}, codes={})",
            times.len(),
            temps.len(),
            codes.len()
        )));
    }

    let location_key = location.key();
    let mut records = Vec::with_capacity(times.len());

    for (index, ((time, temp), code)) in times.iter().zip(temps).zip(codes).enumerate() {
        let timestamp = time
            .as_deref()
            .ok_or_else(|| malformed(format!("null timestamp at index {}", index)))?;
        let temperature_f =
            temp.ok_or_else(|| malformed(format!("null temperature at index {}", index)))?;
        let weather_code =
            code.ok_or_else(|| malformed(format!("null weather code at index {}", index)))?;

        if !temperature_f.is_finite() {
            return Err(malformed(format!(
                "non-finite temperature at index {}",
                index
            )));
        }

        let local_time = parse_timestamp(timestamp).ok_or_else(|| {
            malformed(format!("unparseable timestamp '{}' at index {}", timestamp, index))
        })?;

        let classification = classify(weather_code, temperature_f);
        let slot_id = SlotId::new(&location_key, timestamp);
        let tasks = lookup(&slot_id);

        records.push(HourRecord {
            slot_id,
            timestamp: timestamp.to_string(),
            local_time,
            temperature_f,
            weather_code,
            tier: classification.tier,
            icon: classification.icon,
            condition_label: classification.condition_label,
            tasks,
            pending_input: String::new(),
        });
    }

    tracing::debug!(count = records.len(), location = %location, "Normalized forecast");
    Ok(records)
}

/// Wall-clock time of a source timestamp. Offsets are kept as-is, not
/// converted to the machine's zone.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn malformed(reason: impl Into<String>) -> HourcastError {
    HourcastError::MalformedForecast(reason.into())
}
