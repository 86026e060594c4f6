use crate::logic::classify::theme_for;
use crate::models::{HourRecord, ThemeTag};
use chrono::{NaiveDateTime, Timelike};

/// The record whose hour-of-day is closest to `now`.
///
/// Only the clock hour is compared, so the first of several records with
/// the same hour (different days) wins, as does the earlier of a tie.
pub fn select_current(records: &[HourRecord], now: NaiveDateTime) -> Option<&HourRecord> {
    let hour = now.hour();
    records
        .iter()
        .enumerate()
        .min_by_key(|(i, r)| (r.hour_of_day().abs_diff(hour), *i))
        .map(|(_, r)| r)
}

/// Page theme derived from the current hour, `Default` when there is none.
pub fn current_theme(current: Option<&HourRecord>) -> ThemeTag {
    current
        .map(|r| theme_for(r.weather_code, r.temperature_f))
        .unwrap_or_default()
}
