use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Hourly series exactly as the data source delivers it: parallel arrays
/// whose fields may be missing and whose elements may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub times: Option<Vec<Option<String>>>,
    pub temperatures_f: Option<Vec<Option<f64>>>,
    pub weather_codes: Option<Vec<Option<i32>>>,
}

impl RawForecast {
    /// Convenience constructor for a fully populated series.
    pub fn from_series(times: &[&str], temperatures_f: &[f64], weather_codes: &[i32]) -> Self {
        Self {
            times: Some(times.iter().map(|t| Some(t.to_string())).collect()),
            temperatures_f: Some(temperatures_f.iter().copied().map(Some).collect()),
            weather_codes: Some(weather_codes.iter().copied().map(Some).collect()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Bad,
    Unsuitable,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Bad => "bad",
            Tier::Unsuitable => "unsuitable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Good => "Good Conditions",
            Tier::Bad => "Bad Conditions",
            Tier::Unsuitable => "Unsuitable Conditions",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Tier::Good => Color::Green,
            Tier::Bad => Color::Yellow,
            Tier::Unsuitable => Color::Red,
        }
    }

    pub fn all() -> &'static [Tier] {
        &[Tier::Good, Tier::Bad, Tier::Unsuitable]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Thunderstorm,
    Hot,
    Cold,
    Rain,
    Snow,
    Clear,
    Cloudy,
    DefaultMild,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Thunderstorm => "thunderstorm",
            Icon::Hot => "hot",
            Icon::Cold => "cold",
            Icon::Rain => "rain",
            Icon::Snow => "snow",
            Icon::Clear => "clear",
            Icon::Cloudy => "cloudy",
            Icon::DefaultMild => "default-mild",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Icon::Thunderstorm => "⚡",
            Icon::Hot => "🔥",
            Icon::Cold => "🥶",
            Icon::Rain => "🌧️",
            Icon::Snow => "❄️",
            Icon::Clear => "☀️",
            Icon::Cloudy => "☁️",
            Icon::DefaultMild => "🌤️",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse page-level theme, independent of the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTag {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Hot,
    Cold,
    #[default]
    Default,
}

impl ThemeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeTag::Clear => "clear",
            ThemeTag::Cloudy => "cloudy",
            ThemeTag::Rain => "rain",
            ThemeTag::Snow => "snow",
            ThemeTag::Thunderstorm => "thunderstorm",
            ThemeTag::Hot => "hot",
            ThemeTag::Cold => "cold",
            ThemeTag::Default => "default",
        }
    }
}

impl std::fmt::Display for ThemeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of the per-hour classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: Tier,
    pub icon: Icon,
    pub condition_label: &'static str,
}

/// Identity of one forecast hour at one place. Persisted tasks are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(location_key: &str, timestamp: &str) -> Self {
        Self(format!("{}@{}", location_key, timestamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn storage_key(&self) -> String {
        format!("tasks-{}", self.0)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One classified forecast hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourRecord {
    pub slot_id: SlotId,
    pub timestamp: String,
    pub local_time: NaiveDateTime,
    pub temperature_f: f64,
    pub weather_code: i32,
    pub tier: Tier,
    pub icon: Icon,
    pub condition_label: &'static str,
    pub tasks: Vec<String>,
    pub pending_input: String,
}

impl HourRecord {
    pub fn hour_of_day(&self) -> u32 {
        self.local_time.hour()
    }

    /// Clock label used in insight messages, e.g. `14:00`.
    pub fn time_label(&self) -> String {
        self.local_time.format("%H:%M").to_string()
    }

    pub fn display_temp(&self) -> String {
        format!("{}°", round_degrees(self.temperature_f))
    }

    pub fn accepts_new_tasks(&self, allow_unsuitable: bool) -> bool {
        self.tier != Tier::Unsuitable || allow_unsuitable
    }
}

/// Round to whole degrees, halves toward positive infinity (-0.5 -> 0, -1.5 -> -1).
pub fn round_degrees(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
