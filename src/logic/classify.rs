use crate::models::{Classification, Icon, ThemeTag, Tier};

/// Thunderstorm codes start here (95, 96, 99).
pub const THUNDERSTORM_CODE: i32 = 95;
pub const HEAT_LIMIT_F: f64 = 95.0;
pub const FREEZE_LIMIT_F: f64 = 32.0;

fn is_rain_code(code: i32) -> bool {
    (51..=67).contains(&code)
}

fn is_snow_code(code: i32) -> bool {
    (71..=77).contains(&code)
}

/// Classify one forecast hour.
///
/// Total over all inputs: codes outside the known WMO ranges fall through to
/// a good tier with the mild icon. Precedence:
/// thunderstorm > temperature extremes > rain (51-67) > snow (71-77) >
/// showers (80+) > clear / cloudy / mild.
pub fn classify(weather_code: i32, temperature_f: f64) -> Classification {
    let (tier, icon) = if weather_code >= THUNDERSTORM_CODE {
        (Tier::Unsuitable, Icon::Thunderstorm)
    } else if temperature_f > HEAT_LIMIT_F {
        (Tier::Unsuitable, Icon::Hot)
    } else if temperature_f < FREEZE_LIMIT_F {
        (Tier::Unsuitable, Icon::Cold)
    } else if is_rain_code(weather_code) {
        (Tier::Bad, Icon::Rain)
    } else if is_snow_code(weather_code) {
        (Tier::Bad, Icon::Snow)
    } else if weather_code >= 80 {
        (Tier::Bad, Icon::Rain)
    } else if weather_code == 0 {
        (Tier::Good, Icon::Clear)
    } else if (1..=3).contains(&weather_code) {
        (Tier::Good, Icon::Cloudy)
    } else {
        (Tier::Good, Icon::DefaultMild)
    };

    Classification {
        tier,
        icon,
        condition_label: tier.label(),
    }
}

/// Page theme for an hour. Rain (51-67 or 80+) is checked before snow.
pub fn theme_for(weather_code: i32, temperature_f: f64) -> ThemeTag {
    if weather_code >= THUNDERSTORM_CODE {
        ThemeTag::Thunderstorm
    } else if temperature_f > HEAT_LIMIT_F {
        ThemeTag::Hot
    } else if temperature_f < FREEZE_LIMIT_F {
        ThemeTag::Cold
    } else if is_rain_code(weather_code) || weather_code >= 80 {
        ThemeTag::Rain
    } else if is_snow_code(weather_code) {
        ThemeTag::Snow
    } else if weather_code == 0 {
        ThemeTag::Clear
    } else if (1..=3).contains(&weather_code) {
        ThemeTag::Cloudy
    } else {
        ThemeTag::Default
    }
}
