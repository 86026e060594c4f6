use crate::error::{HourcastError, Result};
use crate::models::Location;
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub location: LocationConfig,
    #[serde(default)]
    pub openmeteo: OpenMeteoConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationConfig {
    pub name: String,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub longitude: f64,
}

impl LocationConfig {
    pub fn to_location(&self) -> Result<Location> {
        Location::new(&self.name, self.latitude, self.longitude)
    }
}

/// Coordinates may arrive as numbers or, after `${VAR}` substitution, as strings.
fn deserialize_coordinate<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coordinate {
        Number(f64),
        Text(String),
    }

    match Coordinate::deserialize(deserializer)? {
        Coordinate::Number(value) => Ok(value),
        Coordinate::Text(value) => value.trim().parse::<f64>().map_err(|_| {
            D::Error::custom(format!(
                "invalid coordinate '{}' - ensure the environment variable is set",
                value
            ))
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OpenMeteoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".into()
}

fn default_forecast_days() -> u8 {
    1
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            forecast_days: default_forecast_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TasksConfig {
    /// Seed for the override flag when the store holds none.
    #[serde(default)]
    pub allow_unsuitable: bool,
}

impl Config {
    /// Load config from an explicit path or the standard locations. A missing
    /// file yields the defaults; an unreadable or invalid one is an error.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(HourcastError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            tracing::info!(
                "No config file at {:?}, using defaults. Run `hourcast init` to set up.",
                config_path
            );
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| HourcastError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&config_str)
    }

    /// Parse YAML text after environment substitution and validate it.
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| HourcastError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.location.to_location()?;

        if self.openmeteo.base_url.trim().is_empty() {
            return Err(HourcastError::Config("openmeteo.base_url is empty".into()));
        }
        if self.openmeteo.forecast_days == 0 {
            return Err(HourcastError::Config(
                "openmeteo.forecast_days must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/hourcast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HourcastError::Config("Cannot determine config directory".into()))?
            .join("hourcast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = Self::default();

        println!();
        println!("Let's set up Hourcast!");
        println!();

        // --- Default location ---
        println!("Default location");
        let name: String = Input::new()
            .with_prompt("  Name")
            .default(defaults.location.name.clone())
            .interact_text()
            .map_err(input_error)?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(defaults.location.latitude)
            .validate_with(|v: &f64| {
                if v.is_finite() && (-90.0..=90.0).contains(v) {
                    Ok(())
                } else {
                    Err("latitude must be between -90 and 90")
                }
            })
            .interact_text()
            .map_err(input_error)?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(defaults.location.longitude)
            .validate_with(|v: &f64| {
                if v.is_finite() && (-180.0..=180.0).contains(v) {
                    Ok(())
                } else {
                    Err("longitude must be between -180 and 180")
                }
            })
            .interact_text()
            .map_err(input_error)?;

        println!();

        // --- Open-Meteo ---
        println!("Open-Meteo");
        let base_url: String = Input::new()
            .with_prompt("  API base URL")
            .default(defaults.openmeteo.base_url.clone())
            .interact_text()
            .map_err(input_error)?;

        println!();

        // --- Tasks ---
        let allow_unsuitable = Confirm::new()
            .with_prompt("Allow tasks in unsuitable hours?")
            .default(false)
            .interact()
            .map_err(input_error)?;

        println!();

        let config = Config {
            location: LocationConfig {
                name,
                latitude,
                longitude,
            },
            openmeteo: OpenMeteoConfig {
                base_url,
                ..defaults.openmeteo
            },
            tasks: TasksConfig { allow_unsuitable },
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| HourcastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Hourcast Configuration\n# Generated by `hourcast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| HourcastError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("HOURCAST_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| HourcastError::Config("Cannot determine data directory".into()))?
            .join("hourcast");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("hourcast.db"))
    }
}

fn input_error(e: dialoguer::Error) -> HourcastError {
    HourcastError::Config(format!("Input error: {}", e))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: LocationConfig {
                name: "Philadelphia".into(),
                latitude: 39.9526,
                longitude: -75.1652,
            },
            openmeteo: OpenMeteoConfig::default(),
            tasks: TasksConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
location:
  name: Olney
  latitude: 40.04
  longitude: -75.12
openmeteo:
  base_url: http://localhost:9000/v1
  forecast_days: 1
  timeout_secs: 3
tasks:
  allow_unsuitable: true
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.location.name, "Olney");
        assert_eq!(config.openmeteo.base_url, "http://localhost:9000/v1");
        assert_eq!(config.openmeteo.timeout_secs, 3);
        assert!(config.tasks.allow_unsuitable);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let yaml = "location:\n  name: Home\n  latitude: 10\n  longitude: 20\n";
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.openmeteo, OpenMeteoConfig::default());
        assert!(!config.tasks.allow_unsuitable);
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("HOURCAST_TEST_LATITUDE", "51.5");
        let yaml = "location:\n  name: London\n  latitude: ${HOURCAST_TEST_LATITUDE}\n  longitude: -0.12\n";
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.location.latitude, 51.5);
    }

    #[test]
    fn unset_variable_is_a_config_error() {
        let yaml = "location:\n  name: Nowhere\n  latitude: ${HOURCAST_TEST_UNSET_VAR}\n  longitude: 0\n";
        assert!(matches!(
            Config::parse(yaml),
            Err(HourcastError::Config(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_location() {
        let yaml = "location:\n  name: Bad\n  latitude: 91\n  longitude: 0\n";
        assert!(matches!(
            Config::parse(yaml),
            Err(HourcastError::InvalidLocation(_))
        ));
    }

    #[test]
    fn write_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config::default();

        config.write_to(&path).unwrap();
        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        assert!(Config::load(Some(missing)).is_err());
    }

    #[test]
    fn data_dir_override_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data");
        let db = Config::db_path(Some(&target)).unwrap();
        assert!(target.is_dir());
        assert_eq!(db, target.join("hourcast.db"));
    }
}
