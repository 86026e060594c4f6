use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::Location;
use tracing::warn;

pub const ALLOW_UNSUITABLE_KEY: &str = "allowUnsuitableTasks";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const DEFAULT_LOCATION_KEY: &str = "defaultLocationData";

/// User preferences kept in the key-value store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub allow_unsuitable_tasks: bool,
    pub dark_mode: bool,
    pub default_location: Option<Location>,
}

impl Settings {
    /// Read all preferences. `allow_unsuitable_fallback` applies when the
    /// store has never recorded the override.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, allow_unsuitable_fallback: bool) -> Self {
        Self {
            allow_unsuitable_tasks: allow_unsuitable_tasks(store, allow_unsuitable_fallback),
            dark_mode: read_flag(store, DARK_MODE_KEY).unwrap_or(false),
            default_location: read_location(store),
        }
    }
}

pub fn set_dark_mode<S: KeyValueStore + ?Sized>(store: &S, dark: bool) -> Result<()> {
    store.set(DARK_MODE_KEY, bool_str(dark))
}

pub fn set_default_location<S: KeyValueStore + ?Sized>(
    store: &S,
    location: Option<&Location>,
) -> Result<()> {
    match location {
        Some(location) => store.set(DEFAULT_LOCATION_KEY, &serde_json::to_string(location)?),
        None => store.remove(DEFAULT_LOCATION_KEY),
    }
}

/// Current value of the unsuitable-hour override. Read fresh on every call.
pub fn allow_unsuitable_tasks<S: KeyValueStore + ?Sized>(store: &S, fallback: bool) -> bool {
    read_flag(store, ALLOW_UNSUITABLE_KEY).unwrap_or(fallback)
}

pub fn set_allow_unsuitable_tasks<S: KeyValueStore + ?Sized>(store: &S, allow: bool) -> Result<()> {
    store.set(ALLOW_UNSUITABLE_KEY, bool_str(allow))
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn read_flag<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<bool> {
    match store.get(key) {
        Ok(Some(value)) => Some(value == "true"),
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read setting, using default");
            None
        }
    }
}

fn read_location<S: KeyValueStore + ?Sized>(store: &S) -> Option<Location> {
    let raw = match store.get(DEFAULT_LOCATION_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "Failed to read default location");
            return None;
        }
    };

    match serde_json::from_str::<Location>(&raw) {
        Ok(location) if location.validate().is_ok() => Some(location),
        Ok(location) => {
            warn!(%location, "Stored default location is out of range, ignoring");
            None
        }
        Err(e) => {
            warn!(error = %e, "Stored default location is malformed, ignoring");
            None
        }
    }
}
