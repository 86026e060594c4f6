pub mod forecast;
pub mod settings;

pub use forecast::ForecastScreen;
pub use settings::SettingsScreen;
