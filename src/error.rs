use thiserror::Error;

#[derive(Error, Debug)]
pub enum HourcastError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Forecast fetch failed: {0}")]
    Fetch(String),

    #[error("Malformed forecast: {0}")]
    MalformedForecast(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HourcastError {
    /// Errors that replace the forecast view with a blocking message.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            HourcastError::InvalidLocation(_)
                | HourcastError::Fetch(_)
                | HourcastError::MalformedForecast(_)
                | HourcastError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HourcastError>;
