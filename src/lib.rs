pub mod app;
pub mod config;
pub mod datasources;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;
pub mod ui;

pub use error::{HourcastError, Result};
