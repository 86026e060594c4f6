pub mod classify;
pub mod current;
pub mod forecast_sync;
pub mod normalize;
pub mod rules;
pub mod scoring;
pub mod tasks;

pub use classify::{classify, theme_for};
pub use current::{current_theme, select_current};
pub use forecast_sync::{ForecastService, ForecastSnapshot};
pub use normalize::normalize;
pub use rules::InsightEngine;
pub use tasks::{Declined, TaskChange, TaskStore};
