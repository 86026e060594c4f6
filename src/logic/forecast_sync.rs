use crate::datasources::ForecastSource;
use crate::db::KeyValueStore;
use crate::error::Result;
use crate::logic::normalize::normalize;
use crate::logic::rules::InsightEngine;
use crate::logic::tasks::TaskStore;
use crate::models::{HourRecord, Insights, Location, RawForecast};
use chrono::{DateTime, Local};

/// One complete forecast view: records with their tasks attached and the
/// insights derived from them.
#[derive(Debug, Clone)]
pub struct ForecastSnapshot {
    pub generation: u64,
    pub location: Location,
    pub records: Vec<HourRecord>,
    pub insights: Insights,
    pub fetched_at: DateTime<Local>,
}

/// Turns raw hourly data into snapshots and owns the task store used to
/// re-attach persisted tasks.
pub struct ForecastService<S> {
    tasks: TaskStore<S>,
    engine: InsightEngine,
}

impl<S: KeyValueStore> ForecastService<S> {
    pub fn new(store: S) -> Self {
        Self {
            tasks: TaskStore::new(store),
            engine: InsightEngine::new(),
        }
    }

    pub fn tasks(&self) -> &TaskStore<S> {
        &self.tasks
    }

    /// Validate the location, fetch, and build a snapshot. The location is
    /// checked before the source is touched.
    pub async fn refresh<F: ForecastSource>(
        &self,
        source: &F,
        location: &Location,
        generation: u64,
    ) -> Result<ForecastSnapshot> {
        location.validate()?;

        let raw = source.fetch_hourly(location).await.map_err(|e| {
            tracing::warn!("Failed to fetch forecast for {}: {}", location, e);
            e
        })?;

        self.build_snapshot(generation, location.clone(), &raw)
    }

    pub fn build_snapshot(
        &self,
        generation: u64,
        location: Location,
        raw: &RawForecast,
    ) -> Result<ForecastSnapshot> {
        let records = normalize(raw, &location, |slot| self.tasks.load_tasks(slot))?;
        let insights = self.engine.evaluate(&records);

        tracing::debug!(
            generation,
            hours = records.len(),
            recommendations = insights.recommendations.len(),
            anomalies = insights.anomalies.len(),
            "Forecast snapshot built"
        );

        Ok(ForecastSnapshot {
            generation,
            location,
            records,
            insights,
            fetched_at: Local::now(),
        })
    }

    /// Recompute insights after task or record changes.
    pub fn reevaluate(&self, records: &[HourRecord]) -> Insights {
        self.engine.evaluate(records)
    }
}
