//! Scheduling engine: filter -> order -> simulate -> aggregate.
//!
//! The engine is a pure projection over a task snapshot. It holds only its
//! configuration; every run builds its own capacity cursor and result, so
//! concurrent callers never share mutable state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::capacity::{CapacityModel, DailyCapacity};
use crate::config::EngineConfig;
use crate::metrics::{ComparisonResult, ScheduleResult};
use crate::simulator::simulate;
use crate::strategy::Strategy;
use crate::task::Task;

/// Supplies the current set of tasks (any status) for one scheduling run.
///
/// Storage lives outside the engine; implementations must return a consistent
/// snapshot.
pub trait TaskSnapshotProvider {
    fn snapshot(&self) -> Result<Vec<Task>>;
}

impl TaskSnapshotProvider for Vec<Task> {
    fn snapshot(&self) -> Result<Vec<Task>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: EngineConfig,
}

impl Scheduler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one strategy over `tasks`. `DONE` tasks are dropped first.
    pub fn schedule(
        &self,
        tasks: &[Task],
        strategy: Strategy,
        capacity: DailyCapacity,
        now: DateTime<Utc>,
    ) -> ScheduleResult {
        let eligible: Vec<&Task> = tasks.iter().filter(|t| t.is_eligible()).collect();

        let ranked = strategy.order(&eligible, now, capacity, &self.config.weights);
        let mut model = CapacityModel::new(capacity, now, self.config.timezone);
        let entries = simulate(ranked, &mut model);
        let result = ScheduleResult::aggregate(strategy, entries, capacity);

        debug!(
            strategy = %strategy,
            eligible = eligible.len(),
            skipped_done = tasks.len() - eligible.len(),
            total_minutes = result.total_estimated_minutes,
            overloaded = result.overloaded,
            on_time_rate = result.on_time_rate,
            "schedule computed"
        );

        result
    }

    /// Run both strategies over the identical snapshot, capacity and `now`.
    pub fn compare(
        &self,
        tasks: &[Task],
        capacity: DailyCapacity,
        now: DateTime<Utc>,
    ) -> ComparisonResult {
        ComparisonResult {
            edf: self.schedule(tasks, Strategy::Edf, capacity, now),
            weighted_greedy: self.schedule(tasks, Strategy::WeightedGreedy, capacity, now),
        }
    }

    pub fn schedule_snapshot(
        &self,
        provider: &dyn TaskSnapshotProvider,
        strategy: Strategy,
        capacity: DailyCapacity,
        now: DateTime<Utc>,
    ) -> Result<ScheduleResult> {
        let tasks = provider.snapshot().context("reading task snapshot")?;
        Ok(self.schedule(&tasks, strategy, capacity, now))
    }

    /// One snapshot read feeds both runs.
    pub fn compare_snapshot(
        &self,
        provider: &dyn TaskSnapshotProvider,
        capacity: DailyCapacity,
        now: DateTime<Utc>,
    ) -> Result<ComparisonResult> {
        let tasks = provider.snapshot().context("reading task snapshot")?;
        Ok(self.compare(&tasks, capacity, now))
    }
}
