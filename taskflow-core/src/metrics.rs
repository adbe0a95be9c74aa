//! Schedule quality metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total estimated minutes | Sum of effort over eligible tasks |
//! | Overloaded | Total effort exceeds one day's capacity |
//! | On-time rate | Fraction of tasks with zero tardiness (1.0 when empty) |
//! | Average tardiness | Mean tardiness in minutes (0 when empty) |
//! | Max tardiness | Largest single delay in minutes |
//! | Projected finish | Latest projected completion |
//!
//! `overloaded` is a single-day check independent of the multi-day
//! simulation: a plan can be overloaded and still finish everything on time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capacity::DailyCapacity;
use crate::simulator::ScheduledTaskEntry;
use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub strategy: Strategy,
    pub available_minutes_per_day: u32,
    pub total_estimated_minutes: u64,
    pub overloaded: bool,
    /// In `[0, 1]`.
    pub on_time_rate: f64,
    pub average_tardiness_min: f64,
    pub max_tardiness_min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_finish: Option<DateTime<Utc>>,
    pub ordered_tasks: Vec<ScheduledTaskEntry>,
}

impl ScheduleResult {
    pub fn aggregate(
        strategy: Strategy,
        ordered_tasks: Vec<ScheduledTaskEntry>,
        capacity: DailyCapacity,
    ) -> Self {
        let count = ordered_tasks.len();
        let total_estimated_minutes: u64 = ordered_tasks
            .iter()
            .map(|e| u64::from(e.task.estimated_minutes))
            .sum();

        let on_time_count = ordered_tasks.iter().filter(|e| e.on_time).count();
        let total_tardiness: f64 = ordered_tasks.iter().map(|e| e.tardiness_minutes).sum();

        let (on_time_rate, average_tardiness_min) = if count == 0 {
            (1.0, 0.0)
        } else {
            (
                on_time_count as f64 / count as f64,
                total_tardiness / count as f64,
            )
        };

        let max_tardiness_min = ordered_tasks
            .iter()
            .map(|e| e.tardiness_minutes)
            .fold(0.0, f64::max);
        let projected_finish = ordered_tasks.iter().map(|e| e.projected_completion).max();

        Self {
            strategy,
            available_minutes_per_day: capacity.minutes(),
            total_estimated_minutes,
            overloaded: total_estimated_minutes > u64::from(capacity.minutes()),
            on_time_rate,
            average_tardiness_min,
            max_tardiness_min,
            projected_finish,
            ordered_tasks,
        }
    }

    pub fn late_count(&self) -> usize {
        self.ordered_tasks.iter().filter(|e| !e.on_time).count()
    }
}

/// Both strategies evaluated over the same snapshot and capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub edf: ScheduleResult,
    pub weighted_greedy: ScheduleResult,
}
