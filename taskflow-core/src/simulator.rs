//! Sequential execution simulator.
//!
//! Walks tasks strictly in the given order against a [`CapacityModel`] and
//! projects when each one would complete. No reordering, no look-ahead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::capacity::CapacityModel;
use crate::strategy::RankedTask;
use crate::task::Task;
use crate::time::minutes_between;

/// One scheduled task with its projected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTaskEntry {
    #[serde(flatten)]
    pub task: Task,
    pub score: f64,
    pub reason: String,
    pub projected_completion: DateTime<Utc>,
    /// Minutes past the deadline at projected completion, 0 when on time.
    pub tardiness_minutes: f64,
    pub on_time: bool,
}

/// Simulate `ranked` in order. Always yields one entry per input task.
pub fn simulate(ranked: Vec<RankedTask<'_>>, capacity: &mut CapacityModel) -> Vec<ScheduledTaskEntry> {
    ranked
        .into_iter()
        .map(|r| {
            let projected_completion = capacity.consume(r.task.estimated_minutes);
            let tardiness_minutes = minutes_between(r.task.deadline, projected_completion).max(0.0);

            trace!(
                task_id = r.task.id,
                completion = %projected_completion,
                tardiness_minutes,
                "simulated task"
            );

            ScheduledTaskEntry {
                task: r.task.clone(),
                score: r.score,
                reason: r.reason,
                projected_completion,
                tardiness_minutes,
                on_time: tardiness_minutes == 0.0,
            }
        })
        .collect()
}
