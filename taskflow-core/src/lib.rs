//! taskflow-core: deadline-aware scheduling engine.
//!
//! Orders pending tasks with Earliest-Deadline-First or Weighted-Greedy scoring,
//! simulates them against a daily time budget and reports on-time rate,
//! tardiness and overload for each strategy.

pub mod capacity;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod request;
pub mod simulator;
pub mod strategy;
pub mod task;
pub mod time;

pub use capacity::{CapacityModel, DailyCapacity};
pub use config::{EngineConfig, ScoringWeights};
pub use engine::{Scheduler, TaskSnapshotProvider};
pub use error::ScheduleError;
pub use metrics::{ComparisonResult, ScheduleResult};
pub use request::ScheduleRequest;
pub use simulator::{ScheduledTaskEntry, simulate};
pub use strategy::{Factor, GreedySignals, RankedTask, Strategy};
pub use task::{Task, TaskId, TaskStatus};
