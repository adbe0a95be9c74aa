//! Task model as handed to the engine by a snapshot provider.
//!
//! The engine never mutates tasks; it reads a snapshot and derives fresh results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

pub type TaskId = u64;

/// Lowest and highest accepted priority (5 = most urgent).
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Largest accepted effort estimate: one year of round-the-clock work.
pub const MAX_ESTIMATED_MINUTES: u32 = 365 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => anyhow::bail!("unknown status '{s}' (expected TODO, IN_PROGRESS or DONE)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hard deadline (UTC).
    pub deadline: DateTime<Utc>,

    /// Effort estimate in minutes. Always > 0 for a valid task.
    pub estimated_minutes: u32,

    /// 1-5, higher is more urgent.
    pub priority: u8,

    #[serde(default)]
    pub status: TaskStatus,

    /// Set by the store when the task is first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            deadline,
            estimated_minutes: 30,
            priority: 3,
            status: TaskStatus::Todo,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Completed tasks never take part in scheduling.
    pub fn is_eligible(&self) -> bool {
        self.status != TaskStatus::Done
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        let invalid = |reason: &str| ScheduleError::InvalidTask {
            id: self.id,
            reason: reason.to_string(),
        };

        if self.title.trim().is_empty() {
            return Err(invalid("title must not be blank"));
        }
        if self.estimated_minutes == 0 {
            return Err(invalid("estimatedMinutes must be positive"));
        }
        if self.estimated_minutes > MAX_ESTIMATED_MINUTES {
            return Err(invalid("estimatedMinutes must not exceed one year (525600)"));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(invalid("priority must be within 1..=5"));
        }
        Ok(())
    }
}
