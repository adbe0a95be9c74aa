//! Boundary errors.
//!
//! The engine itself is total over validated input; every variant here is raised
//! while turning raw request data (strings, integers, user-entered tasks) into
//! the typed values the engine accepts.

use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Strategy name is not one of the recognized values.
    #[error("unknown strategy '{0}' (expected EDF or WEIGHTED_GREEDY)")]
    InvalidStrategy(String),

    /// Daily capacity outside the accepted range.
    #[error("availableMinutesPerDay must be between {min} and {max}, got {got}")]
    InvalidCapacity { got: i64, min: u32, max: u32 },

    /// A task violates the task model invariants.
    #[error("invalid task {id}: {reason}")]
    InvalidTask { id: TaskId, reason: String },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A scoring weight is negative, NaN or infinite.
    #[error("scoring weight '{name}' must be a finite number >= 0, got {value}")]
    InvalidWeight { name: &'static str, value: String },

    #[error("invalid deadline '{input}': {reason}")]
    InvalidDeadline { input: String, reason: String },
}
