//! Request boundary: raw, untrusted input turned into engine types.
//!
//! Validation happens here, before any scheduling work starts.

use serde::{Deserialize, Serialize};

use crate::capacity::DailyCapacity;
use crate::error::ScheduleError;
use crate::strategy::Strategy;

/// Raw scheduling request as received from a caller (JSON or CLI flags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub strategy: Option<String>,
    pub available_minutes_per_day: i64,
}

impl ScheduleRequest {
    pub fn new(strategy: impl Into<String>, available_minutes_per_day: i64) -> Self {
        Self {
            strategy: Some(strategy.into()),
            available_minutes_per_day,
        }
    }

    /// Validate for a single-strategy run. A missing strategy is rejected.
    pub fn validate(&self) -> Result<(Strategy, DailyCapacity), ScheduleError> {
        let strategy = self
            .strategy
            .as_deref()
            .ok_or_else(|| ScheduleError::InvalidStrategy(String::new()))?
            .parse::<Strategy>()?;
        let capacity = DailyCapacity::new(self.available_minutes_per_day)?;
        Ok((strategy, capacity))
    }

    /// Validate for a comparison run, which always covers both strategies.
    pub fn validate_for_compare(&self) -> Result<DailyCapacity, ScheduleError> {
        DailyCapacity::new(self.available_minutes_per_day)
    }
}
