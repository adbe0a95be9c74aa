//! Engine-level configuration. Not settable per request.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Weights of the three Weighted-Greedy signals.
///
/// `score = priority * priorityNorm + urgency * urgencySignal - effort * effortPenalty`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub priority: f64,
    pub urgency: f64,
    pub effort: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            priority: 0.5,
            urgency: 0.4,
            effort: 0.1,
        }
    }
}

impl ScoringWeights {
    /// Every weight must be finite and non-negative; the effort term is
    /// already subtracted, so a negative weight would flip its meaning.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (name, value) in [
            ("priority", self.priority),
            ("urgency", self.urgency),
            ("effort", self.effort),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScheduleError::InvalidWeight {
                    name,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Calendar used for day rollover in the capacity model.
    pub timezone: Tz,
    pub weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            weights: ScoringWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }
}
