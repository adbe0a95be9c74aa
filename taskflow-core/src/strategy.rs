//! Ordering strategies: Earliest-Deadline-First and Weighted-Greedy.
//!
//! The strategy set is closed, so dispatch is a `match` over [`Strategy`].
//! Both produce a deterministic total order; every tie ends on `id` ascending.
//!
//! Ranking keys:
//! - EDF: deadline ASC, priority DESC, estimated minutes ASC, id ASC
//! - Weighted-Greedy: score DESC, then the EDF keys

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capacity::DailyCapacity;
use crate::config::ScoringWeights;
use crate::error::ScheduleError;
use crate::task::{MAX_PRIORITY, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    Edf,
    WeightedGreedy,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Edf, Strategy::WeightedGreedy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Edf => "EDF",
            Strategy::WeightedGreedy => "WEIGHTED_GREEDY",
        }
    }

    /// Order eligible tasks, attaching each one's display score and reason.
    pub fn order<'a>(
        &self,
        tasks: &[&'a Task],
        now: DateTime<Utc>,
        capacity: DailyCapacity,
        weights: &ScoringWeights,
    ) -> Vec<RankedTask<'a>> {
        match self {
            Strategy::Edf => order_edf(tasks, now),
            Strategy::WeightedGreedy => order_weighted_greedy(tasks, now, capacity, weights),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "EDF" => Ok(Strategy::Edf),
            "WEIGHTED_GREEDY" | "GREEDY" => Ok(Strategy::WeightedGreedy),
            _ => Err(ScheduleError::InvalidStrategy(s.to_string())),
        }
    }
}

/// A task in scheduled position, before simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTask<'a> {
    pub task: &'a Task,
    pub score: f64,
    pub reason: String,
}

fn edf_cmp(a: &Task, b: &Task) -> Ordering {
    a.deadline
        .cmp(&b.deadline)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.estimated_minutes.cmp(&b.estimated_minutes))
        .then_with(|| a.id.cmp(&b.id))
}

fn order_edf<'a>(tasks: &[&'a Task], now: DateTime<Utc>) -> Vec<RankedTask<'a>> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| edf_cmp(a, b));

    let total = sorted.len();
    sorted
        .into_iter()
        .enumerate()
        .map(|(rank, task)| RankedTask {
            task,
            // Display only: the order above is what matters.
            score: 1.0 / (1.0 + rank as f64),
            reason: edf_reason(rank, total, task.deadline <= now),
        })
        .collect()
}

fn edf_reason(rank: usize, total: usize, overdue: bool) -> String {
    let base = if rank == 0 {
        "earliest deadline among remaining tasks".to_string()
    } else {
        format!("deadline rank {} of {}", rank + 1, total)
    };
    if overdue {
        format!("{base} (overdue)")
    } else {
        base
    }
}

/// Normalized Weighted-Greedy inputs for one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedySignals {
    /// `1 / (1 + hoursUntilDeadline)`, hours clamped at 0 for overdue tasks.
    pub urgency: f64,
    /// `priority / 5`.
    pub priority_norm: f64,
    /// `estimatedMinutes / availableMinutesPerDay`, uncapped.
    pub effort_penalty: f64,
    pub overdue: bool,
}

/// Normalised priority at which the priority term is labelled "high" (4 and 5).
const HIGH_PRIORITY_NORM: f64 = 0.8;

/// Which weighted term contributes most to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Priority,
    DeadlinePressure,
    Effort,
}

impl GreedySignals {
    pub fn compute(task: &Task, now: DateTime<Utc>, capacity: DailyCapacity) -> Self {
        let secs_left = (task.deadline - now).num_seconds();
        let hours_left = (secs_left as f64 / 3600.0).max(0.0);

        Self {
            urgency: 1.0 / (1.0 + hours_left),
            priority_norm: f64::from(task.priority) / f64::from(MAX_PRIORITY),
            effort_penalty: f64::from(task.estimated_minutes) / f64::from(capacity.minutes()),
            overdue: secs_left <= 0,
        }
    }

    pub fn score(&self, w: &ScoringWeights) -> f64 {
        w.priority * self.priority_norm + w.urgency * self.urgency - w.effort * self.effort_penalty
    }

    /// Largest weighted term; ties favour priority, then deadline pressure.
    pub fn dominant(&self, w: &ScoringWeights) -> Factor {
        let priority = w.priority * self.priority_norm;
        let urgency = w.urgency * self.urgency;
        let effort = w.effort * self.effort_penalty;

        if priority >= urgency && priority >= effort {
            Factor::Priority
        } else if urgency >= effort {
            Factor::DeadlinePressure
        } else {
            Factor::Effort
        }
    }

    pub fn reason(&self, w: &ScoringWeights) -> String {
        match self.dominant(w) {
            Factor::Priority if self.priority_norm >= HIGH_PRIORITY_NORM => "high priority".to_string(),
            Factor::Priority => "priority".to_string(),
            Factor::DeadlinePressure if self.overdue => "deadline pressure (overdue)".to_string(),
            Factor::DeadlinePressure => "deadline pressure".to_string(),
            Factor::Effort => "large effort relative to daily capacity".to_string(),
        }
    }
}

fn order_weighted_greedy<'a>(
    tasks: &[&'a Task],
    now: DateTime<Utc>,
    capacity: DailyCapacity,
    weights: &ScoringWeights,
) -> Vec<RankedTask<'a>> {
    let mut ranked: Vec<RankedTask<'a>> = tasks
        .iter()
        .map(|&task| {
            let signals = GreedySignals::compute(task, now, capacity);
            RankedTask {
                task,
                score: signals.score(weights),
                reason: signals.reason(weights),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| edf_cmp(a.task, b.task))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn cap() -> DailyCapacity {
        DailyCapacity::new(480).unwrap()
    }

    fn ids(ranked: &[RankedTask<'_>]) -> Vec<u64> {
        ranked.iter().map(|r| r.task.id).collect()
    }

    #[test]
    fn strategy_parses_wire_names() {
        assert_eq!("EDF".parse::<Strategy>().unwrap(), Strategy::Edf);
        assert_eq!("weighted-greedy".parse::<Strategy>().unwrap(), Strategy::WeightedGreedy);
        assert_eq!("WEIGHTED_GREEDY".parse::<Strategy>().unwrap(), Strategy::WeightedGreedy);
        assert_eq!(
            "SJF".parse::<Strategy>(),
            Err(ScheduleError::InvalidStrategy("SJF".into()))
        );
    }

    #[test]
    fn edf_orders_by_deadline_then_tiebreaks() {
        let d = now() + Duration::hours(5);
        let tasks = vec![
            Task::new(4, "later", d + Duration::hours(1)).with_priority(5),
            Task::new(3, "same deadline, low prio", d).with_priority(2),
            Task::new(2, "same deadline, high prio, long", d).with_priority(4).with_duration(90),
            Task::new(1, "same deadline, high prio, short", d).with_priority(4).with_duration(20),
            Task::new(0, "identical to 1 but smaller id", d).with_priority(4).with_duration(20),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ranked = Strategy::Edf.order(&refs, now(), cap(), &ScoringWeights::default());

        assert_eq!(ids(&ranked), vec![0, 1, 2, 3, 4]);
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 0.5);
        assert_eq!(ranked[0].reason, "earliest deadline among remaining tasks");
        assert_eq!(ranked[4].reason, "deadline rank 5 of 5");
    }

    #[test]
    fn edf_ignores_priority_across_deadlines() {
        let tasks = vec![
            Task::new(1, "urgent but later", now() + Duration::hours(3)).with_priority(5),
            Task::new(2, "low but sooner", now() + Duration::hours(2)).with_priority(1),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let ranked = Strategy::Edf.order(&refs, now(), cap(), &ScoringWeights::default());
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn greedy_score_formula() {
        // 2 hours out, priority 4, 120 min at 480/day.
        let t = Task::new(1, "t", now() + Duration::hours(2))
            .with_priority(4)
            .with_duration(120);
        let s = GreedySignals::compute(&t, now(), cap());
        assert!((s.urgency - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.priority_norm - 0.8).abs() < 1e-12);
        assert!((s.effort_penalty - 0.25).abs() < 1e-12);

        let expected = 0.5 * 0.8 + 0.4 / 3.0 - 0.1 * 0.25;
        assert!((s.score(&ScoringWeights::default()) - expected).abs() < 1e-12);
        assert_eq!(s.reason(&ScoringWeights::default()), "high priority");
    }

    #[test]
    fn overdue_task_gets_maximal_urgency() {
        let overdue = Task::new(2, "late", now() - Duration::hours(6));
        let fresh = Task::new(1, "soon", now() + Duration::minutes(30));
        let so = GreedySignals::compute(&overdue, now(), cap());
        let sf = GreedySignals::compute(&fresh, now(), cap());

        assert_eq!(so.urgency, 1.0);
        assert!(so.overdue);
        assert!(so.urgency > sf.urgency);

        let refs = vec![&fresh, &overdue];
        let ranked = Strategy::WeightedGreedy.order(&refs, now(), cap(), &ScoringWeights::default());
        assert_eq!(ids(&ranked), vec![2, 1]);
        assert_eq!(ranked[0].reason, "deadline pressure (overdue)");
    }

    #[test]
    fn greedy_reason_for_imminent_low_priority_task() {
        // Due in 30 minutes: 0.4 / 1.5 outweighs 0.5 * 0.2.
        let t = Task::new(1, "reply", now() + Duration::minutes(30)).with_priority(1);
        let s = GreedySignals::compute(&t, now(), cap());
        assert!(!s.overdue);
        assert_eq!(s.dominant(&ScoringWeights::default()), Factor::DeadlinePressure);
        assert_eq!(s.reason(&ScoringWeights::default()), "deadline pressure");
    }

    #[test]
    fn greedy_reason_only_calls_priorities_4_and_5_high() {
        let far = now() + Duration::days(7);
        let w = ScoringWeights::default();
        for (priority, expected) in [(1, "priority"), (3, "priority"), (4, "high priority"), (5, "high priority")] {
            let t = Task::new(1, "t", far).with_priority(priority);
            let s = GreedySignals::compute(&t, now(), cap());
            assert_eq!(s.dominant(&w), Factor::Priority);
            assert_eq!(s.reason(&w), expected, "priority {priority}");
        }
    }

    #[test]
    fn greedy_effort_penalty_is_uncapped() {
        let huge = Task::new(1, "migration", now() + Duration::days(30))
            .with_priority(1)
            .with_duration(4800);
        let s = GreedySignals::compute(&huge, now(), cap());
        assert_eq!(s.effort_penalty, 10.0);
        assert!(s.score(&ScoringWeights::default()) < 0.0);
        assert_eq!(s.dominant(&ScoringWeights::default()), Factor::Effort);
    }

    #[test]
    fn greedy_ties_fall_back_to_edf_keys_and_id() {
        let d = now() + Duration::hours(10);
        let tasks = vec![
            Task::new(9, "b", d),
            Task::new(3, "a", d),
            Task::new(5, "c", d),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let w = ScoringWeights::default();
        let first = Strategy::WeightedGreedy.order(&refs, now(), cap(), &w);
        let second = Strategy::WeightedGreedy.order(&refs, now(), cap(), &w);

        assert_eq!(ids(&first), vec![3, 5, 9]);
        assert_eq!(first, second);
    }

    #[test]
    fn custom_weights_change_the_order() {
        let tasks = vec![
            Task::new(1, "important, far", now() + Duration::days(7)).with_priority(5),
            Task::new(2, "minor, imminent", now() + Duration::minutes(15)).with_priority(1),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let default = Strategy::WeightedGreedy.order(&refs, now(), cap(), &ScoringWeights::default());
        assert_eq!(ids(&default), vec![1, 2]);

        let deadline_heavy = ScoringWeights {
            priority: 0.1,
            urgency: 0.9,
            effort: 0.0,
        };
        let ranked = Strategy::WeightedGreedy.order(&refs, now(), cap(), &deadline_heavy);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }
}
