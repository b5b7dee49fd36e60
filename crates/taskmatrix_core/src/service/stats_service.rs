//! Aggregate statistics over the full task set.
//!
//! # Responsibility
//! - Compute totals, completion rate and per-bucket counts in one pass.
//! - Bucket evaluated tasks into Eisenhower quadrants.
//!
//! # Invariants
//! - Every priority/status/quadrant key is present in the output, zero
//!   when empty.
//! - A task whose stored evaluation cannot be decoded counts as
//!   evaluated but contributes to no quadrant. This asymmetry matches
//!   the observable contract and is deliberate.

use crate::model::eisenhower::Quadrant;
use crate::model::task::{Priority, Status, Task};
use serde::Serialize;

/// Full stats payload returned by `compute_stats`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StatsSummary {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    /// Percentage rounded to one decimal place; `0.0` for an empty set.
    pub completion_rate: f64,
    pub priority_stats: PriorityStats,
    pub status_stats: StatusStats,
    pub eisenhower_stats: EisenhowerStats,
}

/// Per-priority task counts. All keys are always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityStats {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Per-status task counts. All keys are always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusStats {
    pub todo: u64,
    pub inprogress: u64,
    pub done: u64,
}

/// Evaluation coverage and quadrant distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EisenhowerStats {
    pub evaluated_tasks: u64,
    pub quadrants: QuadrantCounts,
}

/// Counts per Eisenhower quadrant. All keys are always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QuadrantCounts {
    pub urgent_important: u64,
    pub important_not_urgent: u64,
    pub urgent_not_important: u64,
    pub not_urgent_not_important: u64,
}

impl QuadrantCounts {
    fn bump(&mut self, quadrant: Quadrant) {
        match quadrant {
            Quadrant::UrgentImportant => self.urgent_important += 1,
            Quadrant::ImportantNotUrgent => self.important_not_urgent += 1,
            Quadrant::UrgentNotImportant => self.urgent_not_important += 1,
            Quadrant::NotUrgentNotImportant => self.not_urgent_not_important += 1,
        }
    }
}

/// Computes the full stats summary from one pass over the task set.
pub fn aggregate(tasks: &[Task]) -> StatsSummary {
    let mut summary = StatsSummary::default();

    for task in tasks {
        summary.total_tasks += 1;
        if task.completed {
            summary.completed_tasks += 1;
        }

        match task.priority {
            Priority::Low => summary.priority_stats.low += 1,
            Priority::Medium => summary.priority_stats.medium += 1,
            Priority::High => summary.priority_stats.high += 1,
        }

        match task.status {
            Status::Todo => summary.status_stats.todo += 1,
            Status::InProgress => summary.status_stats.inprogress += 1,
            Status::Done => summary.status_stats.done += 1,
        }

        if task.eisenhower_evaluation.is_present() {
            summary.eisenhower_stats.evaluated_tasks += 1;
        }
        if let Some(quadrant) = task.eisenhower_evaluation.quadrant() {
            summary.eisenhower_stats.quadrants.bump(quadrant);
        }
    }

    summary.completion_rate = completion_rate(summary.completed_tasks, summary.total_tasks);
    summary
}

#[allow(clippy::cast_precision_loss)]
fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}
