//! Derived values for the dashboard. Nothing here mutates its input.

use crate::phase::Metrics;
use crate::project::Project;
use crate::task::Task;
use crate::types::TaskStatus;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PHASE_WEIGHT: u8 = 25;

/// 25 points each for a stated problem, at least one task, written results
/// and a standardization note.
pub fn completion_percent(project: &Project) -> u8 {
    let filled = [
        !project.plan.problem.is_empty(),
        !project.do_phase.implementation_steps.is_empty(),
        !project.check.results.is_empty(),
        !project.act.standardization.is_empty(),
    ];
    let score: u8 = filled.iter().filter(|f| **f).map(|_| PHASE_WEIGHT).sum();
    score.min(100)
}

/// Relative reduction from `before` to `after`, in percent. Zero when
/// `before` is not positive.
pub fn improvement_percent(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        ((before - after) / before) * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub open: usize,
    pub overdue: usize,
}

pub fn task_counts(tasks: &[Task], today: NaiveDate) -> TaskCounts {
    let mut counts = TaskCounts {
        total: tasks.len(),
        ..TaskCounts::default()
    };
    for t in tasks {
        match t.status {
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Open => counts.open += 1,
        }
        if t.is_overdue(today) {
            counts.overdue += 1;
        }
    }
    counts
}

/// Same as [`task_counts`], measured against the local calendar date.
pub fn task_counts_now(tasks: &[Task]) -> TaskCounts {
    task_counts(tasks, Local::now().date_naive())
}

/// Count of tasks per status. Statuses with no tasks are left out.
pub fn status_histogram(tasks: &[Task]) -> BTreeMap<TaskStatus, usize> {
    let mut histogram = BTreeMap::new();
    for t in tasks {
        *histogram.entry(t.status).or_insert(0) += 1;
    }
    histogram
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub project_id: String,
    pub name: String,
    pub status: crate::types::ProjectStatus,
    pub completion_percent: u8,
    pub tasks: TaskCounts,
    pub status_histogram: BTreeMap<TaskStatus, usize>,
    pub metrics: Metrics,
}

pub fn dashboard(project: &Project, today: NaiveDate) -> Dashboard {
    let tasks = project.tasks();
    Dashboard {
        project_id: project.id().to_string(),
        name: project.name.clone(),
        status: project.status,
        completion_percent: completion_percent(project),
        tasks: task_counts(tasks, today),
        status_histogram: status_histogram(tasks),
        metrics: project.check.metrics,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
