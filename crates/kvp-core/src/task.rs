use crate::error::{KvpError, Result};
use crate::types::{Priority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    #[serde(rename = "task")]
    pub label: String,
    #[serde(default)]
    pub responsible: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn new(label: impl Into<String>, responsible: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            responsible: responsible.into(),
            due_date,
            status: TaskStatus::Open,
            priority: Priority::Medium,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Due strictly before `today` and not yet completed. A task due today is
    /// not overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date < today
    }
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DUE_DATE_FORMAT)
        .map_err(|e| KvpError::Validation(format!("invalid due date '{s}': {e}")))
}

// ---------------------------------------------------------------------------
// Task list operations (operate on a mutable Vec<Task>)
// ---------------------------------------------------------------------------

/// Append a task and return its position. Rejects a blank label without
/// touching the list.
pub fn add_task(
    tasks: &mut Vec<Task>,
    label: &str,
    responsible: &str,
    due_date: NaiveDate,
) -> Result<usize> {
    let label = label.trim();
    if label.is_empty() {
        return Err(KvpError::Validation("task label must not be empty".to_string()));
    }
    tasks.push(Task::new(label, responsible.trim(), due_date));
    Ok(tasks.len() - 1)
}

/// Set any status from any status; there is no forward-only rule.
pub fn set_status(tasks: &mut [Task], index: usize, status: TaskStatus) -> Result<()> {
    let task = get_mut(tasks, index)?;
    task.status = status;
    Ok(())
}

pub fn remove_task(tasks: &mut Vec<Task>, index: usize) -> Result<Task> {
    if index >= tasks.len() {
        return Err(not_found(index, tasks.len()));
    }
    Ok(tasks.remove(index))
}

fn get_mut(tasks: &mut [Task], index: usize) -> Result<&mut Task> {
    let len = tasks.len();
    tasks.get_mut(index).ok_or_else(|| not_found(index, len))
}

fn not_found(index: usize, len: usize) -> KvpError {
    KvpError::NotFound(format!("task #{index} (list has {len} tasks)"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
