use crate::error::{KvpError, Result};
use crate::phase::{Act, Check, Do, Metrics, Plan};
use crate::task::{self as task_ops, Task};
use crate::types::{ProjectStatus, TaskStatus};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_NAME: &str = "New PDCA project";

// ---------------------------------------------------------------------------
// NewProject
// ---------------------------------------------------------------------------

/// Optional initial content for a project. Anything left unset gets the
/// defaults of an empty project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NewProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub plan: Plan,
    #[serde(rename = "do")]
    pub do_phase: Do,
    pub check: Check,
    pub act: Act,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    created_date: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub plan: Plan,
    #[serde(rename = "do", default)]
    pub do_phase: Do,
    #[serde(default)]
    pub check: Check,
    #[serde(default)]
    pub act: Act,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_new(
            NewProject {
                name: Some(name.into()),
                ..NewProject::default()
            },
            DEFAULT_PROJECT_NAME,
        )
    }

    /// Build a project from optional initial content. A missing or blank name
    /// falls back to `default_name`; the improvement figure is always derived
    /// from the given before/after values.
    pub fn from_new(initial: NewProject, default_name: &str) -> Self {
        let name = initial
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name.to_string());
        let mut check = initial.check;
        check.set_metrics(check.metrics.before, check.metrics.after);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description: initial.description.filter(|d| !d.is_empty()),
            created_date: Local::now().date_naive(),
            status: initial.status,
            plan: initial.plan,
            do_phase: initial.do_phase,
            check,
            act: initial.act,
        }
    }

    /// The fixed demonstration project.
    pub fn sample() -> Self {
        let due = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        let initial = NewProject {
            name: Some("Example: Reducing waiting times".to_string()),
            description: Some("Reduce waiting times in production by 30%".to_string()),
            status: ProjectStatus::InProgress,
            plan: Plan {
                problem: "Long waiting times between production steps".to_string(),
                goal: "Reduce waiting times by 30%".to_string(),
                root_cause: "Unbalanced machine capacities".to_string(),
                measures: vec![
                    "Machine analysis".to_string(),
                    "Process optimization".to_string(),
                    "Training".to_string(),
                ],
            },
            do_phase: Do {
                implementation_steps: vec![
                    Task::new("Analyse machine utilisation", "Max Mustermann", due(2024, 7, 15))
                        .with_status(TaskStatus::Completed),
                    Task::new("Identify bottlenecks", "Anna Schmidt", due(2024, 7, 20))
                        .with_status(TaskStatus::InProgress),
                    Task::new("Implement optimisation measures", "Tom Weber", due(2024, 7, 30)),
                ],
            },
            check: Check {
                metrics: Metrics::new(45.0, 32.0),
                results: "Waiting times were reduced by 28.9%".to_string(),
            },
            act: Act {
                standardization: "New work instructions created".to_string(),
                lessons_learned: "Regular capacity analysis is essential".to_string(),
                next_steps: "Roll out to other production lines".to_string(),
            },
        };
        Self::from_new(initial, DEFAULT_PROJECT_NAME)
    }

    /// Assigned once at construction; never changes afterwards.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_date(&self) -> NaiveDate {
        self.created_date
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KvpError::Validation("project name must not be empty".to_string()));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = Some(description.to_string()).filter(|d| !d.is_empty());
    }

    pub fn tasks(&self) -> &[Task] {
        &self.do_phase.implementation_steps
    }

    pub fn add_task(&mut self, label: &str, responsible: &str, due_date: NaiveDate) -> Result<usize> {
        task_ops::add_task(&mut self.do_phase.implementation_steps, label, responsible, due_date)
    }

    pub fn set_task_status(&mut self, index: usize, status: TaskStatus) -> Result<()> {
        task_ops::set_status(&mut self.do_phase.implementation_steps, index, status)
    }

    pub(crate) fn remove_task(&mut self, index: usize) -> Result<Task> {
        task_ops::remove_task(&mut self.do_phase.implementation_steps, index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
