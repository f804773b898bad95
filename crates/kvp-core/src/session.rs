//! The session context: one store plus the role selected for it.
//!
//! All edits go to the active project and are checked against the session
//! role before anything changes.

use crate::config::Config;
use crate::error::{KvpError, Result};
use crate::phase::parse_metric;
use crate::progress::{self, Dashboard};
use crate::project::{NewProject, Project};
use crate::role::Role;
use crate::store::ProjectStore;
use crate::task::{parse_due_date, Task};
use crate::types::{ProjectStatus, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Edit payloads
// ---------------------------------------------------------------------------

/// Plan fields to overwrite. `measures` is the raw multi-line text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanUpdate {
    pub problem: Option<String>,
    pub goal: Option<String>,
    pub root_cause: Option<String>,
    pub measures: Option<String>,
}

/// A metric as typed by the user: either already a number or free text that
/// still has to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricInput {
    Number(f64),
    Text(String),
}

impl MetricInput {
    pub fn resolve(&self) -> Result<f64> {
        match self {
            MetricInput::Number(n) if n.is_finite() => Ok(*n),
            MetricInput::Number(n) => Err(KvpError::Validation(format!(
                "metric '{n}' is not finite"
            ))),
            MetricInput::Text(s) => parse_metric(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckUpdate {
    pub before: Option<MetricInput>,
    pub after: Option<MetricInput>,
    pub results: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActUpdate {
    pub standardization: Option<String>,
    pub lessons_learned: Option<String>,
    pub next_steps: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Session {
    store: ProjectStore,
    role: Role,
}

impl Session {
    /// Empty store, no active project, role Admin.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: &Config) -> Self {
        Self {
            store: ProjectStore::with_default_name(cfg.new_project_name.clone()),
            role: cfg.default_role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn active(&self) -> Result<&Project> {
        self.store.active()
    }

    // ---------------------------------------------------------------------------
    // Project lifecycle
    // ---------------------------------------------------------------------------

    pub fn create_project(&mut self, initial: Option<NewProject>) -> String {
        self.store.create_project(initial)
    }

    pub fn load_sample(&mut self) -> String {
        self.store.load_sample()
    }

    pub fn import_project(&mut self, project: Project) -> Result<String> {
        self.store.import_project(project)
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        self.store.set_active(id)
    }

    pub fn delete_project(&mut self, id: &str) -> Result<Project> {
        self.store.delete_project(id, self.role)
    }

    pub fn delete_active(&mut self) -> Result<Project> {
        let id = self.active()?.id().to_string();
        self.delete_project(&id)
    }

    // ---------------------------------------------------------------------------
    // Edits on the active project
    // ---------------------------------------------------------------------------

    pub fn rename(&mut self, name: &str) -> Result<()> {
        self.active_mut()?.rename(name)
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.active_mut()?.set_description(description);
        Ok(())
    }

    pub fn set_status(&mut self, status: ProjectStatus) -> Result<()> {
        self.active_mut()?.status = status;
        Ok(())
    }

    pub fn update_plan(&mut self, update: &PlanUpdate) -> Result<()> {
        let plan = &mut self.active_mut()?.plan;
        if let Some(problem) = &update.problem {
            plan.problem = problem.clone();
        }
        if let Some(goal) = &update.goal {
            plan.goal = goal.clone();
        }
        if let Some(root_cause) = &update.root_cause {
            plan.root_cause = root_cause.clone();
        }
        if let Some(measures) = &update.measures {
            plan.set_measures_text(measures);
        }
        Ok(())
    }

    /// Append a task to the active project. `due_date` must be `YYYY-MM-DD`.
    pub fn add_task(&mut self, label: &str, responsible: &str, due_date: &str) -> Result<usize> {
        let project = self.active_mut()?;
        let due = parse_due_date(due_date)?;
        project.add_task(label, responsible, due)
    }

    pub fn set_task_status(&mut self, index: usize, status: TaskStatus) -> Result<()> {
        self.active_mut()?.set_task_status(index, status)
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Task> {
        let id = self.active()?.id().to_string();
        self.store.remove_task(&id, self.role, index)
    }

    /// Metric inputs are parsed before anything is written, so a bad value
    /// leaves the check phase untouched.
    pub fn update_check(&mut self, update: &CheckUpdate) -> Result<()> {
        let before = update.before.as_ref().map(MetricInput::resolve).transpose()?;
        let after = update.after.as_ref().map(MetricInput::resolve).transpose()?;

        let check = &mut self.active_mut()?.check;
        let before = before.unwrap_or(check.metrics.before);
        let after = after.unwrap_or(check.metrics.after);
        check.set_metrics(before, after);
        if let Some(results) = &update.results {
            check.results = results.clone();
        }
        Ok(())
    }

    pub fn update_act(&mut self, update: &ActUpdate) -> Result<()> {
        let act = &mut self.active_mut()?.act;
        if let Some(standardization) = &update.standardization {
            act.standardization = standardization.clone();
        }
        if let Some(lessons) = &update.lessons_learned {
            act.lessons_learned = lessons.clone();
        }
        if let Some(next_steps) = &update.next_steps {
            act.next_steps = next_steps.clone();
        }
        Ok(())
    }

    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        Ok(progress::dashboard(self.active()?, today))
    }

    fn active_mut(&mut self) -> Result<&mut Project> {
        let id = self.active()?.id().to_string();
        self.store.edit(&id, self.role)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
