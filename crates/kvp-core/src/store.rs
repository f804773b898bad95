use crate::error::{KvpError, Result};
use crate::project::{NewProject, Project, DEFAULT_PROJECT_NAME};
use crate::role::{ensure_can_delete, ensure_can_edit, Role};
use crate::task::Task;

// ---------------------------------------------------------------------------
// ProjectStore
// ---------------------------------------------------------------------------

/// In-memory projects in insertion order, plus the id of the active one.
///
/// Every mutating operation validates (role, existence, last-project rule)
/// before it touches state, so a rejected call leaves the store unchanged.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    projects: Vec<Project>,
    active: Option<String>,
    default_name: String,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_PROJECT_NAME)
    }

    pub fn with_default_name(default_name: impl Into<String>) -> Self {
        Self {
            projects: Vec::new(),
            active: None,
            default_name: default_name.into(),
        }
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn get(&self, id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| not_found(id))
    }

    pub fn active(&self) -> Result<&Project> {
        let id = self
            .active
            .as_deref()
            .ok_or_else(|| KvpError::NotFound("no active project".to_string()))?;
        self.get(id)
    }

    // ---------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------

    /// Insert a project built from `initial` (or an empty one) and make it
    /// active.
    pub fn create_project(&mut self, initial: Option<NewProject>) -> String {
        let project = Project::from_new(initial.unwrap_or_default(), &self.default_name);
        self.insert_active(project)
    }

    pub fn load_sample(&mut self) -> String {
        self.insert_active(Project::sample())
    }

    /// Insert a previously exported project under its own id.
    pub fn import_project(&mut self, mut project: Project) -> Result<String> {
        if self.projects.iter().any(|p| p.id() == project.id()) {
            return Err(KvpError::InvalidOperation(format!(
                "project '{}' already exists",
                project.id()
            )));
        }
        if project.name.trim().is_empty() {
            return Err(KvpError::Validation(
                "project name must not be empty".to_string(),
            ));
        }
        let steps = &mut project.do_phase.implementation_steps;
        if let Some(pos) = steps.iter().position(|t| t.label.trim().is_empty()) {
            return Err(KvpError::Validation(format!(
                "task {pos} has an empty label"
            )));
        }
        for task in steps.iter_mut() {
            task.label = task.label.trim().to_string();
        }
        let measures = project.plan.measures.join("\n");
        project.plan.set_measures_text(&measures);
        let metrics = project.check.metrics;
        project.check.set_metrics(metrics.before, metrics.after);
        Ok(self.insert_active(project))
    }

    pub fn delete_project(&mut self, id: &str, role: Role) -> Result<Project> {
        ensure_can_delete(role)?;
        if self.projects.len() < 2 {
            return Err(KvpError::InvalidOperation(
                "cannot delete the last project".to_string(),
            ));
        }
        let pos = self
            .projects
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| not_found(id))?;

        let removed = self.projects.remove(pos);
        if self.active.as_deref() == Some(id) {
            self.active = self.projects.first().map(|p| p.id().to_string());
        }
        Ok(removed)
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        self.get(id)?;
        self.active = Some(id.to_string());
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Gated edits
    // ---------------------------------------------------------------------------

    /// Mutable access to a project for roles that may edit.
    pub fn edit(&mut self, id: &str, role: Role) -> Result<&mut Project> {
        ensure_can_edit(role)?;
        self.projects
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| not_found(id))
    }

    pub fn remove_task(&mut self, id: &str, role: Role, index: usize) -> Result<Task> {
        ensure_can_delete(role)?;
        self.edit(id, role)?.remove_task(index)
    }

    fn insert_active(&mut self, project: Project) -> String {
        let id = project.id().to_string();
        self.projects.push(project);
        self.active = Some(id.clone());
        id
    }
}

fn not_found(id: &str) -> KvpError {
    KvpError::NotFound(format!("project '{id}'"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
