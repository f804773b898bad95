use crate::RunContext;
use anyhow::Context;
use kvp_core::{
    export,
    project::NewProject,
    role::Role,
    session::{ActUpdate, CheckUpdate, PlanUpdate, Session},
    types::{ProjectStatus, TaskStatus},
};
use serde::Deserialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Script format
// ---------------------------------------------------------------------------

/// A session script: the steps a user would click through, in order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    NewProject(NewProject),
    Sample,
    /// Select a project by its position in creation order.
    Select(usize),
    /// Delete the active project.
    DeleteProject,
    Rename(String),
    Describe(String),
    SetStatus(ProjectStatus),
    Plan(PlanUpdate),
    AddTask(AddTask),
    SetTaskStatus { index: usize, status: TaskStatus },
    RemoveTask { index: usize },
    Check(CheckUpdate),
    Act(ActUpdate),
    Role(Role),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddTask {
    pub task: String,
    #[serde(default)]
    pub responsible: String,
    pub due_date: String,
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::NewProject(_) => "new_project",
            Step::Sample => "sample",
            Step::Select(_) => "select",
            Step::DeleteProject => "delete_project",
            Step::Rename(_) => "rename",
            Step::Describe(_) => "describe",
            Step::SetStatus(_) => "set_status",
            Step::Plan(_) => "plan",
            Step::AddTask(_) => "add_task",
            Step::SetTaskStatus { .. } => "set_task_status",
            Step::RemoveTask { .. } => "remove_task",
            Step::Check(_) => "check",
            Step::Act(_) => "act",
            Step::Role(_) => "role",
        }
    }
}

pub fn parse_script(data: &str) -> anyhow::Result<Script> {
    serde_yaml::from_str(data).context("invalid session script")
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

pub fn apply(session: &mut Session, step: Step) -> kvp_core::Result<()> {
    match step {
        Step::NewProject(initial) => {
            session.create_project(Some(initial));
        }
        Step::Sample => {
            session.load_sample();
        }
        Step::Select(position) => {
            let id = session
                .store()
                .list()
                .get(position)
                .map(|p| p.id().to_string())
                .ok_or_else(|| {
                    kvp_core::KvpError::NotFound(format!("project at position {position}"))
                })?;
            session.set_active(&id)?;
        }
        Step::DeleteProject => {
            session.delete_active()?;
        }
        Step::Rename(name) => session.rename(&name)?,
        Step::Describe(text) => session.set_description(&text)?,
        Step::SetStatus(status) => session.set_status(status)?,
        Step::Plan(update) => session.update_plan(&update)?,
        Step::AddTask(t) => {
            session.add_task(&t.task, &t.responsible, &t.due_date)?;
        }
        Step::SetTaskStatus { index, status } => session.set_task_status(index, status)?,
        Step::RemoveTask { index } => {
            session.remove_task(index)?;
        }
        Step::Check(update) => session.update_check(&update)?,
        Step::Act(update) => session.update_act(&update)?,
        Step::Role(role) => session.set_role(role),
    }
    Ok(())
}

pub fn run(ctx: &RunContext, script_path: &Path, export_dir: Option<&Path>) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script '{}'", script_path.display()))?;
    let script = parse_script(&data)?;

    let mut session = Session::with_config(&ctx.config);
    session.set_role(ctx.role);

    for (i, step) in script.steps.into_iter().enumerate() {
        let number = i + 1;
        let name = step.name();
        tracing::info!(step = number, name, role = %session.role(), "applying step");
        apply(&mut session, step).with_context(|| format!("step {number} ({name}) failed"))?;
    }

    let project = session
        .active()
        .context("script finished without an active project")?;
    let ctx = RunContext {
        root: ctx.root.clone(),
        config: ctx.config.clone(),
        role: session.role(),
        today: ctx.today,
        json: ctx.json,
    };
    super::dashboard::print(&ctx, project)?;

    if let Some(dir) = export_dir {
        let path = export::write_export(project, dir)
            .with_context(|| format!("failed to export to '{}'", dir.display()))?;
        tracing::info!(path = %path.display(), "wrote export");
        if !ctx.json {
            println!();
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
